// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.


use easel::filter::apply_filter;
use easel::settings::FilterSettings;
use easel::{BarConfig, BaseConfig, ChartConfig, ChartEngine, ChartType, PieConfig, Row, Value};
use easel::chart::{CategoryTotal, IntermediateData};
use proptest::prelude::*;

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i32..1000).prop_map(Value::from),
        "[a-z0-9 ]{0,6}".prop_map(Value::Text),
    ]
}

fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        (prop::sample::select(vec!["A", "B", "C", "D"]), arb_value(), arb_value()),
        0..40,
    )
    .prop_map(|cells| {
        cells
            .into_iter()
            .map(|(cat, v, w)| Row::from_pairs([("cat", Value::from(cat)), ("v", v), ("w", w)]))
            .collect()
    })
}

fn bar_config(colour_scheme: &str) -> ChartConfig {
    BarConfig {
        base: BaseConfig {
            data_source_id: "ds".to_string(),
            color_scheme: colour_scheme.to_string(),
            ..BaseConfig::titled("Prop")
        },
        x_axis: vec!["cat".to_string()],
        y_axis: vec!["v".to_string(), "w".to_string()],
        ..BarConfig::default()
    }
    .into()
}

proptest! {
    #[test]
    fn prop_transform_is_idempotent(
        rows in arb_rows(),
        scheme in prop::sample::select(vec!["default", "pastel", "vibrant", "monochrome", "unknown"]),
    ) {
        let engine = ChartEngine::new();
        let strategy = engine.registry().resolve(ChartType::Bar).unwrap();
        let config = bar_config(scheme);
        let data = strategy.process_data(&rows, &config);
        let first = strategy.transform_to_chart_options(&data, &config);
        let second = strategy.transform_to_chart_options(&data, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_validation_depends_only_on_config(rows in arb_rows(), title in "[a-z ]{0,5}") {
        let engine = ChartEngine::new();
        let factory = engine.factory();
        let config = bar_config("default").with_title(title);
        let before = factory.validate_config(&config).unwrap();
        let _ = engine.render(&rows, &config).unwrap();
        prop_assert_eq!(factory.validate_config(&config).unwrap(), before);
    }

    #[test]
    fn prop_pie_total_matches_finite_inputs(rows in arb_rows()) {
        let engine = ChartEngine::new();
        let config: ChartConfig = PieConfig {
            base: BaseConfig { data_source_id: "ds".to_string(), ..BaseConfig::titled("Pie") },
            category: "cat".to_string(),
            value: "v".to_string(),
            ..PieConfig::default()
        }
        .into();
        let data = engine.registry().resolve(ChartType::Pie).unwrap().process_data(&rows, &config);
        let IntermediateData::Categories(totals) = data else {
            return Err(TestCaseError::fail("expected category totals"));
        };
        let totals: Vec<CategoryTotal> = totals;
        let expected: f64 = rows
            .iter()
            .map(|row| row.get("v").map_or(0.0, Value::number_or_zero))
            .sum();
        let actual: f64 = totals.iter().map(|t| t.sum).sum();
        prop_assert!((expected - actual).abs() < 1e-9);
    }

    #[test]
    fn prop_filter_never_adds_rows(rows in arb_rows(), source in "\\PC{0,40}") {
        let outcome = apply_filter(&rows, &source, &FilterSettings::default());
        prop_assert!(outcome.rows.len() <= rows.len());
        if outcome.fell_back() {
            prop_assert_eq!(outcome.rows.len(), rows.len());
        }
    }
}
