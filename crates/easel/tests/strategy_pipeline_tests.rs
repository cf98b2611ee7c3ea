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


use easel::chart::render::{Axis, ColorSpec, PerItem, RenderData, RenderKind};
use easel::chart::{CardValue, CategoryTotal, IntermediateData, LabelledMetrics, ScatterSeries};
use easel::{
    Aggregation, BarConfig, BaseConfig, CardConfig, ChartConfig, ChartEngine, ChartType,
    LineConfig, PieConfig, Row, ScatterConfig, TableConfig, Value,
};
use easel::data::rows_from_json;
use serde_json::json;

fn base(title: &str) -> BaseConfig {
    BaseConfig {
        data_source_id: "sales".to_string(),
        ..BaseConfig::titled(title)
    }
}

fn metrics(data: &IntermediateData) -> &[LabelledMetrics] {
    match data {
        IntermediateData::Metrics(items) => items,
        other => panic!("expected metrics, got {other:?}"),
    }
}

fn sales_rows() -> Vec<Row> {
    rows_from_json(&json!([
        {"cat": "A", "v": 1, "w": 10},
        {"cat": "A", "v": 2, "w": 20},
        {"cat": "B", "v": 5, "w": 1}
    ]))
}

fn bar(x: &str, y: &[&str]) -> BarConfig {
    BarConfig {
        base: base("Sales"),
        x_axis: vec![x.to_string()],
        y_axis: y.iter().map(|s| s.to_string()).collect(),
        ..BarConfig::default()
    }
}

#[test]
fn test_bar_groups_first_seen_and_sums() {
    let engine = ChartEngine::new();
    let strategy = engine.registry().resolve(ChartType::Bar).unwrap();
    let config: ChartConfig = bar("cat", &["v"]).into();
    let data = strategy.process_data(&sales_rows(), &config);
    let groups = metrics(&data);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "A");
    assert_eq!(groups[0].value("v"), 3.0);
    assert_eq!(groups[1].label, "B");
    assert_eq!(groups[1].value("v"), 5.0);
}

#[test]
fn test_bar_sorts_by_value_descending() {
    let engine = ChartEngine::new();
    let config: ChartConfig = BarConfig {
        sort_x_axis_by: "w".to_string(),
        sort_descending: true,
        ..bar("cat", &["v", "w"])
    }
    .into();
    let data = engine
        .registry()
        .resolve(ChartType::Bar)
        .unwrap()
        .process_data(&sales_rows(), &config);
    let labels: Vec<&str> = metrics(&data).iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B"]);

    let ascending: ChartConfig = BarConfig {
        sort_x_axis_by: "w".to_string(),
        ..bar("cat", &["v", "w"])
    }
    .into();
    let data = engine
        .registry()
        .resolve(ChartType::Bar)
        .unwrap()
        .process_data(&sales_rows(), &ascending);
    let labels: Vec<&str> = metrics(&data).iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["B", "A"]);
}

#[test]
fn test_bar_label_sort_is_numeric_for_numeric_labels() {
    let rows = rows_from_json(&json!([
        {"month": 10, "v": 1},
        {"month": 9, "v": 1},
        {"month": 11, "v": 1}
    ]));
    let config: ChartConfig = BarConfig {
        sort_x_axis_by: "label".to_string(),
        ..bar("month", &["v"])
    }
    .into();
    let data = ChartEngine::new()
        .registry()
        .resolve(ChartType::Bar)
        .unwrap()
        .process_data(&rows, &config);
    let labels: Vec<&str> = metrics(&data).iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["9", "10", "11"]);
}

#[test]
fn test_bar_filter_selects_rows_and_bad_filter_falls_back() {
    let engine = ChartEngine::new();
    let strategy = engine.registry().resolve(ChartType::Bar).unwrap();

    let filtered: ChartConfig = BarConfig {
        filter: "row.v >= 2".to_string(),
        ..bar("cat", &["v"])
    }
    .into();
    let (data, report) = strategy.process_data_with_diagnostics(&sales_rows(), &filtered);
    assert_eq!(metrics(&data).len(), 2);
    assert_eq!(metrics(&data)[0].value("v"), 2.0);
    assert!(!report.filter_fallback);

    let broken: ChartConfig = BarConfig {
        filter: "row.v >=".to_string(),
        ..bar("cat", &["v"])
    }
    .into();
    let (data, report) = strategy.process_data_with_diagnostics(&sales_rows(), &broken);
    assert_eq!(metrics(&data)[0].value("v"), 3.0);
    assert!(report.filter_fallback);
}

#[test]
fn test_bar_render_uses_palette_in_series_order() {
    let engine = ChartEngine::new();
    let config: ChartConfig = BarConfig {
        horizontal: true,
        stacked: true,
        ..bar("cat", &["v", "w"])
    }
    .into();
    let render = engine.render(&sales_rows(), &config).unwrap();
    assert_eq!(render.kind, RenderKind::Bar);
    assert_eq!(render.labels(), &["A".to_string(), "B".to_string()]);
    let series = render.series();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].background_color, ColorSpec::Single("#3B82F6".to_string()));
    assert_eq!(series[1].background_color, ColorSpec::Single("#EF4444".to_string()));
    assert_eq!(series[0].border_color, ColorSpec::Single("#084fc3".to_string()));
    assert_eq!(series[0].data, vec![3.0, 5.0]);
    assert_eq!(series[1].data, vec![30.0, 1.0]);
    assert_eq!(render.options.index_axis, Some(Axis::Y));
    let scales = render.options.scales.as_ref().unwrap();
    assert!(scales.x.stacked && scales.y.stacked);
    assert!(render.options.plugins.legend.display);
}

#[test]
fn test_bar_coercion_is_reported() {
    let rows = rows_from_json(&json!([
        {"cat": "A", "v": "abc"},
        {"cat": "A", "v": ""},
        {"cat": "B"}
    ]));
    let config: ChartConfig = bar("cat", &["v"]).into();
    let (data, report) = ChartEngine::new()
        .registry()
        .resolve(ChartType::Bar)
        .unwrap()
        .process_data_with_diagnostics(&rows, &config);
    assert!(metrics(&data).iter().all(|g| g.value("v") == 0.0));
    assert_eq!(report.coerced_to_zero, 1);
    assert_eq!(report.missing_values, 2);
    assert_eq!(report.rows_in, 3);
    assert_eq!(report.rows_out, 2);
}

#[test]
fn test_line_sorts_by_x_and_keeps_each_row() {
    let rows = rows_from_json(&json!([
        {"day": "2024-01-03", "temp": 3},
        {"day": "2024-01-01", "temp": 1},
        {"day": "2024-01-02", "temp": "n/a"}
    ]));
    let config: ChartConfig = LineConfig {
        base: base("Temperature"),
        x_axis: vec!["day".to_string()],
        y_axis: vec!["temp".to_string()],
        smooth: true,
        fill_area: true,
        ..LineConfig::default()
    }
    .into();
    let render = ChartEngine::new().render(&rows, &config).unwrap();
    assert_eq!(render.kind, RenderKind::Line);
    assert_eq!(
        render.labels(),
        &["2024-01-01".to_string(), "2024-01-02".to_string(), "2024-01-03".to_string()]
    );
    let series = &render.series()[0];
    assert_eq!(series.data, vec![1.0, 0.0, 3.0]);
    assert_eq!(series.tension, Some(0.4));
    assert_eq!(series.fill, Some(true));
    assert_eq!(series.border_color, ColorSpec::Single("#3B82F6".to_string()));
    assert_ne!(series.background_color, ColorSpec::Single("transparent".to_string()));
}

#[test]
fn test_line_without_fill_is_transparent_and_straight() {
    let rows = rows_from_json(&json!([{"x": 2, "y": 1}, {"x": 1, "y": 2}]));
    let config: ChartConfig = LineConfig {
        base: base("Trend"),
        x_axis: vec!["x".to_string()],
        y_axis: vec!["y".to_string()],
        ..LineConfig::default()
    }
    .into();
    let render = ChartEngine::new().render(&rows, &config).unwrap();
    let series = &render.series()[0];
    assert_eq!(series.data, vec![2.0, 1.0]);
    assert_eq!(series.tension, Some(0.0));
    assert_eq!(series.background_color, ColorSpec::Single("transparent".to_string()));
}

#[test]
fn test_pie_ignores_non_numeric_values() {
    let rows = rows_from_json(&json!([{"c": "x", "val": "abc"}, {"c": "x", "val": 10}]));
    let config: ChartConfig = PieConfig {
        base: base("Share"),
        category: "c".to_string(),
        value: "val".to_string(),
        ..PieConfig::default()
    }
    .into();
    let data = ChartEngine::new()
        .registry()
        .resolve(ChartType::Pie)
        .unwrap()
        .process_data(&rows, &config);
    assert_eq!(
        data,
        IntermediateData::Categories(vec![CategoryTotal {
            category: "x".to_string(),
            sum: 10.0
        }])
    );
}

#[test]
fn test_pie_render_colours_each_slice() {
    let rows = rows_from_json(&json!([
        {"c": "a", "val": 1},
        {"c": "b", "val": 2},
        {"c": "c", "val": 3}
    ]));
    let config: ChartConfig = PieConfig {
        base: base("Share"),
        category: "c".to_string(),
        value: "val".to_string(),
        donut: true,
        ..PieConfig::default()
    }
    .into();
    let render = ChartEngine::new().render(&rows, &config).unwrap();
    assert_eq!(render.kind, RenderKind::Doughnut);
    let slices = &render.series()[0];
    assert_eq!(slices.label, None);
    match &slices.background_color {
        PerItem::Each(colors) => {
            assert_eq!(colors, &vec!["#3B82F6".to_string(), "#EF4444".to_string(), "#10B981".to_string()])
        }
        other => panic!("expected per-slice colours, got {other:?}"),
    }
    assert_eq!(slices.border_width, 2);
}

#[test]
fn test_scatter_drops_invalid_points() {
    let rows = rows_from_json(&json!([{"x": 1, "y": 2}, {"x": "bad", "y": 3}]));
    let config: ChartConfig = ScatterConfig {
        base: base("Spread"),
        x_axis: vec!["x".to_string()],
        y_axis: vec!["y".to_string()],
        ..ScatterConfig::default()
    }
    .into();
    let (data, report) = ChartEngine::new()
        .registry()
        .resolve(ChartType::Scatter)
        .unwrap()
        .process_data_with_diagnostics(&rows, &config);
    let IntermediateData::Scatter(series) = &data else {
        panic!("expected scatter series, got {data:?}");
    };
    let series: &Vec<ScatterSeries> = series;
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].points.len(), 1);
    assert_eq!((series[0].points[0].x, series[0].points[0].y), (1.0, 2.0));
    assert_eq!(report.dropped_rows, 1);
}

#[test]
fn test_scatter_render_uses_linear_scales() {
    let rows = rows_from_json(&json!([{"x": 1, "y": 2, "s": 1}, {"x": 2, "y": 4, "s": 9}]));
    let config: ChartConfig = ScatterConfig {
        base: base("Spread"),
        x_axis: vec!["x".to_string()],
        y_axis: vec!["y".to_string()],
        size: "s".to_string(),
        ..ScatterConfig::default()
    }
    .into();
    let render = ChartEngine::new().render(&rows, &config).unwrap();
    assert_eq!(render.kind, RenderKind::Scatter);
    let points = render.point_series();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].data.len(), 2);
    assert_eq!(points[0].point_radius, PerItem::Each(vec![3.0, 15.0]));
    let scales = render.options.scales.as_ref().unwrap();
    assert_eq!(scales.x.scale_type.as_deref(), Some("linear"));
}

fn card(field: &str, aggregation: Aggregation, filter: &str) -> ChartConfig {
    CardConfig {
        base: base("Revenue"),
        field: field.to_string(),
        aggregation,
        filter: filter.to_string(),
        decimal_places: 2,
        ..CardConfig::default()
    }
    .into()
}

fn card_value(rows: &[Row], config: &ChartConfig) -> CardValue {
    match ChartEngine::new()
        .registry()
        .resolve(ChartType::Card)
        .unwrap()
        .process_data(rows, config)
    {
        IntermediateData::Card(value) => value,
        other => panic!("expected card value, got {other:?}"),
    }
}

#[test]
fn test_card_bad_filter_uses_every_row() {
    let rows = sales_rows();
    let value = card_value(&rows, &card("v", Aggregation::Sum, "row.cat.nope()"));
    assert_eq!(value.value, 8.0);
    assert_eq!(value.matched_rows, 3);
    assert!(!value.filter_applied);

    let value = card_value(&rows, &card("v", Aggregation::Sum, "row.cat.length.includes('x')"));
    assert_eq!(value.value, 8.0);
}

#[test]
fn test_card_aggregations() {
    let rows = sales_rows();
    assert_eq!(card_value(&rows, &card("v", Aggregation::Avg, "")).value, 8.0 / 3.0);
    assert_eq!(card_value(&rows, &card("v", Aggregation::Min, "")).value, 1.0);
    assert_eq!(card_value(&rows, &card("v", Aggregation::Max, "")).value, 5.0);
    assert_eq!(card_value(&rows, &card("v", Aggregation::Count, "")).value, 3.0);
    let filtered = card_value(&rows, &card("v", Aggregation::Count, "row.cat === 'A'"));
    assert_eq!(filtered.value, 2.0);
    assert!(filtered.filter_applied);
}

#[test]
fn test_card_empty_input_is_zero() {
    for aggregation in [Aggregation::Sum, Aggregation::Avg, Aggregation::Min, Aggregation::Max] {
        assert_eq!(card_value(&[], &card("v", aggregation, "")).value, 0.0);
    }
}

#[test]
fn test_card_render_formats_value() {
    let render = ChartEngine::new()
        .render(&sales_rows(), &card("v", Aggregation::Avg, ""))
        .unwrap();
    assert_eq!(render.kind, RenderKind::Card);
    let RenderData::Card(display) = &render.data else {
        panic!("expected card display");
    };
    assert_eq!(display.formatted_value, "2.67");
    assert_eq!(display.aggregation, "avg");
    assert!(!render.options.plugins.legend.display);
}

#[test]
fn test_card_render_caps_huge_precision() {
    let ChartConfig::Card(mut config) = card("v", Aggregation::Max, "") else {
        panic!("expected card config");
    };
    config.decimal_places = 4_000_000_000;
    let render = ChartEngine::new().render(&sales_rows(), &config.into()).unwrap();
    let RenderData::Card(display) = &render.data else {
        panic!("expected card display");
    };
    assert_eq!(display.formatted_value.len(), 102);
    assert!(display.formatted_value.starts_with("5.00"));
    assert_eq!(display.decimal_places, 100);
}

fn table(columns: &[&str], filter: &str, row_limit: usize) -> ChartConfig {
    TableConfig {
        base: base("Rows"),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        filter: filter.to_string(),
        row_limit,
        ..TableConfig::default()
    }
    .into()
}

#[test]
fn test_table_filters_projects_and_limits() {
    let rows = rows_from_json(&json!([
        {"name": "Alpha", "team": "red", "score": 1},
        {"name": "beta", "team": "Blue", "score": 2},
        {"name": "gamma", "team": "blue", "score": 3}
    ]));
    let render = ChartEngine::new()
        .render(&rows, &table(&["name", "team", "missing"], "BLUE", 10))
        .unwrap();
    assert_eq!(render.kind, RenderKind::Table);
    let RenderData::Table { columns, rows: shown } = &render.data else {
        panic!("expected table data");
    };
    assert_eq!(columns, &vec!["name".to_string(), "team".to_string(), "missing".to_string()]);
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0].get("name"), Some(&Value::from("beta")));
    assert_eq!(shown[0].get("missing"), Some(&Value::Null));
    assert!(!shown[0].contains("score"));

    let limited = ChartEngine::new()
        .render(&rows, &table(&["name"], "", 1))
        .unwrap();
    let RenderData::Table { rows: shown, .. } = &limited.data else {
        panic!("expected table data");
    };
    assert_eq!(shown.len(), 1);
}

#[test]
fn test_table_only_searches_selected_columns() {
    let rows = rows_from_json(&json!([{"name": "Alpha", "team": "red"}]));
    let render = ChartEngine::new()
        .render(&rows, &table(&["name"], "red", 10))
        .unwrap();
    let RenderData::Table { rows: shown, .. } = &render.data else {
        panic!("expected table data");
    };
    assert!(shown.is_empty());
}

#[test]
fn test_strategy_ignores_config_of_another_type() {
    let engine = ChartEngine::new();
    let rows = sales_rows();
    let pie_strategy = engine.registry().resolve(ChartType::Pie).unwrap();
    let bar_config: ChartConfig = bar("cat", &["v"]).into();
    assert!(!pie_strategy.validate_config(&bar_config));
    assert_eq!(
        pie_strategy.process_data(&rows, &bar_config),
        IntermediateData::Rows(rows.clone())
    );
    let data = engine
        .registry()
        .resolve(ChartType::Bar)
        .unwrap()
        .process_data(&rows, &bar_config);
    assert!(pie_strategy
        .transform_to_chart_options(&data, &bar_config)
        .is_empty());
}

#[test]
fn test_line_sorts_mixed_x_values_without_panicking() {
    let rows: Vec<Row> = (0..5000)
        .map(|i| {
            let x = match i % 3 {
                0 => Value::from(format!("t{}", i % 200)),
                1 => Value::from(i % 90),
                _ => Value::from((i % 70).to_string()),
            };
            Row::from_pairs([("x", x), ("y", Value::from(i))])
        })
        .collect();
    let config: ChartConfig = LineConfig {
        base: base("Mixed"),
        x_axis: vec!["x".to_string()],
        y_axis: vec!["y".to_string()],
        ..LineConfig::default()
    }
    .into();
    let render = ChartEngine::new().render(&rows, &config).unwrap();
    let labels = render.labels();
    assert_eq!(labels.len(), 5000);
    assert_eq!(labels[0], "0");
    assert!(labels[labels.len() - 1].starts_with('t'));
}

#[test]
fn test_bar_label_sort_handles_mixed_labels() {
    let rows: Vec<Row> = (0..3000)
        .map(|i| {
            let label = match i % 3 {
                0 => format!("{}", i % 50),
                1 => format!("{}a", i % 50),
                _ => format!("{}.{}x", i % 50, i % 7),
            };
            Row::from_pairs([("cat", Value::from(label)), ("v", Value::from(1))])
        })
        .collect();
    let config: ChartConfig = BarConfig {
        sort_x_axis_by: "label".to_string(),
        ..bar("cat", &["v"])
    }
    .into();
    let render = ChartEngine::new().render(&rows, &config).unwrap();
    let labels = render.labels();
    assert_eq!(labels[0], "0");
    assert_eq!(labels[1], "1");
    let first_text = labels.iter().position(|l| l.ends_with('a') || l.ends_with('x')).unwrap();
    assert_eq!(first_text, 50);
}
