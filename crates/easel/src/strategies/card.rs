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

use crate::chart::render::{CardDisplay, DisplayOptions, Legend, RenderData, RenderKind};
use crate::chart::{
    CardConfig, CardValue, ChartCategory, ChartDescriptor, ChartExample, ChartType,
    DataRequirements, FieldConstraint, Layout, RenderOptions, ValidationRules, ValueKind,
};
use crate::data::{CoercionReport, ColumnType, Row};
use crate::settings::EngineSettings;
use crate::strategies::{filter_rows, ChartStrategy};
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CardStrategy {
    settings: Arc<EngineSettings>,
}
impl CardStrategy {
    pub fn new(settings: Arc<EngineSettings>) -> Self {
        Self { settings }
    }
}
/// Precision ceiling for fixed-point card values.
pub const MAX_DECIMAL_PLACES: u32 = 100;
pub fn format_fixed(value: f64, decimal_places: u32) -> String {
    format!("{:.*}", decimal_places.min(MAX_DECIMAL_PLACES) as usize, value)
}
impl ChartStrategy for CardStrategy {
    type Config = CardConfig;
    type Intermediate = CardValue;
    const CHART_TYPE: ChartType = ChartType::Card;
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }
    fn descriptor(&self) -> ChartDescriptor {
        ChartDescriptor {
            chart_type: ChartType::Card,
            label: "Card Chart",
            description: "Show a single KPI value as a card",
            icon: "Squares2X2Icon",
            category: ChartCategory::Basic,
        }
    }
    fn default_config(&self) -> CardConfig {
        CardConfig::default()
    }
    fn validate(&self, config: &CardConfig) -> bool {
        config.base.is_complete() && !config.field.trim().is_empty()
    }
    fn default_layout(&self) -> Layout {
        Layout::new(3, 2)
    }
    fn min_layout(&self) -> Layout {
        Layout::new(2, 2)
    }
    fn max_layout(&self) -> Layout {
        Layout::new(6, 4)
    }
    fn data_requirements(&self) -> DataRequirements {
        DataRequirements {
            min_rows: 1,
            max_rows: None,
            min_columns: 1,
            max_columns: 1,
        }
    }
    fn required_fields(&self) -> &'static [&'static str] {
        &["field"]
    }
    fn optional_fields(&self) -> &'static [&'static str] {
        &["aggregation", "decimalPlaces", "filter", "subHeader", "colorScheme"]
    }
    fn supported_data_types(&self) -> &'static [ColumnType] {
        &[ColumnType::Number]
    }
    fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            required: vec!["field"],
            optional: vec!["aggregation", "decimalPlaces", "filter", "subHeader"],
            constraints: IndexMap::from([
                ("field", FieldConstraint::kind(ValueKind::Number)),
                ("decimalPlaces", FieldConstraint::kind(ValueKind::Number)),
            ]),
        }
    }
    fn help_text(&self) -> &'static str {
        "A card shows one headline number.\n\
         1. Pick the numeric field to summarise.\n\
         2. Choose the aggregation: sum, avg, min, max or count.\n\
         3. Optionally restrict the rows with a filter such as `region == 'North'`.\n\
         4. Set the number of decimal places and an optional sub-header.\n\
         If the filter cannot be evaluated every row is used."
    }
    fn examples(&self) -> Vec<ChartExample> {
        vec![
            ChartExample {
                name: "Total revenue",
                description: "Card with the sum of all revenue",
                config: json!({
                    "title": "Total revenue",
                    "field": "revenue",
                    "aggregation": "sum",
                    "decimalPlaces": 0
                }),
            },
            ChartExample {
                name: "Average order value in the north",
                description: "Card averaging order value for one region",
                config: json!({
                    "title": "Average order value",
                    "field": "order_value",
                    "aggregation": "avg",
                    "decimalPlaces": 2,
                    "filter": "region == 'North'",
                    "subHeader": "North region"
                }),
            },
        ]
    }
    fn process(&self, rows: &[Row], config: &CardConfig, report: &mut CoercionReport) -> CardValue {
        let filtered = filter_rows(Self::CHART_TYPE, rows, &config.filter, &self.settings, report);
        let values: Vec<f64> = filtered
            .rows
            .iter()
            .map(|row| report.coerce(row.get(&config.field)))
            .collect();
        CardValue {
            value: config.aggregation.apply(&values),
            field: config.field.clone(),
            aggregation: config.aggregation,
            decimal_places: config.decimal_places.min(MAX_DECIMAL_PLACES),
            sub_header: config.sub_header.clone(),
            matched_rows: values.len(),
            filter_applied: filtered.applied,
        }
    }
    fn transform(&self, data: &CardValue, config: &CardConfig) -> RenderOptions {
        RenderOptions {
            kind: RenderKind::Card,
            data: RenderData::Card(CardDisplay {
                title: config.base.title.clone(),
                value: data.value,
                formatted_value: format_fixed(data.value, data.decimal_places),
                field: data.field.clone(),
                aggregation: data.aggregation.as_str().to_string(),
                sub_header: data.sub_header.clone(),
                decimal_places: data.decimal_places,
                matched_rows: data.matched_rows,
                filter_applied: data.filter_applied,
            }),
            options: DisplayOptions::titled(&config.base.title, Legend::shown(false)),
        }
    }
}
