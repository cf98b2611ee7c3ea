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

use crate::chart::render::{ColorSpec, DisplayOptions, Legend, RenderData, RenderKind, SeriesDataset};
use crate::chart::{
    CategoryTotal, ChartCategory, ChartDescriptor, ChartExample, ChartType, DataRequirements,
    FieldConstraint, Layout, Palette, PieConfig, RenderOptions, ValidationRules, ValueKind,
};
use crate::data::{CoercionReport, ColumnType, Row};
use crate::settings::EngineSettings;
use crate::strategies::{label_of, ChartStrategy};
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PieStrategy {
    settings: Arc<EngineSettings>,
}
impl PieStrategy {
    pub fn new(settings: Arc<EngineSettings>) -> Self {
        Self { settings }
    }
}
impl ChartStrategy for PieStrategy {
    type Config = PieConfig;
    type Intermediate = Vec<CategoryTotal>;
    const CHART_TYPE: ChartType = ChartType::Pie;
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }
    fn descriptor(&self) -> ChartDescriptor {
        ChartDescriptor {
            chart_type: ChartType::Pie,
            label: "Pie Chart",
            description: "Show each category's share of a total",
            icon: "ChartPieIcon",
            category: ChartCategory::Basic,
        }
    }
    fn default_config(&self) -> PieConfig {
        PieConfig::default()
    }
    fn validate(&self, config: &PieConfig) -> bool {
        config.base.is_complete()
            && !config.category.trim().is_empty()
            && !config.value.trim().is_empty()
    }
    fn default_layout(&self) -> Layout {
        Layout::new(4, 4)
    }
    fn min_layout(&self) -> Layout {
        Layout::new(3, 3)
    }
    fn max_layout(&self) -> Layout {
        Layout::new(8, 8)
    }
    fn data_requirements(&self) -> DataRequirements {
        DataRequirements {
            min_rows: 1,
            max_rows: Some(50),
            min_columns: 2,
            max_columns: 10,
        }
    }
    fn required_fields(&self) -> &'static [&'static str] {
        &["category", "value"]
    }
    fn optional_fields(&self) -> &'static [&'static str] {
        &["donut", "backgroundColor", "borderColor", "colorScheme"]
    }
    fn supported_data_types(&self) -> &'static [ColumnType] {
        &[ColumnType::String, ColumnType::Number]
    }
    fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            required: vec!["category", "value"],
            optional: vec!["donut"],
            constraints: IndexMap::from([
                ("category", FieldConstraint::kind(ValueKind::String)),
                ("value", FieldConstraint::kind(ValueKind::Number)),
            ]),
        }
    }
    fn help_text(&self) -> &'static str {
        "A pie chart shows each category's share of the whole.\n\
         1. Pick the category field.\n\
         2. Pick the value field.\n\
         3. Adjust colours and layout.\n\
         4. Enable \"donut\" to draw a ring instead of a full pie.\n\
         Works best with fewer than ten categories."
    }
    fn examples(&self) -> Vec<ChartExample> {
        vec![
            ChartExample {
                name: "Sales by region",
                description: "Pie chart of each region's share of sales",
                config: json!({
                    "title": "Sales by region",
                    "category": "region",
                    "value": "sales",
                    "donut": false
                }),
            },
            ChartExample {
                name: "Units sold by product",
                description: "Donut chart of the product mix",
                config: json!({
                    "title": "Units sold by product",
                    "category": "product",
                    "value": "quantity",
                    "donut": true
                }),
            },
        ]
    }
    fn process(
        &self,
        rows: &[Row],
        config: &PieConfig,
        report: &mut CoercionReport,
    ) -> Vec<CategoryTotal> {
        let mut totals: IndexMap<String, f64> = IndexMap::new();
        for row in rows {
            let category = label_of(row, Some(&config.category));
            let amount = report.coerce(row.get(&config.value));
            *totals.entry(category).or_insert(0.0) += amount;
        }
        totals
            .into_iter()
            .map(|(category, sum)| CategoryTotal { category, sum })
            .collect()
    }
    fn transform(&self, data: &Vec<CategoryTotal>, config: &PieConfig) -> RenderOptions {
        let palette = Palette::from_scheme(&config.base.color_scheme);
        let fills = palette.take(data.len());
        let borders = (0..data.len()).map(|i| palette.border(i)).collect();
        let mut dataset = SeriesDataset::new(
            None,
            data.iter().map(|slice| slice.sum).collect(),
            ColorSpec::Each(fills),
            ColorSpec::Each(borders),
        );
        dataset.border_width = 2;
        RenderOptions {
            kind: if config.donut {
                RenderKind::Doughnut
            } else {
                RenderKind::Pie
            },
            data: RenderData::Series {
                labels: data.iter().map(|slice| slice.category.clone()).collect(),
                datasets: vec![dataset],
            },
            options: DisplayOptions::titled(&config.base.title, Legend::top()),
        }
    }
}
