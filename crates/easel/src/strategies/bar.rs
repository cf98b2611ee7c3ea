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

use crate::chart::render::{
    Axis, AxisScale, ColorSpec, DisplayOptions, Legend, RenderData, RenderKind, Scales,
    SeriesDataset,
};
use crate::chart::{
    BarConfig, ChartCategory, ChartDescriptor, ChartExample, ChartType, DataRequirements,
    FieldConstraint, LabelledMetrics, Layout, Palette, RenderOptions, ValidationRules,
};
use crate::data::{CoercionReport, ColumnType, Row};
use crate::settings::EngineSettings;
use crate::strategies::{compare_labels, filter_rows, label_of, ChartStrategy};
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

pub const SORT_BY_LABEL: &str = "label";
#[derive(Debug, Clone, Default)]
pub struct BarStrategy {
    settings: Arc<EngineSettings>,
}
impl BarStrategy {
    pub fn new(settings: Arc<EngineSettings>) -> Self {
        Self { settings }
    }
    fn sort(&self, groups: &mut [LabelledMetrics], config: &BarConfig) {
        let key = config.sort_x_axis_by.trim();
        if key.is_empty() {
            return;
        }
        if key == SORT_BY_LABEL {
            groups.sort_by(|a, b| compare_labels(&a.label, &b.label));
        } else if config.y_axis.iter().any(|y| y == key) {
            groups.sort_by(|a, b| a.value(key).total_cmp(&b.value(key)));
        } else {
            return;
        }
        if config.sort_descending {
            groups.reverse();
        }
    }
}
impl ChartStrategy for BarStrategy {
    type Config = BarConfig;
    type Intermediate = Vec<LabelledMetrics>;
    const CHART_TYPE: ChartType = ChartType::Bar;
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }
    fn descriptor(&self) -> ChartDescriptor {
        ChartDescriptor {
            chart_type: ChartType::Bar,
            label: "Bar Chart",
            description: "Compare values across categories with vertical or horizontal bars",
            icon: "ChartBarIcon",
            category: ChartCategory::Basic,
        }
    }
    fn default_config(&self) -> BarConfig {
        BarConfig::default()
    }
    fn validate(&self, config: &BarConfig) -> bool {
        config.base.is_complete() && !config.x_axis.is_empty() && !config.y_axis.is_empty()
    }
    fn default_layout(&self) -> Layout {
        Layout::new(6, 4)
    }
    fn min_layout(&self) -> Layout {
        Layout::new(3, 3)
    }
    fn max_layout(&self) -> Layout {
        Layout::new(12, 8)
    }
    fn data_requirements(&self) -> DataRequirements {
        DataRequirements {
            min_rows: 1,
            max_rows: Some(1000),
            min_columns: 2,
            max_columns: 10,
        }
    }
    fn required_fields(&self) -> &'static [&'static str] {
        &["xAxis", "yAxis"]
    }
    fn optional_fields(&self) -> &'static [&'static str] {
        &["horizontal", "stacked", "backgroundColor", "borderColor", "colorScheme"]
    }
    fn supported_data_types(&self) -> &'static [ColumnType] {
        &[ColumnType::String, ColumnType::Number, ColumnType::Date]
    }
    fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            required: vec!["xAxis", "yAxis"],
            optional: vec!["horizontal", "stacked"],
            constraints: IndexMap::from([
                ("xAxis", FieldConstraint::length(1, 1)),
                ("yAxis", FieldConstraint::length(1, 5)),
            ]),
        }
    }
    fn help_text(&self) -> &'static str {
        "A bar chart compares values across categories.\n\
         1. Pick the x-axis field (the category).\n\
         2. Pick one or more y-axis fields (the values).\n\
         3. Adjust colours and layout.\n\
         4. Enable \"horizontal\" to draw the bars sideways.\n\
         5. Enable \"stacked\" to stack the series on top of each other."
    }
    fn examples(&self) -> Vec<ChartExample> {
        vec![
            ChartExample {
                name: "Monthly sales",
                description: "Bar chart of sales for each month",
                config: json!({
                    "title": "Monthly sales",
                    "xAxis": ["month"],
                    "yAxis": ["sales"],
                    "horizontal": false,
                    "stacked": false
                }),
            },
            ChartExample {
                name: "Product comparison",
                description: "Horizontal bar chart comparing revenue by product",
                config: json!({
                    "title": "Product comparison",
                    "xAxis": ["product"],
                    "yAxis": ["revenue"],
                    "horizontal": true,
                    "stacked": false
                }),
            },
        ]
    }
    fn process(
        &self,
        rows: &[Row],
        config: &BarConfig,
        report: &mut CoercionReport,
    ) -> Vec<LabelledMetrics> {
        let filtered = filter_rows(Self::CHART_TYPE, rows, &config.filter, &self.settings, report);
        let x_field = config.x_axis.first();
        let mut groups: IndexMap<String, LabelledMetrics> = IndexMap::new();
        for row in filtered.rows {
            let label = label_of(row, x_field);
            let group = groups
                .entry(label.clone())
                .or_insert_with(|| LabelledMetrics::new(label));
            for y_field in &config.y_axis {
                let amount = report.coerce(row.get(y_field));
                *group.values.entry(y_field.clone()).or_insert(0.0) += amount;
            }
        }
        let mut groups: Vec<LabelledMetrics> = groups.into_values().collect();
        self.sort(&mut groups, config);
        groups
    }
    fn transform(&self, data: &Vec<LabelledMetrics>, config: &BarConfig) -> RenderOptions {
        let palette = Palette::from_scheme(&config.base.color_scheme);
        let labels = data.iter().map(|item| item.label.clone()).collect();
        let datasets = config
            .y_axis
            .iter()
            .enumerate()
            .map(|(index, y_field)| {
                SeriesDataset::new(
                    Some(y_field.clone()),
                    data.iter().map(|item| item.value(y_field)).collect(),
                    ColorSpec::Single(palette.color(index).to_string()),
                    ColorSpec::Single(palette.border(index)),
                )
            })
            .collect();
        let mut options = DisplayOptions::titled(&config.base.title, Legend::shown(config.show_legend))
            .with_scales(Scales {
                x: AxisScale::from_zero(true).stacked(config.stacked),
                y: AxisScale::from_zero(true).stacked(config.stacked),
            });
        options.index_axis = Some(if config.horizontal { Axis::Y } else { Axis::X });
        RenderOptions {
            kind: RenderKind::Bar,
            data: RenderData::Series { labels, datasets },
            options,
        }
    }
}
