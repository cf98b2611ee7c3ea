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
    AxisScale, ColorSpec, DisplayOptions, Legend, RenderData, RenderKind, Scales, SeriesDataset,
};
use crate::chart::{
    ChartCategory, ChartDescriptor, ChartExample, ChartType, DataRequirements, FieldConstraint,
    LabelledMetrics, Layout, LineConfig, Palette, RenderOptions, ValidationRules,
};
use crate::data::{CoercionReport, ColumnType, Row, Value};
use crate::settings::EngineSettings;
use crate::strategies::{label_of, ChartStrategy};
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

const SMOOTH_TENSION: f64 = 0.4;
const FILL_ALPHA: f64 = 0.2;
#[derive(Debug, Clone, Default)]
pub struct LineStrategy {
    settings: Arc<EngineSettings>,
}
impl LineStrategy {
    pub fn new(settings: Arc<EngineSettings>) -> Self {
        Self { settings }
    }
}
impl ChartStrategy for LineStrategy {
    type Config = LineConfig;
    type Intermediate = Vec<LabelledMetrics>;
    const CHART_TYPE: ChartType = ChartType::Line;
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }
    fn descriptor(&self) -> ChartDescriptor {
        ChartDescriptor {
            chart_type: ChartType::Line,
            label: "Line Chart",
            description: "Show how values trend over time or another ordered axis",
            icon: "PresentationChartLineIcon",
            category: ChartCategory::Basic,
        }
    }
    fn default_config(&self) -> LineConfig {
        LineConfig::default()
    }
    fn validate(&self, config: &LineConfig) -> bool {
        config.base.is_complete() && !config.x_axis.is_empty() && !config.y_axis.is_empty()
    }
    fn default_layout(&self) -> Layout {
        Layout::new(8, 4)
    }
    fn min_layout(&self) -> Layout {
        Layout::new(4, 3)
    }
    fn max_layout(&self) -> Layout {
        Layout::new(12, 6)
    }
    fn data_requirements(&self) -> DataRequirements {
        DataRequirements {
            min_rows: 2,
            max_rows: Some(1000),
            min_columns: 2,
            max_columns: 10,
        }
    }
    fn required_fields(&self) -> &'static [&'static str] {
        &["xAxis", "yAxis"]
    }
    fn optional_fields(&self) -> &'static [&'static str] {
        &["smooth", "fillArea", "backgroundColor", "borderColor", "colorScheme"]
    }
    fn supported_data_types(&self) -> &'static [ColumnType] {
        &[ColumnType::String, ColumnType::Number, ColumnType::Date]
    }
    fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            required: vec!["xAxis", "yAxis"],
            optional: vec!["smooth", "fillArea"],
            constraints: IndexMap::from([
                ("xAxis", FieldConstraint::length(1, 1)),
                ("yAxis", FieldConstraint::length(1, 5)),
            ]),
        }
    }
    fn help_text(&self) -> &'static str {
        "A line chart shows how values trend over time.\n\
         1. Pick the x-axis field (a date or ordered category).\n\
         2. Pick one or more y-axis fields (the values).\n\
         3. Enable \"smooth\" to curve the lines.\n\
         4. Enable \"fill area\" to shade below each line.\n\
         5. Adjust colours and layout.\n\
         Works best when the x-axis has a natural order."
    }
    fn examples(&self) -> Vec<ChartExample> {
        vec![
            ChartExample {
                name: "Sales over time",
                description: "Line chart of the monthly sales trend",
                config: json!({
                    "title": "Sales over time",
                    "xAxis": ["month"],
                    "yAxis": ["sales"],
                    "smooth": true,
                    "fillArea": false
                }),
            },
            ChartExample {
                name: "Several metrics over time",
                description: "Line chart tracking several metrics at once",
                config: json!({
                    "title": "Several metrics over time",
                    "xAxis": ["date"],
                    "yAxis": ["revenue", "cost", "profit"],
                    "smooth": false,
                    "fillArea": true
                }),
            },
        ]
    }
    fn process(
        &self,
        rows: &[Row],
        config: &LineConfig,
        report: &mut CoercionReport,
    ) -> Vec<LabelledMetrics> {
        let x_field = config.x_axis.first();
        let missing = Value::Null;
        let mut sorted: Vec<&Row> = rows.iter().collect();
        if let Some(field) = x_field {
            sorted.sort_by(|a, b| {
                let lhs = a.get(field).unwrap_or(&missing);
                let rhs = b.get(field).unwrap_or(&missing);
                lhs.sort_cmp(rhs)
            });
        }
        sorted
            .into_iter()
            .map(|row| {
                let mut point = LabelledMetrics::new(label_of(row, x_field));
                for y_field in &config.y_axis {
                    let amount = report.coerce(row.get(y_field));
                    point.values.insert(y_field.clone(), amount);
                }
                point
            })
            .collect()
    }
    fn transform(&self, data: &Vec<LabelledMetrics>, config: &LineConfig) -> RenderOptions {
        let palette = Palette::from_scheme(&config.base.color_scheme);
        let tension = if config.smooth { SMOOTH_TENSION } else { 0.0 };
        let labels = data.iter().map(|item| item.label.clone()).collect();
        let datasets = config
            .y_axis
            .iter()
            .enumerate()
            .map(|(index, y_field)| {
                let background = if config.fill_area {
                    palette.translucent(index, FILL_ALPHA)
                } else {
                    "transparent".to_string()
                };
                SeriesDataset {
                    border_width: 2,
                    fill: Some(config.fill_area),
                    tension: Some(tension),
                    point_radius: Some(4.0),
                    point_hover_radius: Some(6.0),
                    ..SeriesDataset::new(
                        Some(y_field.clone()),
                        data.iter().map(|item| item.value(y_field)).collect(),
                        ColorSpec::Single(background),
                        ColorSpec::Single(palette.color(index).to_string()),
                    )
                }
            })
            .collect();
        RenderOptions {
            kind: RenderKind::Line,
            data: RenderData::Series { labels, datasets },
            options: DisplayOptions::titled(&config.base.title, Legend::top()).with_scales(Scales {
                x: AxisScale::from_zero(false),
                y: AxisScale::from_zero(true),
            }),
        }
    }
}
