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
    AxisScale, DisplayOptions, Legend, PerItem, Point, PointDataset, RenderData, RenderKind, Scales,
};
use crate::chart::{
    ChartCategory, ChartDescriptor, ChartExample, ChartType, DataRequirements, FieldConstraint,
    Layout, Palette, RenderOptions, ScatterConfig, ScatterPoint, ScatterSeries, ValidationRules,
    ValueKind,
};
use crate::data::{CoercionReport, ColumnType, Row};
use crate::settings::EngineSettings;
use crate::strategies::ChartStrategy;
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

pub const POINT_RADIUS: f64 = 4.0;
pub const SIZED_POINT_RADIUS: f64 = 6.0;
pub const MIN_SIZED_RADIUS: f64 = 3.0;
pub const MAX_SIZED_RADIUS: f64 = 15.0;
#[derive(Debug, Clone, Default)]
pub struct ScatterStrategy {
    settings: Arc<EngineSettings>,
}
impl ScatterStrategy {
    pub fn new(settings: Arc<EngineSettings>) -> Self {
        Self { settings }
    }
}
/// Maps sizes linearly onto the radius range. Points without a numeric size,
/// and every point when all sizes are equal, get the default sized radius.
fn scale_radii(series: &[ScatterSeries]) -> Vec<Vec<f64>> {
    let sizes = series.iter().flat_map(|s| s.points.iter().filter_map(|p| p.size));
    let (min, max) = sizes.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s), hi.max(s))
    });
    let span = max - min;
    series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .map(|p| match p.size {
                    Some(size) if span.is_finite() && span > 0.0 => {
                        MIN_SIZED_RADIUS + (size - min) / span * (MAX_SIZED_RADIUS - MIN_SIZED_RADIUS)
                    }
                    _ => SIZED_POINT_RADIUS,
                })
                .collect()
        })
        .collect()
}
impl ChartStrategy for ScatterStrategy {
    type Config = ScatterConfig;
    type Intermediate = Vec<ScatterSeries>;
    const CHART_TYPE: ChartType = ChartType::Scatter;
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }
    fn descriptor(&self) -> ChartDescriptor {
        ChartDescriptor {
            chart_type: ChartType::Scatter,
            label: "Scatter Chart",
            description: "Show the relationship between two numeric variables",
            icon: "CircleStackIcon",
            category: ChartCategory::Basic,
        }
    }
    fn default_config(&self) -> ScatterConfig {
        ScatterConfig::default()
    }
    fn validate(&self, config: &ScatterConfig) -> bool {
        config.base.is_complete() && !config.x_axis.is_empty() && !config.y_axis.is_empty()
    }
    fn default_layout(&self) -> Layout {
        Layout::new(4, 3)
    }
    fn min_layout(&self) -> Layout {
        Layout::new(3, 3)
    }
    fn max_layout(&self) -> Layout {
        Layout::new(12, 8)
    }
    fn data_requirements(&self) -> DataRequirements {
        DataRequirements {
            min_rows: 2,
            max_rows: Some(5000),
            min_columns: 2,
            max_columns: 3,
        }
    }
    fn required_fields(&self) -> &'static [&'static str] {
        &["xAxis", "yAxis"]
    }
    fn optional_fields(&self) -> &'static [&'static str] {
        &["size", "backgroundColor", "borderColor", "colorScheme"]
    }
    fn supported_data_types(&self) -> &'static [ColumnType] {
        &[ColumnType::Number]
    }
    fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            required: vec!["xAxis", "yAxis"],
            optional: vec!["size"],
            constraints: IndexMap::from([
                ("xAxis", FieldConstraint::length(1, 1)),
                ("yAxis", FieldConstraint::length(1, 3)),
                ("size", FieldConstraint::kind(ValueKind::Number)),
            ]),
        }
    }
    fn help_text(&self) -> &'static str {
        "A scatter chart plots one numeric variable against another.\n\
         1. Pick a numeric x-axis field.\n\
         2. Pick one or more numeric y-axis fields.\n\
         3. Optionally pick a size field to scale each point.\n\
         Rows whose x or y value is not a number are left out."
    }
    fn examples(&self) -> Vec<ChartExample> {
        vec![
            ChartExample {
                name: "Price against units sold",
                description: "Scatter chart relating price to quantity",
                config: json!({
                    "title": "Price against units sold",
                    "xAxis": ["price"],
                    "yAxis": ["quantity"]
                }),
            },
            ChartExample {
                name: "Marketing spend and revenue",
                description: "Scatter chart sized by customer count",
                config: json!({
                    "title": "Marketing spend and revenue",
                    "xAxis": ["spend"],
                    "yAxis": ["revenue"],
                    "size": "customers"
                }),
            },
        ]
    }
    fn process(
        &self,
        rows: &[Row],
        config: &ScatterConfig,
        report: &mut CoercionReport,
    ) -> Vec<ScatterSeries> {
        let size_field = Some(config.size.trim()).filter(|s| !s.is_empty());
        let mut series: Vec<ScatterSeries> = config
            .y_axis
            .iter()
            .map(|field| ScatterSeries {
                field: field.clone(),
                points: Vec::new(),
            })
            .collect();
        let Some(x_field) = config.x_axis.first() else {
            rows.iter().for_each(|_| report.drop_row());
            return series;
        };
        for row in rows {
            let x = row.get(x_field).and_then(|v| v.finite_number());
            let mut used = false;
            for target in series.iter_mut() {
                let y = row.get(&target.field).and_then(|v| v.finite_number());
                if let (Some(x), Some(y)) = (x, y) {
                    let size = size_field
                        .and_then(|f| row.get(f))
                        .and_then(|v| v.finite_number());
                    target.points.push(ScatterPoint { x, y, size });
                    used = true;
                }
            }
            if !used {
                report.drop_row();
            }
        }
        series
    }
    fn transform(&self, data: &Vec<ScatterSeries>, config: &ScatterConfig) -> RenderOptions {
        let palette = Palette::from_scheme(&config.base.color_scheme);
        let sized = !config.size.trim().is_empty();
        let radii = sized.then(|| scale_radii(data));
        let datasets = data
            .iter()
            .enumerate()
            .map(|(index, series)| PointDataset {
                label: series.field.clone(),
                data: series.points.iter().map(|p| Point { x: p.x, y: p.y }).collect(),
                background_color: palette.color(index).to_string(),
                border_color: palette.color(index).to_string(),
                border_width: 1,
                point_radius: match &radii {
                    Some(radii) => PerItem::Each(radii[index].clone()),
                    None => PerItem::Single(POINT_RADIUS),
                },
            })
            .collect();
        RenderOptions {
            kind: RenderKind::Scatter,
            data: RenderData::Points { datasets },
            options: DisplayOptions::titled(&config.base.title, Legend::shown(true)).with_scales(
                Scales {
                    x: AxisScale::linear(),
                    y: AxisScale::linear(),
                },
            ),
        }
    }
}
