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

use crate::data::Row;
use serde::Serialize;

/// Renderer-agnostic chart description. Field names follow the camelCase
/// shape most charting libraries accept directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    #[serde(rename = "type")]
    pub kind: RenderKind,
    pub data: RenderData,
    pub options: DisplayOptions,
}
impl RenderOptions {
    /// What a strategy returns when handed a config it does not own.
    pub fn empty() -> Self {
        Self {
            kind: RenderKind::Empty,
            data: RenderData::Empty {},
            options: DisplayOptions::default(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.kind == RenderKind::Empty
    }
    pub fn labels(&self) -> &[String] {
        match &self.data {
            RenderData::Series { labels, .. } => labels,
            _ => &[],
        }
    }
    pub fn series(&self) -> &[SeriesDataset] {
        match &self.data {
            RenderData::Series { datasets, .. } => datasets,
            _ => &[],
        }
    }
    pub fn point_series(&self) -> &[PointDataset] {
        match &self.data {
            RenderData::Points { datasets } => datasets,
            _ => &[],
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Bar,
    Line,
    Pie,
    Doughnut,
    Scatter,
    Card,
    Table,
    Empty,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderData {
    Series {
        labels: Vec<String>,
        datasets: Vec<SeriesDataset>,
    },
    Points {
        datasets: Vec<PointDataset>,
    },
    Card(CardDisplay),
    Table {
        columns: Vec<String>,
        rows: Vec<Row>,
    },
    Empty {},
}
/// A style value applied either to the whole series or point by point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PerItem<T> {
    Single(T),
    Each(Vec<T>),
}
impl<T> PerItem<T> {
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            PerItem::Single(value) => Some(value),
            PerItem::Each(values) => values.get(index),
        }
    }
}
pub type ColorSpec = PerItem<String>;
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: ColorSpec,
    pub border_color: ColorSpec,
    pub border_width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_hover_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}
impl SeriesDataset {
    pub fn new(label: Option<String>, data: Vec<f64>, background: ColorSpec, border: ColorSpec) -> Self {
        Self {
            label,
            data,
            background_color: background,
            border_color: border,
            border_width: 1,
            fill: None,
            tension: None,
            point_radius: None,
            point_hover_radius: None,
            stack: None,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDataset {
    pub label: String,
    pub data: Vec<Point>,
    pub background_color: String,
    pub border_color: String,
    pub border_width: u32,
    pub point_radius: PerItem<f64>,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDisplay {
    pub title: String,
    pub value: f64,
    pub formatted_value: String,
    pub field: String,
    pub aggregation: String,
    pub sub_header: String,
    pub decimal_places: u32,
    pub matched_rows: usize,
    pub filter_applied: bool,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_axis: Option<Axis>,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}
impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            index_axis: None,
            plugins: Plugins::default(),
            scales: None,
        }
    }
}
impl DisplayOptions {
    pub fn titled(title: &str, legend: Legend) -> Self {
        Self {
            plugins: Plugins {
                legend,
                title: TitleOptions {
                    display: true,
                    text: title.to_string(),
                },
            },
            ..Default::default()
        }
    }
    pub fn with_scales(mut self, scales: Scales) -> Self {
        self.scales = Some(scales);
        self
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Plugins {
    pub legend: Legend,
    pub title: TitleOptions,
}
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Legend {
    pub display: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
}
impl Legend {
    pub fn shown(display: bool) -> Self {
        Self {
            display,
            position: None,
        }
    }
    pub fn top() -> Self {
        Self {
            display: true,
            position: Some(LegendPosition::Top),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
}
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TitleOptions {
    pub display: bool,
    pub text: String,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: AxisScale,
    pub y: AxisScale,
}
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisScale {
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stacked: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<String>,
}
impl AxisScale {
    pub fn from_zero(begin_at_zero: bool) -> Self {
        Self {
            begin_at_zero,
            ..Default::default()
        }
    }
    pub fn linear() -> Self {
        Self {
            begin_at_zero: true,
            stacked: false,
            scale_type: Some("linear".to_string()),
        }
    }
    pub fn stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }
}
