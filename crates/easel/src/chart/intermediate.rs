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

use crate::chart::config::Aggregation;
use crate::chart::Variant;
use crate::data::Row;
use indexmap::IndexMap;
use serde::Serialize;

/// One x-axis label with a value per y-axis field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledMetrics {
    pub label: String,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}
impl LabelledMetrics {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: IndexMap::new(),
        }
    }
    pub fn value(&self, field: &str) -> f64 {
        self.values.get(field).copied().unwrap_or(0.0)
    }
}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub sum: f64,
}
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub field: String,
    pub points: Vec<ScatterPoint>,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValue {
    pub value: f64,
    pub field: String,
    pub aggregation: Aggregation,
    pub decimal_places: u32,
    pub sub_header: String,
    pub matched_rows: usize,
    pub filter_applied: bool,
}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}
/// Stage-one output. `Rows` carries input handed to a strategy that does not
/// own the config's chart type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntermediateData {
    Metrics(Vec<LabelledMetrics>),
    Categories(Vec<CategoryTotal>),
    Scatter(Vec<ScatterSeries>),
    Card(CardValue),
    Table(TableData),
    Rows(Vec<Row>),
}
impl IntermediateData {
    pub fn len(&self) -> usize {
        match self {
            IntermediateData::Metrics(items) => items.len(),
            IntermediateData::Categories(items) => items.len(),
            IntermediateData::Scatter(series) => series.iter().map(|s| s.points.len()).sum(),
            IntermediateData::Card(_) => 1,
            IntermediateData::Table(table) => table.rows.len(),
            IntermediateData::Rows(rows) => rows.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
macro_rules! impl_intermediate {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Variant<IntermediateData> for $ty {
                fn narrow(outer: &IntermediateData) -> Option<&Self> {
                    match outer {
                        IntermediateData::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
                fn widen(self) -> IntermediateData {
                    IntermediateData::$variant(self)
                }
            }
        )*
    };
}
impl_intermediate!(
    Vec<LabelledMetrics> => Metrics,
    Vec<CategoryTotal> => Categories,
    Vec<ScatterSeries> => Scatter,
    CardValue => Card,
    TableData => Table,
);
