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

use crate::data::ColumnType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Pie,
    Scatter,
    Card,
    Table,
}
impl ChartType {
    pub const ALL: [ChartType; 6] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Pie,
        ChartType::Scatter,
        ChartType::Card,
        ChartType::Table,
    ];
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Card => "card",
            ChartType::Table => "table",
        }
    }
}
impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for ChartType {
    type Err = crate::error::RegistryError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| crate::error::RegistryError::UnknownChartType {
                chart_type: s.to_string(),
            })
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    pub w: u32,
    pub h: u32,
}
impl Layout {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
    /// Clamps into `[min, max]` per dimension.
    pub fn clamp(self, min: Layout, max: Layout) -> Layout {
        Layout {
            w: self.w.max(min.w).min(max.w.max(min.w)),
            h: self.h.max(min.h).min(max.h.max(min.h)),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRequirements {
    pub min_rows: usize,
    pub max_rows: Option<usize>,
    pub min_columns: usize,
    pub max_columns: usize,
}
impl DataRequirements {
    pub fn accepts(&self, rows: usize, columns: usize) -> bool {
        rows >= self.min_rows
            && self.max_rows.map_or(true, |max| rows <= max)
            && columns >= self.min_columns
            && columns <= self.max_columns
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartCategory {
    Basic,
    Advanced,
    Specialized,
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartDescriptor {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: ChartCategory,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
}
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_kind: Option<ValueKind>,
}
impl FieldConstraint {
    pub fn length(min: usize, max: usize) -> Self {
        Self {
            min_length: Some(min),
            max_length: Some(max),
            value_kind: None,
        }
    }
    pub fn kind(kind: ValueKind) -> Self {
        Self {
            value_kind: Some(kind),
            ..Default::default()
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationRules {
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
    pub constraints: IndexMap<&'static str, FieldConstraint>,
}
impl ValidationRules {
    pub fn constraint(&self, field: &str) -> Option<&FieldConstraint> {
        self.constraints.get(field)
    }
}
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartExample {
    pub name: &'static str,
    pub description: &'static str,
    pub config: serde_json::Value,
}
pub type SupportedTypes = &'static [ColumnType];
