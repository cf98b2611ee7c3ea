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

use crate::data::dataset::Row;
use crate::data::value::Value;
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_SHARE_THRESHOLD: f64 = 0.8;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
}
impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
}
pub fn looks_like_date(raw: &str) -> bool {
    let s = raw.trim();
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
}
/// Column order follows first appearance across rows.
pub fn infer_columns(rows: &[Row]) -> Vec<ColumnDescriptor> {
    let mut values: IndexMap<&str, Vec<&Value>> = IndexMap::new();
    for row in rows {
        for (name, value) in row.iter() {
            values.entry(name.as_str()).or_default().push(value);
        }
    }
    values
        .into_iter()
        .map(|(name, column_values)| infer_column(name, &column_values, rows.len()))
        .collect()
}
fn infer_column(name: &str, values: &[&Value], row_count: usize) -> ColumnDescriptor {
    let present: Vec<&Value> = values.iter().copied().filter(|v| !v.is_blank()).collect();
    let nullable = present.len() < row_count;
    let column_type = if present.is_empty() {
        ColumnType::String
    } else if present.iter().all(|v| match v {
        Value::Number(n) => n.is_finite(),
        Value::Text(_) => v.finite_number().is_some(),
        _ => false,
    }) {
        ColumnType::Number
    } else {
        let dates = present
            .iter()
            .filter(|v| matches!(v, Value::Text(s) if looks_like_date(s)))
            .count();
        if dates as f64 > present.len() as f64 * DATE_SHARE_THRESHOLD {
            ColumnType::Date
        } else {
            ColumnType::String
        }
    };
    ColumnDescriptor {
        name: name.to_string(),
        column_type,
        nullable,
    }
}
