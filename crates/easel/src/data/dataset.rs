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

use crate::data::column::{infer_columns, ColumnDescriptor};
use crate::data::value::Value;
use crate::error::{SerialisationError, SerialisationResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One record of a dataset, keyed by column name in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, Value>);
impl Row {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }
    /// Returns `None` for anything other than a JSON object.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        value.as_object().map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), Value::from(v)))
                .collect()
        })
    }
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(column.into(), value.into());
    }
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }
    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Missing columns project to `Value::Null`.
    pub fn project(&self, columns: &[String]) -> Row {
        columns
            .iter()
            .map(|c| (c.clone(), self.get(c).cloned().unwrap_or_default()))
            .collect()
    }
}
impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Row(iter.into_iter().collect())
    }
}
/// Converts a JSON array of objects; non-object entries are skipped.
pub fn rows_from_json(value: &serde_json::Value) -> Vec<Row> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Row::from_json).collect())
        .unwrap_or_default()
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnDescriptor>,
}
impl Dataset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rows: Vec<Row>) -> Self {
        let columns = infer_columns(&rows);
        Self {
            id: id.into(),
            name: name.into(),
            rows,
            columns,
        }
    }
    pub fn from_json_records(
        id: impl Into<String>,
        name: impl Into<String>,
        records: &serde_json::Value,
    ) -> SerialisationResult<Self> {
        let items = records
            .as_array()
            .ok_or_else(|| SerialisationError::InvalidRecords {
                reason: "expected a JSON array of objects".to_string(),
            })?;
        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let row = Row::from_json(item).ok_or_else(|| SerialisationError::InvalidRecords {
                reason: format!("record {index} is not an object"),
            })?;
            rows.push(row);
        }
        Ok(Self::new(id, name, rows))
    }
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
