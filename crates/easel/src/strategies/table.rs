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

use crate::chart::render::{DisplayOptions, Legend, RenderData, RenderKind};
use crate::chart::{
    ChartCategory, ChartDescriptor, ChartExample, ChartType, DataRequirements, FieldConstraint,
    Layout, RenderOptions, TableConfig, TableData, ValidationRules, ValueKind,
};
use crate::data::{CoercionReport, ColumnType, Row};
use crate::settings::EngineSettings;
use crate::strategies::ChartStrategy;
use indexmap::IndexMap;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct TableStrategy {
    settings: Arc<EngineSettings>,
}
impl TableStrategy {
    pub fn new(settings: Arc<EngineSettings>) -> Self {
        Self { settings }
    }
    pub fn effective_limit(&self, config: &TableConfig) -> usize {
        config.row_limit.min(self.settings.table.max_row_limit)
    }
}
/// Case-insensitive substring match against any of `columns`.
fn row_matches(row: &Row, columns: &[String], needle: &str) -> bool {
    columns
        .iter()
        .filter_map(|c| row.get(c))
        .any(|v| v.label().to_lowercase().contains(needle))
}
impl ChartStrategy for TableStrategy {
    type Config = TableConfig;
    type Intermediate = TableData;
    const CHART_TYPE: ChartType = ChartType::Table;
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }
    fn descriptor(&self) -> ChartDescriptor {
        ChartDescriptor {
            chart_type: ChartType::Table,
            label: "Table",
            description: "Display data in a table format with filtering and row limit.",
            icon: "TableCellsIcon",
            category: ChartCategory::Basic,
        }
    }
    fn default_config(&self) -> TableConfig {
        TableConfig {
            row_limit: self.settings.table.default_row_limit,
            ..TableConfig::default()
        }
    }
    fn validate(&self, config: &TableConfig) -> bool {
        config.base.is_complete() && config.row_limit > 0 && !config.columns.is_empty()
    }
    fn default_layout(&self) -> Layout {
        Layout::new(4, 3)
    }
    fn min_layout(&self) -> Layout {
        Layout::new(3, 2)
    }
    fn max_layout(&self) -> Layout {
        Layout::new(12, 12)
    }
    fn data_requirements(&self) -> DataRequirements {
        DataRequirements {
            min_rows: 0,
            max_rows: None,
            min_columns: 1,
            max_columns: 50,
        }
    }
    fn required_fields(&self) -> &'static [&'static str] {
        &["columns"]
    }
    fn optional_fields(&self) -> &'static [&'static str] {
        &["rowLimit", "filter", "colorScheme"]
    }
    fn supported_data_types(&self) -> &'static [ColumnType] {
        &[ColumnType::String, ColumnType::Number, ColumnType::Date]
    }
    fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            required: vec!["columns"],
            optional: vec!["rowLimit", "filter"],
            constraints: IndexMap::from([
                ("columns", FieldConstraint::length(1, 50)),
                ("rowLimit", FieldConstraint::kind(ValueKind::Number)),
            ]),
        }
    }
    fn help_text(&self) -> &'static str {
        "A table lists rows of the dataset.\n\
         1. Pick the columns to show, in order.\n\
         2. Set how many rows to show.\n\
         3. Optionally type a search term; only rows containing it in one of the\n\
         selected columns are kept (case-insensitive)."
    }
    fn examples(&self) -> Vec<ChartExample> {
        vec![
            ChartExample {
                name: "Latest orders",
                description: "Table of the first ten orders",
                config: json!({
                    "title": "Latest orders",
                    "columns": ["order_id", "customer", "total"],
                    "rowLimit": 10
                }),
            },
            ChartExample {
                name: "Customer search",
                description: "Table of customers whose name or city matches a term",
                config: json!({
                    "title": "Customer search",
                    "columns": ["name", "city"],
                    "rowLimit": 25,
                    "filter": "london"
                }),
            },
        ]
    }
    fn process(&self, rows: &[Row], config: &TableConfig, _report: &mut CoercionReport) -> TableData {
        let needle = config.filter.to_lowercase();
        let limit = self.effective_limit(config);
        let selected = rows
            .iter()
            .filter(|row| needle.is_empty() || row_matches(row, &config.columns, &needle))
            .take(limit)
            .map(|row| row.project(&config.columns))
            .collect();
        TableData {
            columns: config.columns.clone(),
            rows: selected,
        }
    }
    fn transform(&self, data: &TableData, config: &TableConfig) -> RenderOptions {
        RenderOptions {
            kind: RenderKind::Table,
            data: RenderData::Table {
                columns: data.columns.clone(),
                rows: data.rows.clone(),
            },
            options: DisplayOptions::titled(&config.base.title, Legend::shown(false)),
        }
    }
}
