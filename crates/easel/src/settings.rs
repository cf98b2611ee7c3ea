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

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

pub const ENV_FILTER_MAX_STEPS: &str = "EASEL_FILTER_MAX_STEPS";
pub const ENV_TABLE_MAX_ROWS: &str = "EASEL_TABLE_MAX_ROWS";
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub filter: FilterSettings,
    pub table: TableSettings,
    pub export: ExportSettings,
    pub grid: GridSettings,
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub max_expression_length: usize,
    pub max_depth: usize,
    pub max_steps_per_row: u64,
}
impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            max_expression_length: 1024,
            max_depth: 64,
            max_steps_per_row: 10_000,
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub default_row_limit: usize,
    pub max_row_limit: usize,
}
impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_row_limit: 10,
            max_row_limit: 10_000,
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub version: String,
}
impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub columns: u32,
}
impl Default for GridSettings {
    fn default() -> Self {
        Self { columns: 12 }
    }
}
impl EngineSettings {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let settings: EngineSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::SettingsFileError {
                path: path.display().to_string(),
                source,
            })?;
        let settings = Self::from_yaml_str(&content)?;
        info!(path = %path.display(), "Loaded engine settings");
        Ok(settings)
    }
    pub fn validate(&self) -> ConfigResult<()> {
        if self.filter.max_expression_length == 0 {
            return Err(invalid("filter.max_expression_length", 0));
        }
        if self.filter.max_depth == 0 {
            return Err(invalid("filter.max_depth", 0));
        }
        if self.filter.max_steps_per_row == 0 {
            return Err(invalid("filter.max_steps_per_row", 0));
        }
        if self.table.max_row_limit == 0 {
            return Err(invalid("table.max_row_limit", 0));
        }
        if self.table.default_row_limit == 0 {
            return Err(invalid("table.default_row_limit", 0));
        }
        if self.table.default_row_limit > self.table.max_row_limit {
            return Err(ConfigError::ConflictingSettings {
                details: format!(
                    "table.default_row_limit ({}) exceeds table.max_row_limit ({})",
                    self.table.default_row_limit, self.table.max_row_limit
                ),
            });
        }
        if self.export.version.trim().is_empty() {
            return Err(invalid("export.version", "\"\""));
        }
        if self.grid.columns == 0 {
            return Err(invalid("grid.columns", 0));
        }
        Ok(())
    }
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }
    /// Applies overrides from an arbitrary lookup; unparsable or zero values
    /// are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_FILTER_MAX_STEPS) {
            match raw.trim().parse::<u64>() {
                Ok(steps) if steps > 0 => self.filter.max_steps_per_row = steps,
                _ => warn!(key = ENV_FILTER_MAX_STEPS, value = %raw, "Ignoring invalid override"),
            }
        }
        if let Some(raw) = lookup(ENV_TABLE_MAX_ROWS) {
            match raw.trim().parse::<usize>() {
                Ok(rows) if rows >= self.table.default_row_limit => self.table.max_row_limit = rows,
                _ => warn!(key = ENV_TABLE_MAX_ROWS, value = %raw, "Ignoring invalid override"),
            }
        }
        self
    }
}
fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidSetting {
        field: field.to_string(),
        value: value.to_string(),
    }
}
