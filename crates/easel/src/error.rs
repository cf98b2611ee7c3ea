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

use crate::chart::ChartType;
use thiserror::Error;
#[derive(Error, Debug)]
pub enum EaselError {
    #[error("Strategy registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Filter expression error: {0}")]
    Filter(#[from] FilterError),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] SerialisationError),
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unsupported chart type: {chart_type}")]
    UnknownChartType { chart_type: String },
    #[error("No chart strategies are registered")]
    EmptyRegistry,
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    SettingsFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse YAML settings: {source}")]
    YamlParseError {
        #[from]
        source: serde_yaml::Error,
    },
    #[error("Invalid settings: {field} = {value}")]
    InvalidSetting { field: String, value: String },
    #[error("Conflicting settings: {details}")]
    ConflictingSettings { details: String },
}
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString { position: usize },
    #[error("Invalid number literal '{literal}'")]
    InvalidNumber { literal: String },
    #[error("Unexpected token {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        position: usize,
    },
    #[error("Unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: String },
    #[error("Unknown method '{name}'")]
    UnknownMethod { name: String },
    #[error("Method '{name}' expects {expected} argument(s), got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Expression is {length} characters long, limit is {limit}")]
    TooLong { length: usize, limit: usize },
    #[error("Expression nesting exceeds depth limit {limit}")]
    TooDeep { limit: usize },
    #[error("Evaluation budget of {limit} steps exhausted")]
    BudgetExhausted { limit: u64 },
    #[error("Cannot apply {operation} to {found}")]
    TypeMismatch { operation: String, found: String },
}
#[derive(Error, Debug)]
pub enum SerialisationError {
    #[error("JSON serialisation failed: {source}")]
    JsonSerialisationError {
        #[from]
        source: serde_json::Error,
    },
    #[error("Import payload for '{chart_type}' must be a JSON object, found {found}")]
    NotAnObject { chart_type: ChartType, found: String },
    #[error("Config payload has no 'type' tag")]
    MissingTypeTag,
    #[error("Dataset records are invalid: {reason}")]
    InvalidRecords { reason: String },
    #[error("Failed to export config: {reason}")]
    ExportError { reason: String },
}
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Tab '{id}' not found")]
    TabNotFound { id: String },
    #[error("Widget '{id}' not found")]
    WidgetNotFound { id: String },
    #[error("A dashboard must keep at least one tab")]
    LastTab,
    #[error("Chart type '{chart_type}' is not registered")]
    UnregisteredChartType { chart_type: ChartType },
}
pub type Result<T> = std::result::Result<T, EaselError>;
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type FilterResult<T> = std::result::Result<T, FilterError>;
pub type SerialisationResult<T> = std::result::Result<T, SerialisationError>;
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
impl From<serde_json::Error> for EaselError {
    fn from(err: serde_json::Error) -> Self {
        EaselError::Serialisation(SerialisationError::JsonSerialisationError { source: err })
    }
}
impl EaselError {
    pub fn unknown_chart_type(chart_type: impl Into<String>) -> Self {
        EaselError::Registry(RegistryError::UnknownChartType {
            chart_type: chart_type.into(),
        })
    }
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EaselError::Filter(_)
                | EaselError::Dashboard(DashboardError::TabNotFound { .. })
                | EaselError::Dashboard(DashboardError::WidgetNotFound { .. })
                | EaselError::Dashboard(DashboardError::LastTab)
        )
    }
    pub fn category(&self) -> &'static str {
        match self {
            EaselError::Registry(_) => "Registry",
            EaselError::Config(_) => "Configuration",
            EaselError::Filter(_) => "Filter",
            EaselError::Serialisation(_) => "Serialisation",
            EaselError::Dashboard(_) => "Dashboard",
            EaselError::Io(_) => "I/O",
        }
    }
    pub fn user_message(&self) -> String {
        match self {
            EaselError::Registry(RegistryError::UnknownChartType { chart_type }) => {
                format!("Chart type '{chart_type}' is not available. Pick one of the registered chart types.")
            }
            EaselError::Registry(RegistryError::EmptyRegistry) => {
                "No chart types are available.".to_string()
            }
            EaselError::Config(ConfigError::SettingsFileError { path, .. }) => {
                format!("Unable to load settings from '{path}'. Please check the file.")
            }
            EaselError::Dashboard(DashboardError::LastTab) => {
                "A dashboard needs at least one tab.".to_string()
            }
            _ => self.to_string(),
        }
    }
}
