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

use crate::chart::{ChartConfig, ChartType, Layout};
use crate::error::{RegistryError, Result, SerialisationError};
use crate::registry::StrategyRegistry;
use serde_json::Value as JsonValue;

/// Config-level façade over a registry. Only an unknown chart type is an
/// error; an invalid config for a known type is `Ok(false)`.
#[derive(Debug, Clone, Copy)]
pub struct ChartConfigFactory<'a> {
    registry: &'a StrategyRegistry,
}
impl<'a> ChartConfigFactory<'a> {
    pub fn new(registry: &'a StrategyRegistry) -> Self {
        Self { registry }
    }
    pub fn create_config(&self, chart_type: ChartType) -> Result<ChartConfig> {
        Ok(self.registry.resolve(chart_type)?.create_default_config())
    }
    pub fn create_config_by_name(&self, name: &str) -> Result<ChartConfig> {
        Ok(self.registry.resolve_name(name)?.create_default_config())
    }
    pub fn validate_config(&self, config: &ChartConfig) -> Result<bool> {
        Ok(self
            .registry
            .resolve(config.chart_type())?
            .validate_config(config))
    }
    pub fn available_types(&self) -> Vec<ChartType> {
        self.registry.types()
    }
    pub fn default_layout(&self, chart_type: ChartType) -> Result<Layout> {
        Ok(self.registry.resolve(chart_type)?.default_layout())
    }
    pub fn export_config(&self, config: &ChartConfig) -> Result<JsonValue> {
        let strategy = self.registry.resolve(config.chart_type())?;
        Ok(strategy.export_config(config)?)
    }
    pub fn import_config(&self, chart_type: ChartType, raw: &JsonValue) -> Result<ChartConfig> {
        let strategy = self.registry.resolve(chart_type)?;
        Ok(strategy.import_config(raw)?)
    }
    /// Imports a payload that names its own chart type in `type`.
    pub fn import_tagged(&self, raw: &JsonValue) -> Result<ChartConfig> {
        let tag = raw.get("type").ok_or(SerialisationError::MissingTypeTag)?;
        let name = tag.as_str().ok_or_else(|| RegistryError::UnknownChartType {
            chart_type: tag.to_string(),
        })?;
        let strategy = self.registry.resolve_name(name)?;
        Ok(strategy.import_config(raw)?)
    }
}
