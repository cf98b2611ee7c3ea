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

pub mod chart;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod factory;
pub mod filter;
pub mod logging;
pub mod registry;
pub mod settings;
pub mod strategies;

pub use chart::{
    Aggregation, BarConfig, BaseConfig, CardConfig, ChartConfig, ChartType, IntermediateData,
    Layout, LineConfig, Palette, PieConfig, RenderOptions, ScatterConfig, TableConfig,
};
pub use dashboard::{Dashboard, DashboardTab, DatasetSource, InMemoryDatasets, Widget};
pub use data::{CoercionReport, ColumnDescriptor, ColumnType, Dataset, Row, Value};
pub use error::{
    ConfigError, DashboardError, EaselError, FilterError, RegistryError, Result,
    SerialisationError,
};
pub use factory::ChartConfigFactory;
pub use registry::StrategyRegistry;
pub use settings::EngineSettings;
pub use strategies::{AnyChartStrategy, ChartStrategy};

use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// A widget's chart run through the pipeline, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedWidget {
    pub widget_id: String,
    pub chart_id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub render: RenderOptions,
    pub diagnostics: CoercionReport,
}
pub struct ChartEngine {
    registry: StrategyRegistry,
    settings: Arc<EngineSettings>,
}
impl Default for ChartEngine {
    fn default() -> Self {
        Self::new()
    }
}
impl ChartEngine {
    pub fn new() -> Self {
        Self::from_settings(EngineSettings::default())
    }
    pub fn with_settings(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_settings(settings))
    }
    fn from_settings(settings: EngineSettings) -> Self {
        let settings = Arc::new(settings);
        Self {
            registry: StrategyRegistry::with_builtins(settings.clone()),
            settings,
        }
    }
    /// Uses a caller-built registry, e.g. one with extra or substitute
    /// strategies.
    pub fn with_registry(registry: StrategyRegistry, settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        if registry.is_empty() {
            return Err(RegistryError::EmptyRegistry.into());
        }
        Ok(Self {
            registry,
            settings: Arc::new(settings),
        })
    }
    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
    pub fn factory(&self) -> ChartConfigFactory<'_> {
        ChartConfigFactory::new(&self.registry)
    }
    pub fn render(&self, rows: &[Row], config: &ChartConfig) -> Result<RenderOptions> {
        self.render_with_diagnostics(rows, config)
            .map(|(options, _)| options)
    }
    pub fn render_with_diagnostics(
        &self,
        rows: &[Row],
        config: &ChartConfig,
    ) -> Result<(RenderOptions, CoercionReport)> {
        let strategy = self.registry.resolve(config.chart_type())?;
        let (data, report) = strategy.process_data_with_diagnostics(rows, config);
        Ok((strategy.transform_to_chart_options(&data, config), report))
    }
    /// Renders every widget on a tab whose chart and dataset are available.
    /// Widgets with a missing dataset or chart are skipped with a warning.
    pub fn render_tab(
        &self,
        dashboard: &Dashboard,
        tab_id: &str,
        source: &dyn DatasetSource,
    ) -> Result<Vec<RenderedWidget>> {
        dashboard.tab(tab_id)?;
        let mut rendered = Vec::new();
        for widget in dashboard.widgets_in(tab_id) {
            let Some(config) = dashboard.chart(&widget.chart_id) else {
                warn!(
                    widget_id = %widget.id,
                    chart_id = %widget.chart_id,
                    "Widget references an unknown chart, skipping"
                );
                continue;
            };
            let Some(dataset) = source.dataset(config.data_source_id()) else {
                warn!(
                    chart_id = %widget.chart_id,
                    data_source_id = config.data_source_id(),
                    "Dataset not available, skipping chart"
                );
                continue;
            };
            let (render, diagnostics) = self.render_with_diagnostics(&dataset.rows, config)?;
            rendered.push(RenderedWidget {
                widget_id: widget.id.clone(),
                chart_id: widget.chart_id.clone(),
                x: widget.x,
                y: widget.y,
                w: widget.w,
                h: widget.h,
                render,
                diagnostics,
            });
        }
        Ok(rendered)
    }
}
