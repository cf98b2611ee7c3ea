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

use crate::chart::{
    ChartCategory, ChartDescriptor, ChartExample, ChartType, DataRequirements, Layout,
    ValidationRules,
};
use crate::error::{RegistryError, RegistryResult};
use crate::logging::log_registry_built;
use crate::settings::EngineSettings;
use crate::strategies::{builtin_strategies, AnyChartStrategy, ChartStrategy};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

pub type SharedStrategy = Arc<dyn AnyChartStrategy>;
/// Lookup from chart type to strategy. Built once, then shared read-only;
/// registering a type again replaces the earlier strategy in place.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    strategies: IndexMap<ChartType, SharedStrategy>,
}
impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("types", &self.types())
            .finish()
    }
}
impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_builtins(settings: Arc<EngineSettings>) -> Self {
        let mut registry = Self::new();
        for strategy in builtin_strategies(settings) {
            registry.register(strategy);
        }
        log_registry_built(&registry.types());
        registry
    }
    pub fn register(&mut self, strategy: SharedStrategy) {
        self.strategies.insert(strategy.chart_type(), strategy);
    }
    pub fn register_strategy<S: ChartStrategy>(&mut self, strategy: S) {
        self.register(Arc::new(strategy));
    }
    pub fn get(&self, chart_type: ChartType) -> Option<&SharedStrategy> {
        self.strategies.get(&chart_type)
    }
    pub fn resolve(&self, chart_type: ChartType) -> RegistryResult<&SharedStrategy> {
        self.get(chart_type)
            .ok_or_else(|| RegistryError::UnknownChartType {
                chart_type: chart_type.to_string(),
            })
    }
    pub fn resolve_name(&self, name: &str) -> RegistryResult<&SharedStrategy> {
        let chart_type: ChartType = name.parse()?;
        self.resolve(chart_type)
    }
    pub fn has(&self, chart_type: ChartType) -> bool {
        self.strategies.contains_key(&chart_type)
    }
    pub fn types(&self) -> Vec<ChartType> {
        self.strategies.keys().copied().collect()
    }
    pub fn len(&self) -> usize {
        self.strategies.len()
    }
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &SharedStrategy> {
        self.strategies.values()
    }
    pub fn descriptors(&self) -> Vec<ChartDescriptor> {
        self.iter().map(|s| s.descriptor()).collect()
    }
    pub fn by_category(&self) -> IndexMap<ChartCategory, Vec<ChartDescriptor>> {
        let mut grouped: IndexMap<ChartCategory, Vec<ChartDescriptor>> = IndexMap::new();
        for descriptor in self.descriptors() {
            grouped
                .entry(descriptor.category)
                .or_default()
                .push(descriptor);
        }
        grouped
    }
    pub fn default_layouts(&self) -> IndexMap<ChartType, Layout> {
        self.collect(|s| s.default_layout())
    }
    pub fn all_validation_rules(&self) -> IndexMap<ChartType, ValidationRules> {
        self.collect(|s| s.validation_rules())
    }
    pub fn all_data_requirements(&self) -> IndexMap<ChartType, DataRequirements> {
        self.collect(|s| s.data_requirements())
    }
    pub fn all_help_text(&self) -> IndexMap<ChartType, &'static str> {
        self.collect(|s| s.help_text())
    }
    pub fn all_examples(&self) -> IndexMap<ChartType, Vec<ChartExample>> {
        self.collect(|s| s.examples())
    }
    fn collect<T>(&self, f: impl Fn(&dyn AnyChartStrategy) -> T) -> IndexMap<ChartType, T> {
        self.strategies
            .iter()
            .map(|(chart_type, strategy)| (*chart_type, f(strategy.as_ref())))
            .collect()
    }
}
