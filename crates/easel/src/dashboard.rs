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
use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use crate::registry::StrategyRegistry;
use crate::settings::GridSettings;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_TAB_NAME: &str = "Tab 1";
/// Where charts read their rows from. Ingestion lives outside this crate.
pub trait DatasetSource {
    fn dataset(&self, id: &str) -> Option<&Dataset>;
}
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasets {
    datasets: IndexMap<String, Dataset>,
}
impl InMemoryDatasets {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, dataset: Dataset) -> Option<Dataset> {
        self.datasets.insert(dataset.id.clone(), dataset)
    }
    pub fn remove(&mut self, id: &str) -> Option<Dataset> {
        self.datasets.shift_remove(id)
    }
    pub fn len(&self) -> usize {
        self.datasets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
impl DatasetSource for InMemoryDatasets {
    fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTab {
    pub id: String,
    pub name: String,
    pub chart_ids: Vec<String>,
}
impl DashboardTab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            chart_ids: Vec::new(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    pub chart_id: String,
    pub tab_id: String,
    pub chart_type: ChartType,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}
impl Widget {
    pub fn layout(&self) -> Layout {
        Layout::new(self.w, self.h)
    }
    fn overlaps(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        x < self.x.saturating_add(self.w)
            && self.x < x.saturating_add(w)
            && y < self.y.saturating_add(self.h)
            && self.y < y.saturating_add(h)
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub tabs: Vec<DashboardTab>,
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub charts: IndexMap<String, ChartConfig>,
    pub data_source_ids: Vec<String>,
    pub grid_columns: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}
impl Dashboard {
    pub fn new(name: impl Into<String>, grid: &GridSettings) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            category: None,
            tabs: vec![DashboardTab::new(DEFAULT_TAB_NAME)],
            widgets: Vec::new(),
            charts: IndexMap::new(),
            data_source_ids: Vec::new(),
            grid_columns: grid.columns.max(1),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
    /// Grid width used for placement; a persisted width of zero reads as one.
    fn columns(&self) -> u32 {
        self.grid_columns.max(1)
    }
    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
    pub fn tab(&self, tab_id: &str) -> DashboardResult<&DashboardTab> {
        self.tabs
            .iter()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| DashboardError::TabNotFound { id: tab_id.to_string() })
    }
    fn tab_mut(&mut self, tab_id: &str) -> DashboardResult<&mut DashboardTab> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| DashboardError::TabNotFound { id: tab_id.to_string() })
    }
    pub fn widget(&self, widget_id: &str) -> DashboardResult<&Widget> {
        self.widgets
            .iter()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| DashboardError::WidgetNotFound { id: widget_id.to_string() })
    }
    pub fn widgets_in(&self, tab_id: &str) -> impl Iterator<Item = &Widget> {
        let tab_id = tab_id.to_string();
        self.widgets.iter().filter(move |w| w.tab_id == tab_id)
    }
    pub fn add_tab(&mut self, name: impl Into<String>) -> String {
        let tab = DashboardTab::new(name);
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.touch();
        id
    }
    pub fn rename_tab(&mut self, tab_id: &str, name: impl Into<String>) -> DashboardResult<()> {
        self.tab_mut(tab_id)?.name = name.into();
        self.touch();
        Ok(())
    }
    /// Drops the tab with its widgets, and any of its charts no other tab
    /// still shows. The last remaining tab cannot be removed.
    pub fn remove_tab(&mut self, tab_id: &str) -> DashboardResult<DashboardTab> {
        let index = self
            .tabs
            .iter()
            .position(|t| t.id == tab_id)
            .ok_or_else(|| DashboardError::TabNotFound { id: tab_id.to_string() })?;
        if self.tabs.len() == 1 {
            return Err(DashboardError::LastTab);
        }
        let removed = self.tabs.remove(index);
        self.widgets.retain(|w| w.tab_id != removed.id);
        for chart_id in &removed.chart_ids {
            let still_shown = self.tabs.iter().any(|t| t.chart_ids.contains(chart_id));
            if !still_shown {
                self.charts.shift_remove(chart_id);
            }
        }
        self.touch();
        Ok(removed)
    }
    /// Stores `config` under a fresh chart id and places it on the tab.
    pub fn add_chart(
        &mut self,
        tab_id: &str,
        config: ChartConfig,
        registry: &StrategyRegistry,
    ) -> DashboardResult<Widget> {
        self.tab(tab_id)?;
        let chart_id = Uuid::new_v4().to_string();
        let chart_type = config.chart_type();
        let data_source_id = config.data_source_id().to_string();
        let widget = self.place_chart(tab_id, &chart_id, chart_type, registry)?;
        self.charts.insert(chart_id, config);
        if !data_source_id.is_empty() && !self.data_source_ids.contains(&data_source_id) {
            self.data_source_ids.push(data_source_id);
        }
        Ok(widget)
    }
    /// Sizes the widget from the strategy's default layout and puts it in the
    /// first free slot, scanning rows top-down and columns left to right.
    pub fn place_chart(
        &mut self,
        tab_id: &str,
        chart_id: &str,
        chart_type: ChartType,
        registry: &StrategyRegistry,
    ) -> DashboardResult<Widget> {
        let strategy = registry
            .get(chart_type)
            .ok_or(DashboardError::UnregisteredChartType { chart_type })?;
        self.tab(tab_id)?;
        let layout = strategy.default_layout();
        let w = layout.w.clamp(1, self.columns());
        let h = layout.h.max(1);
        let (x, y) = self.first_free_slot(tab_id, w, h);
        let widget = Widget {
            id: Uuid::new_v4().to_string(),
            chart_id: chart_id.to_string(),
            tab_id: tab_id.to_string(),
            chart_type,
            x,
            y,
            w,
            h,
        };
        debug!(tab_id, chart_id, x, y, w, h, "Placed chart widget");
        let tab = self.tab_mut(tab_id)?;
        if !tab.chart_ids.iter().any(|c| c == chart_id) {
            tab.chart_ids.push(chart_id.to_string());
        }
        self.widgets.push(widget.clone());
        self.touch();
        Ok(widget)
    }
    /// The topmost free row is either row 0 or the bottom edge of some
    /// widget, so only those rows are scanned.
    fn first_free_slot(&self, tab_id: &str, w: u32, h: u32) -> (u32, u32) {
        let occupied: Vec<&Widget> = self.widgets_in(tab_id).collect();
        let mut rows: Vec<u32> = occupied.iter().map(|o| o.y.saturating_add(o.h)).collect();
        rows.push(0);
        rows.sort_unstable();
        rows.dedup();
        for &y in &rows {
            for x in 0..=self.columns().saturating_sub(w) {
                if !occupied.iter().any(|o| o.overlaps(x, y, w, h)) {
                    return (x, y);
                }
            }
        }
        (0, rows.last().copied().unwrap_or(0))
    }
    /// Moves and resizes a widget. Size is clamped to the chart type's
    /// min/max layout and to the grid width; `x` is pulled left so the
    /// widget stays on the grid.
    pub fn update_widget_layout(
        &mut self,
        widget_id: &str,
        x: u32,
        y: u32,
        layout: Layout,
        registry: &StrategyRegistry,
    ) -> DashboardResult<Widget> {
        let chart_type = self.widget(widget_id)?.chart_type;
        let strategy = registry
            .get(chart_type)
            .ok_or(DashboardError::UnregisteredChartType { chart_type })?;
        let clamped = layout.clamp(strategy.min_layout(), strategy.max_layout());
        let columns = self.columns();
        let w = clamped.w.clamp(1, columns);
        let h = clamped.h.max(1);
        let x = x.min(columns - w);
        let widget = self
            .widgets
            .iter_mut()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| DashboardError::WidgetNotFound { id: widget_id.to_string() })?;
        widget.x = x;
        widget.y = y;
        widget.w = w;
        widget.h = h;
        let updated = widget.clone();
        self.touch();
        Ok(updated)
    }
    /// Removes the widget and its chart from the owning tab.
    pub fn remove_widget(&mut self, widget_id: &str) -> DashboardResult<Widget> {
        let index = self
            .widgets
            .iter()
            .position(|w| w.id == widget_id)
            .ok_or_else(|| DashboardError::WidgetNotFound { id: widget_id.to_string() })?;
        let widget = self.widgets.remove(index);
        let chart_still_placed = self.widgets.iter().any(|w| w.chart_id == widget.chart_id);
        if !chart_still_placed {
            for tab in &mut self.tabs {
                tab.chart_ids.retain(|c| *c != widget.chart_id);
            }
            self.charts.shift_remove(&widget.chart_id);
        }
        self.touch();
        Ok(widget)
    }
    pub fn chart(&self, chart_id: &str) -> Option<&ChartConfig> {
        self.charts.get(chart_id)
    }
}
