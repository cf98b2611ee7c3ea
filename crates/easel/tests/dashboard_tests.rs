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


use easel::settings::GridSettings;
use easel::{
    BarConfig, BaseConfig, CardConfig, ChartConfig, ChartEngine, ChartType, Dashboard,
    DashboardError, Dataset, InMemoryDatasets, StrategyRegistry,
};
use easel::chart::Layout;
use serde_json::json;

fn bar_on(source: &str) -> ChartConfig {
    BarConfig {
        base: BaseConfig {
            data_source_id: source.to_string(),
            ..BaseConfig::titled("Orders")
        },
        x_axis: vec!["region".to_string()],
        y_axis: vec!["amount".to_string()],
        ..BarConfig::default()
    }
    .into()
}

fn card_on(source: &str) -> ChartConfig {
    CardConfig {
        base: BaseConfig {
            data_source_id: source.to_string(),
            ..BaseConfig::titled("Total")
        },
        field: "amount".to_string(),
        ..CardConfig::default()
    }
    .into()
}

fn dashboard() -> (Dashboard, String) {
    let dashboard = Dashboard::new("Sales", &GridSettings::default());
    let tab_id = dashboard.tabs[0].id.clone();
    (dashboard, tab_id)
}

#[test]
fn test_new_dashboard_has_one_tab_that_cannot_be_removed() {
    let (mut dashboard, tab_id) = dashboard();
    assert_eq!(dashboard.tabs.len(), 1);
    assert_eq!(dashboard.tabs[0].name, "Tab 1");
    assert_eq!(dashboard.grid_columns, 12);
    assert_eq!(dashboard.remove_tab(&tab_id), Err(DashboardError::LastTab));
    assert!(matches!(
        dashboard.remove_tab("nope"),
        Err(DashboardError::TabNotFound { .. })
    ));
}

#[test]
fn test_tabs_can_be_added_renamed_and_removed() {
    let engine = ChartEngine::new();
    let (mut dashboard, first) = dashboard();
    let second = dashboard.add_tab("Details");
    dashboard.rename_tab(&second, "Breakdown").unwrap();
    assert_eq!(dashboard.tab(&second).unwrap().name, "Breakdown");

    dashboard.add_chart(&second, bar_on("orders"), engine.registry()).unwrap();
    dashboard.add_chart(&first, card_on("orders"), engine.registry()).unwrap();
    assert_eq!(dashboard.charts.len(), 2);

    let removed = dashboard.remove_tab(&second).unwrap();
    assert_eq!(removed.chart_ids.len(), 1);
    assert_eq!(dashboard.tabs.len(), 1);
    assert_eq!(dashboard.charts.len(), 1);
    assert_eq!(dashboard.widgets_in(&second).count(), 0);
    assert_eq!(dashboard.data_source_ids, vec!["orders".to_string()]);
}

#[test]
fn test_charts_are_placed_first_fit() {
    let engine = ChartEngine::new();
    let (mut dashboard, tab_id) = dashboard();
    let a = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    let b = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    let c = dashboard.add_chart(&tab_id, card_on("orders"), engine.registry()).unwrap();
    assert_eq!((a.x, a.y, a.w, a.h), (0, 0, 6, 4));
    assert_eq!((b.x, b.y, b.w, b.h), (6, 0, 6, 4));
    assert_eq!((c.x, c.y, c.w, c.h), (0, 4, 3, 2));
    assert_eq!(dashboard.tab(&tab_id).unwrap().chart_ids.len(), 3);
}

#[test]
fn test_layout_updates_are_clamped() {
    let engine = ChartEngine::new();
    let (mut dashboard, tab_id) = dashboard();
    let widget = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    let updated = dashboard
        .update_widget_layout(&widget.id, 5, 2, Layout::new(20, 1), engine.registry())
        .unwrap();
    assert_eq!((updated.x, updated.y, updated.w, updated.h), (0, 2, 12, 3));
    assert_eq!(dashboard.widget(&widget.id).unwrap().layout(), Layout::new(12, 3));
}

#[test]
fn test_widgets_near_the_grid_bottom_do_not_block_placement() {
    let engine = ChartEngine::new();
    let (mut dashboard, tab_id) = dashboard();
    let top = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    let far = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    dashboard
        .update_widget_layout(&top.id, 0, 0, Layout::new(12, 4), engine.registry())
        .unwrap();
    let moved = dashboard
        .update_widget_layout(&far.id, 0, u32::MAX - 2, Layout::new(12, 8), engine.registry())
        .unwrap();
    assert_eq!(moved.y, u32::MAX - 2);

    let next = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    assert_eq!((next.x, next.y), (0, 4));
}

#[test]
fn test_zero_grid_columns_from_storage_still_places_charts() {
    let engine = ChartEngine::new();
    let (dashboard, tab_id) = dashboard();
    let mut stored = serde_json::to_value(&dashboard).unwrap();
    stored["gridColumns"] = json!(0);
    let mut restored: Dashboard = serde_json::from_value(stored).unwrap();
    assert_eq!(restored.grid_columns, 0);

    let first = restored.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    assert_eq!((first.x, first.y, first.w), (0, 0, 1));
    let second = restored.add_chart(&tab_id, card_on("orders"), engine.registry()).unwrap();
    assert_eq!((second.x, second.y, second.w), (0, 4, 1));

    let updated = restored
        .update_widget_layout(&first.id, 7, 9, Layout::new(6, 4), engine.registry())
        .unwrap();
    assert_eq!((updated.x, updated.y, updated.w, updated.h), (0, 9, 1, 4));
}

#[test]
fn test_unregistered_chart_type_cannot_be_placed() {
    let (mut dashboard, tab_id) = dashboard();
    let empty = StrategyRegistry::new();
    assert_eq!(
        dashboard.add_chart(&tab_id, bar_on("orders"), &empty),
        Err(DashboardError::UnregisteredChartType {
            chart_type: ChartType::Bar
        })
    );
    assert!(dashboard.charts.is_empty());
}

#[test]
fn test_removing_last_widget_drops_its_chart() {
    let engine = ChartEngine::new();
    let (mut dashboard, tab_id) = dashboard();
    let widget = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    dashboard.remove_widget(&widget.id).unwrap();
    assert!(dashboard.chart(&widget.chart_id).is_none());
    assert!(dashboard.tab(&tab_id).unwrap().chart_ids.is_empty());
    assert!(dashboard.remove_widget(&widget.id).is_err());
}

#[test]
fn test_render_tab_skips_charts_without_data() {
    let engine = ChartEngine::new();
    let (mut dashboard, tab_id) = dashboard();
    let bar = dashboard.add_chart(&tab_id, bar_on("orders"), engine.registry()).unwrap();
    dashboard.add_chart(&tab_id, card_on("returns"), engine.registry()).unwrap();

    let orders = Dataset::from_json_records(
        "orders",
        "Orders",
        &json!([
            {"region": "North", "amount": 10},
            {"region": "South", "amount": "n/a"}
        ]),
    )
    .unwrap();
    assert_eq!(orders.row_count(), 2);
    assert!(Dataset::from_json_records("bad", "Bad", &json!([1, 2])).is_err());
    let mut sources = InMemoryDatasets::new();
    sources.insert(orders);

    let rendered = engine.render_tab(&dashboard, &tab_id, &sources).unwrap();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].widget_id, bar.id);
    assert_eq!(rendered[0].render.labels().len(), 2);
    assert_eq!(rendered[0].diagnostics.coerced_to_zero, 1);

    assert!(engine.render_tab(&dashboard, "missing", &sources).is_err());
}
