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

use crate::chart::types::ChartType;
use crate::chart::Variant;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

pub type ExtraFields = Map<String, JsonValue>;
/// Fields every chart variant carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseConfig {
    pub title: String,
    pub data_source_id: String,
    pub background_color: String,
    pub border_color: String,
    pub color_scheme: String,
}
impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            data_source_id: String::new(),
            background_color: "#3B82F6".to_string(),
            border_color: "#1E40AF".to_string(),
            color_scheme: "default".to_string(),
        }
    }
}
impl BaseConfig {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.data_source_id.trim().is_empty()
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BarConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    pub x_axis: Vec<String>,
    pub y_axis: Vec<String>,
    pub horizontal: bool,
    pub stacked_dimension: Vec<String>,
    pub stacked: bool,
    #[serde(rename = "sortXAxisBy")]
    pub sort_x_axis_by: String,
    pub sort_descending: bool,
    pub filter: String,
    pub show_legend: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
impl Default for BarConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::titled("Bar Chart"),
            x_axis: Vec::new(),
            y_axis: Vec::new(),
            horizontal: false,
            stacked_dimension: Vec::new(),
            stacked: false,
            sort_x_axis_by: String::new(),
            sort_descending: false,
            filter: String::new(),
            show_legend: true,
            extra: ExtraFields::new(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    pub x_axis: Vec<String>,
    pub y_axis: Vec<String>,
    pub smooth: bool,
    pub fill_area: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
impl Default for LineConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::titled("Line Chart"),
            x_axis: Vec::new(),
            y_axis: Vec::new(),
            smooth: false,
            fill_area: false,
            extra: ExtraFields::new(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PieConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    pub category: String,
    pub value: String,
    pub donut: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
impl Default for PieConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::titled("Pie Chart"),
            category: String::new(),
            value: String::new(),
            donut: false,
            extra: ExtraFields::new(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScatterConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    pub x_axis: Vec<String>,
    pub y_axis: Vec<String>,
    pub size: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::titled("Scatter Chart"),
            x_axis: Vec::new(),
            y_axis: Vec::new(),
            size: String::new(),
            extra: ExtraFields::new(),
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Aggregation {
    #[default]
    Sum,
    Avg,
    Min,
    Max,
    Count,
}
impl Aggregation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Count => "count",
        }
    }
    /// Unrecognised names aggregate as a sum.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "avg" | "average" => Aggregation::Avg,
            "min" => Aggregation::Min,
            "max" => Aggregation::Max,
            "count" => Aggregation::Count,
            _ => Aggregation::Sum,
        }
    }
    pub fn apply(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Avg => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Count => values.len() as f64,
        }
    }
}
impl From<String> for Aggregation {
    fn from(name: String) -> Self {
        Aggregation::parse_lenient(&name)
    }
}
impl From<Aggregation> for String {
    fn from(aggregation: Aggregation) -> Self {
        aggregation.as_str().to_string()
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    pub field: String,
    pub aggregation: Aggregation,
    pub decimal_places: u32,
    pub filter: String,
    pub sub_header: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
impl Default for CardConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::titled("Card Chart"),
            field: String::new(),
            aggregation: Aggregation::Sum,
            decimal_places: 0,
            filter: String::new(),
            sub_header: String::new(),
            extra: ExtraFields::new(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    #[serde(flatten)]
    pub base: BaseConfig,
    pub columns: Vec<String>,
    pub row_limit: usize,
    pub filter: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}
impl Default for TableConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::titled("Table"),
            columns: Vec::new(),
            row_limit: 10,
            filter: String::new(),
            extra: ExtraFields::new(),
        }
    }
}
/// A chart definition. The `type` tag selects the variant, so a config can
/// only ever be handed to the strategy registered for that tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartConfig {
    Bar(BarConfig),
    Line(LineConfig),
    Pie(PieConfig),
    Scatter(ScatterConfig),
    Card(CardConfig),
    Table(TableConfig),
}
impl ChartConfig {
    pub fn chart_type(&self) -> ChartType {
        match self {
            ChartConfig::Bar(_) => ChartType::Bar,
            ChartConfig::Line(_) => ChartType::Line,
            ChartConfig::Pie(_) => ChartType::Pie,
            ChartConfig::Scatter(_) => ChartType::Scatter,
            ChartConfig::Card(_) => ChartType::Card,
            ChartConfig::Table(_) => ChartType::Table,
        }
    }
    pub fn base(&self) -> &BaseConfig {
        match self {
            ChartConfig::Bar(c) => &c.base,
            ChartConfig::Line(c) => &c.base,
            ChartConfig::Pie(c) => &c.base,
            ChartConfig::Scatter(c) => &c.base,
            ChartConfig::Card(c) => &c.base,
            ChartConfig::Table(c) => &c.base,
        }
    }
    pub fn base_mut(&mut self) -> &mut BaseConfig {
        match self {
            ChartConfig::Bar(c) => &mut c.base,
            ChartConfig::Line(c) => &mut c.base,
            ChartConfig::Pie(c) => &mut c.base,
            ChartConfig::Scatter(c) => &mut c.base,
            ChartConfig::Card(c) => &mut c.base,
            ChartConfig::Table(c) => &mut c.base,
        }
    }
    pub fn extra(&self) -> &ExtraFields {
        match self {
            ChartConfig::Bar(c) => &c.extra,
            ChartConfig::Line(c) => &c.extra,
            ChartConfig::Pie(c) => &c.extra,
            ChartConfig::Scatter(c) => &c.extra,
            ChartConfig::Card(c) => &c.extra,
            ChartConfig::Table(c) => &c.extra,
        }
    }
    pub fn title(&self) -> &str {
        &self.base().title
    }
    pub fn data_source_id(&self) -> &str {
        &self.base().data_source_id
    }
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.base_mut().title = title.into();
        self
    }
    pub fn with_data_source(mut self, data_source_id: impl Into<String>) -> Self {
        self.base_mut().data_source_id = data_source_id.into();
        self
    }
}
macro_rules! impl_config_variant {
    ($($config:ident => $variant:ident),* $(,)?) => {
        $(
            impl Variant<ChartConfig> for $config {
                fn narrow(outer: &ChartConfig) -> Option<&Self> {
                    match outer {
                        ChartConfig::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
                fn widen(self) -> ChartConfig {
                    ChartConfig::$variant(self)
                }
            }
            impl From<$config> for ChartConfig {
                fn from(config: $config) -> Self {
                    ChartConfig::$variant(config)
                }
            }
        )*
    };
}
impl_config_variant!(
    BarConfig => Bar,
    LineConfig => Line,
    PieConfig => Pie,
    ScatterConfig => Scatter,
    CardConfig => Card,
    TableConfig => Table,
);
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_json_round_trip() {
        let raw = json!({
            "type": "bar",
            "title": "Sales",
            "dataSourceId": "ds-1",
            "xAxis": ["month"],
            "yAxis": ["sales"],
            "sortXAxisBy": "label",
            "legacyFlag": 7
        });
        let config: ChartConfig = serde_json::from_value(raw).unwrap();
        let ChartConfig::Bar(bar) = &config else {
            panic!("expected a bar config");
        };
        assert_eq!(bar.x_axis, vec!["month"]);
        assert_eq!(bar.sort_x_axis_by, "label");
        assert!(bar.show_legend);
        assert_eq!(bar.base.color_scheme, "default");
        assert_eq!(bar.extra.get("legacyFlag"), Some(&json!(7)));
        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["type"], "bar");
        assert_eq!(back["legacyFlag"], 7);
        assert_eq!(back["dataSourceId"], "ds-1");
    }

    #[test]
    fn unknown_aggregation_reads_as_sum() {
        let config: CardConfig =
            serde_json::from_value(json!({"field": "revenue", "aggregation": "median"})).unwrap();
        assert_eq!(config.aggregation, Aggregation::Sum);
        let config: CardConfig =
            serde_json::from_value(json!({"aggregation": "count"})).unwrap();
        assert_eq!(config.aggregation, Aggregation::Count);
    }

    #[test]
    fn aggregation_of_nothing_is_zero() {
        for aggregation in [
            Aggregation::Sum,
            Aggregation::Avg,
            Aggregation::Min,
            Aggregation::Max,
            Aggregation::Count,
        ] {
            assert_eq!(aggregation.apply(&[]), 0.0);
        }
        assert_eq!(Aggregation::Avg.apply(&[1.0, 2.0, 6.0]), 3.0);
        assert_eq!(Aggregation::Min.apply(&[4.0, -1.0]), -1.0);
    }
}
