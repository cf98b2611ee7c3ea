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

pub mod config;
pub mod intermediate;
pub mod palette;
pub mod portable;
pub mod render;
pub mod types;
pub use config::{
    Aggregation, BarConfig, BaseConfig, CardConfig, ChartConfig, ExtraFields, LineConfig,
    PieConfig, ScatterConfig, TableConfig,
};
pub use intermediate::{
    CardValue, CategoryTotal, IntermediateData, LabelledMetrics, ScatterPoint, ScatterSeries,
    TableData,
};
pub use palette::Palette;
pub use render::RenderOptions;
pub use types::{
    ChartCategory, ChartDescriptor, ChartExample, ChartType, DataRequirements, FieldConstraint,
    Layout, ValidationRules, ValueKind,
};
/// One arm of a closed sum type, reachable by reference without cloning.
pub trait Variant<Outer>: Sized {
    fn narrow(outer: &Outer) -> Option<&Self>;
    fn widen(self) -> Outer;
}
