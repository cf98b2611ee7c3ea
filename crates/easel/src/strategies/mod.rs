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

pub mod bar;
pub mod card;
pub mod line;
pub mod pie;
pub mod scatter;
pub mod table;
pub use bar::BarStrategy;
pub use card::CardStrategy;
pub use line::LineStrategy;
pub use pie::PieStrategy;
pub use scatter::ScatterStrategy;
pub use table::TableStrategy;

use crate::chart::portable::{export_value, import_value};
use crate::chart::{
    ChartConfig, ChartDescriptor, ChartExample, ChartType, DataRequirements, IntermediateData,
    Layout, RenderOptions, ValidationRules, Variant,
};
use crate::data::{CoercionReport, ColumnType, Row, Value};
use crate::error::SerialisationResult;
use crate::filter::{apply_filter, FilterOutcome};
use crate::logging::{log_coercions, log_filter_fallback, log_pipeline_stage};
use crate::settings::EngineSettings;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A chart type's typed behaviour: its config schema, validation, grid
/// hints and the two pipeline stages. Implementations hold no per-call
/// state.
pub trait ChartStrategy: Send + Sync + 'static {
    type Config: Variant<ChartConfig> + Clone + Serialize + DeserializeOwned;
    type Intermediate: Variant<IntermediateData>;
    const CHART_TYPE: ChartType;

    fn settings(&self) -> &EngineSettings;
    fn descriptor(&self) -> ChartDescriptor;
    fn default_config(&self) -> Self::Config;
    fn validate(&self, config: &Self::Config) -> bool;
    fn default_layout(&self) -> Layout;
    fn min_layout(&self) -> Layout;
    fn max_layout(&self) -> Layout;
    fn data_requirements(&self) -> DataRequirements;
    fn required_fields(&self) -> &'static [&'static str];
    fn optional_fields(&self) -> &'static [&'static str];
    fn supported_data_types(&self) -> &'static [ColumnType];
    fn validation_rules(&self) -> ValidationRules;
    fn help_text(&self) -> &'static str;
    fn examples(&self) -> Vec<ChartExample>;
    fn process(
        &self,
        rows: &[Row],
        config: &Self::Config,
        report: &mut CoercionReport,
    ) -> Self::Intermediate;
    fn transform(&self, data: &Self::Intermediate, config: &Self::Config) -> RenderOptions;
}

/// Object-safe view of a [`ChartStrategy`] over the closed [`ChartConfig`]
/// union, which is what the registry stores. A config of another chart
/// type is never an error here: validation says `false`, stage one hands
/// the rows back and stage two renders nothing.
pub trait AnyChartStrategy: Send + Sync {
    fn chart_type(&self) -> ChartType;
    fn descriptor(&self) -> ChartDescriptor;
    fn create_default_config(&self) -> ChartConfig;
    fn validate_config(&self, config: &ChartConfig) -> bool;
    fn default_layout(&self) -> Layout;
    fn min_layout(&self) -> Layout;
    fn max_layout(&self) -> Layout;
    fn data_requirements(&self) -> DataRequirements;
    fn required_fields(&self) -> &'static [&'static str];
    fn optional_fields(&self) -> &'static [&'static str];
    fn supported_data_types(&self) -> &'static [ColumnType];
    fn validation_rules(&self) -> ValidationRules;
    fn help_text(&self) -> &'static str;
    fn examples(&self) -> Vec<ChartExample>;
    fn process_data_with_diagnostics(
        &self,
        rows: &[Row],
        config: &ChartConfig,
    ) -> (IntermediateData, CoercionReport);
    fn transform_to_chart_options(
        &self,
        data: &IntermediateData,
        config: &ChartConfig,
    ) -> RenderOptions;
    fn export_config(&self, config: &ChartConfig) -> SerialisationResult<JsonValue>;
    fn import_config(&self, raw: &JsonValue) -> SerialisationResult<ChartConfig>;

    fn process_data(&self, rows: &[Row], config: &ChartConfig) -> IntermediateData {
        self.process_data_with_diagnostics(rows, config).0
    }
}

impl<S: ChartStrategy> AnyChartStrategy for S {
    fn chart_type(&self) -> ChartType {
        S::CHART_TYPE
    }

    fn descriptor(&self) -> ChartDescriptor {
        ChartStrategy::descriptor(self)
    }

    fn create_default_config(&self) -> ChartConfig {
        self.default_config().widen()
    }

    fn validate_config(&self, config: &ChartConfig) -> bool {
        S::Config::narrow(config).is_some_and(|typed| self.validate(typed))
    }

    fn default_layout(&self) -> Layout {
        ChartStrategy::default_layout(self)
    }

    fn min_layout(&self) -> Layout {
        ChartStrategy::min_layout(self)
    }

    fn max_layout(&self) -> Layout {
        ChartStrategy::max_layout(self)
    }

    fn data_requirements(&self) -> DataRequirements {
        ChartStrategy::data_requirements(self)
    }

    fn required_fields(&self) -> &'static [&'static str] {
        ChartStrategy::required_fields(self)
    }

    fn optional_fields(&self) -> &'static [&'static str] {
        ChartStrategy::optional_fields(self)
    }

    fn supported_data_types(&self) -> &'static [ColumnType] {
        ChartStrategy::supported_data_types(self)
    }

    fn validation_rules(&self) -> ValidationRules {
        ChartStrategy::validation_rules(self)
    }

    fn help_text(&self) -> &'static str {
        ChartStrategy::help_text(self)
    }

    fn examples(&self) -> Vec<ChartExample> {
        ChartStrategy::examples(self)
    }

    fn process_data_with_diagnostics(
        &self,
        rows: &[Row],
        config: &ChartConfig,
    ) -> (IntermediateData, CoercionReport) {
        let mut report = CoercionReport::new(rows.len());
        let Some(typed) = S::Config::narrow(config) else {
            report.rows_out = rows.len();
            return (IntermediateData::Rows(rows.to_vec()), report);
        };
        let data = self.process(rows, typed, &mut report).widen();
        report.rows_out = data.len();
        log_pipeline_stage(S::CHART_TYPE, "process", rows.len(), data.len());
        log_coercions(S::CHART_TYPE, &report);
        (data, report)
    }

    fn transform_to_chart_options(
        &self,
        data: &IntermediateData,
        config: &ChartConfig,
    ) -> RenderOptions {
        match (S::Intermediate::narrow(data), S::Config::narrow(config)) {
            (Some(typed_data), Some(typed_config)) => {
                let options = self.transform(typed_data, typed_config);
                log_pipeline_stage(S::CHART_TYPE, "transform", data.len(), data.len());
                options
            }
            _ => RenderOptions::empty(),
        }
    }

    fn export_config(&self, config: &ChartConfig) -> SerialisationResult<JsonValue> {
        if config.chart_type() != S::CHART_TYPE {
            return Ok(serde_json::to_value(config)?);
        }
        export_value(config, &self.settings().export.version)
    }

    fn import_config(&self, raw: &JsonValue) -> SerialisationResult<ChartConfig> {
        let defaults = self.default_config();
        import_value(S::CHART_TYPE, &defaults, raw).map(|config| config.widen())
    }
}

/// Applies an optional filter expression, falling back to every row (and
/// recording the fallback) when the expression cannot be used.
pub(crate) fn filter_rows<'a>(
    chart_type: ChartType,
    rows: &'a [Row],
    expression: &str,
    settings: &EngineSettings,
    report: &mut CoercionReport,
) -> FilterOutcome<'a> {
    let outcome = apply_filter(rows, expression, &settings.filter);
    if let Some(err) = &outcome.error {
        log_filter_fallback(chart_type, expression, err);
        report.filter_fallback = true;
    }
    outcome
}

pub(crate) fn label_of(row: &Row, field: Option<&String>) -> String {
    field
        .and_then(|f| row.get(f))
        .map(Value::label)
        .unwrap_or_default()
}

/// The six built-in strategies in registration order, sharing one settings
/// snapshot.
pub fn builtin_strategies(settings: Arc<EngineSettings>) -> Vec<Arc<dyn AnyChartStrategy>> {
    vec![
        Arc::new(BarStrategy::new(settings.clone())),
        Arc::new(LineStrategy::new(settings.clone())),
        Arc::new(PieStrategy::new(settings.clone())),
        Arc::new(ScatterStrategy::new(settings.clone())),
        Arc::new(CardStrategy::new(settings.clone())),
        Arc::new(TableStrategy::new(settings)),
    ]
}

/// Numeric labels first in numeric order, then the rest lexicographically.
pub(crate) fn compare_labels(a: &str, b: &str) -> std::cmp::Ordering {
    use crate::data::value::parse_number;
    use std::cmp::Ordering;
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_compare_labels_is_total_on_mixed_labels() {
        let mut labels: Vec<String> = (0..3000)
            .map(|i| match i % 3 {
                0 => format!("{}", i % 50),
                1 => format!("{}a", i % 50),
                _ => format!("{}.{}x", i % 50, i % 7),
            })
            .collect();
        labels.sort_by(|a, b| compare_labels(a, b));
        assert!(labels
            .windows(2)
            .all(|w| compare_labels(&w[0], &w[1]) != Ordering::Greater));
        assert_eq!(labels[0], "0");
        assert_eq!(compare_labels("10", "2"), Ordering::Greater);
        assert_eq!(compare_labels("2", "1a"), Ordering::Less);
        assert_eq!(compare_labels("1a", "10"), Ordering::Greater);
    }
}
