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
use crate::data::CoercionReport;
use crate::error::FilterError;
use tracing::{debug, info, warn};
pub fn log_pipeline_stage(chart_type: ChartType, stage: &str, rows_in: usize, items_out: usize) {
    debug!(
        chart_type = %chart_type,
        stage = stage,
        rows_in = rows_in,
        items_out = items_out,
        "Pipeline stage"
    );
}
pub fn log_coercions(chart_type: ChartType, report: &CoercionReport) {
    if report.is_clean() {
        return;
    }
    debug!(
        chart_type = %chart_type,
        coerced_to_zero = report.coerced_to_zero,
        missing_values = report.missing_values,
        dropped_rows = report.dropped_rows,
        filter_fallback = report.filter_fallback,
        "Lenient coercion applied"
    );
}
pub fn log_filter_fallback(chart_type: ChartType, expression: &str, error: &FilterError) {
    warn!(
        chart_type = %chart_type,
        expression = expression,
        error = %error,
        "Invalid filter expression, using unfiltered data"
    );
}
pub fn log_registry_built(types: &[ChartType]) {
    info!(
        strategies = types.len(),
        types = %types.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(","),
        "Chart strategy registry ready"
    );
}
