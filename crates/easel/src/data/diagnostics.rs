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

use crate::data::value::Value;
use serde::Serialize;

/// Counts what the lenient numeric reads had to paper over during one
/// pipeline run. Coercion itself never fails; this is the side channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoercionReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub coerced_to_zero: usize,
    pub missing_values: usize,
    pub dropped_rows: usize,
    pub filter_fallback: bool,
}
impl CoercionReport {
    pub fn new(rows_in: usize) -> Self {
        Self {
            rows_in,
            ..Default::default()
        }
    }
    /// `Number(x) || 0`, with the reason for every zero recorded.
    pub fn coerce(&mut self, value: Option<&Value>) -> f64 {
        match value {
            None => {
                self.missing_values += 1;
                0.0
            }
            Some(v) => match v.finite_number() {
                Some(n) => n,
                None => {
                    if v.is_blank() {
                        self.missing_values += 1;
                    } else {
                        self.coerced_to_zero += 1;
                    }
                    0.0
                }
            },
        }
    }
    pub fn drop_row(&mut self) {
        self.dropped_rows += 1;
    }
    pub fn is_clean(&self) -> bool {
        self.coerced_to_zero == 0
            && self.missing_values == 0
            && self.dropped_rows == 0
            && !self.filter_fallback
    }
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_tracks_reasons() {
        let mut report = CoercionReport::new(3);
        assert_eq!(report.coerce(Some(&Value::from(4))), 4.0);
        assert_eq!(report.coerce(Some(&Value::from("abc"))), 0.0);
        assert_eq!(report.coerce(Some(&Value::Null)), 0.0);
        assert_eq!(report.coerce(None), 0.0);
        assert_eq!(report.coerced_to_zero, 1);
        assert_eq!(report.missing_values, 2);
        assert!(!report.is_clean());
    }
}
