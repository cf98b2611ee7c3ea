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


use easel::data::rows_from_json;
use easel::filter::{apply_filter, CompiledFilter};
use easel::settings::FilterSettings;
use easel::{FilterError, Row, Value};
use serde_json::json;

fn row() -> Row {
    Row::from_json(&json!({
        "region": "North",
        "amount": 120,
        "qty": "7",
        "note": "",
        "active": true
    }))
    .unwrap()
}

fn eval(source: &str) -> Value {
    CompiledFilter::compile(source, &FilterSettings::default())
        .unwrap()
        .evaluate(&row())
        .unwrap()
}

#[test]
fn test_comparisons_and_logic() {
    assert_eq!(eval("row.amount > 100 && row.region === 'North'"), Value::Bool(true));
    assert_eq!(eval("row.amount < 100 || row.active"), Value::Bool(true));
    assert_eq!(eval("!(row.amount >= 120)"), Value::Bool(false));
    assert_eq!(eval("row.qty == 7"), Value::Bool(true));
    assert_eq!(eval("row.qty === 7"), Value::Bool(false));
    assert_eq!(eval("row.missing == null"), Value::Bool(true));
    assert_eq!(eval("row['region'] != 'South'"), Value::Bool(true));
}

#[test]
fn test_arithmetic_and_concatenation() {
    assert_eq!(eval("row.amount * 2 - 40"), Value::Number(200.0));
    assert_eq!(eval("row.qty - 2"), Value::Number(5.0));
    assert_eq!(eval("row.region + '-' + row.amount"), Value::from("North-120"));
    assert_eq!(eval("-row.amount % 7"), Value::Number(-1.0));
    assert_eq!(eval("row.note + 1"), Value::from("1"));
}

#[test]
fn test_string_methods() {
    assert_eq!(eval("row.region.toLowerCase().startsWith('no')"), Value::Bool(true));
    assert_eq!(eval("row.region.includes('rt')"), Value::Bool(true));
    assert_eq!(eval("row.region.endsWith('x')"), Value::Bool(false));
    assert_eq!(eval("row.region.toUpperCase()"), Value::from("NORTH"));
    assert_eq!(eval("row.region.length"), Value::Number(5.0));
}

#[test]
fn test_method_on_non_text_is_an_error() {
    let filter = CompiledFilter::compile("row.amount.includes('1')", &FilterSettings::default()).unwrap();
    assert!(matches!(
        filter.evaluate(&row()),
        Err(FilterError::TypeMismatch { .. })
    ));
    let filter = CompiledFilter::compile("row.missing.length > 0", &FilterSettings::default()).unwrap();
    assert!(filter.matches(&row()).is_err());
}

#[test]
fn test_compile_errors() {
    let limits = FilterSettings::default();
    assert!(matches!(
        CompiledFilter::compile("row.region.explode()", &limits),
        Err(FilterError::UnknownMethod { .. })
    ));
    assert!(matches!(
        CompiledFilter::compile("row.region.includes()", &limits),
        Err(FilterError::ArgumentCount { .. })
    ));
    assert!(CompiledFilter::compile("row.amount >", &limits).is_err());
    assert!(CompiledFilter::compile("'open", &limits).is_err());
    assert!(CompiledFilter::compile("row.amount # 2", &limits).is_err());
}

#[test]
fn test_length_and_depth_limits() {
    let limits = FilterSettings {
        max_expression_length: 16,
        ..FilterSettings::default()
    };
    assert!(matches!(
        CompiledFilter::compile("row.region === 'North'", &limits),
        Err(FilterError::TooLong { limit: 16, .. })
    ));

    let limits = FilterSettings {
        max_depth: 4,
        ..FilterSettings::default()
    };
    let nested = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    assert!(matches!(
        CompiledFilter::compile(&nested, &limits),
        Err(FilterError::TooDeep { .. })
    ));
}

#[test]
fn test_step_budget_is_per_row() {
    let limits = FilterSettings {
        max_steps_per_row: 3,
        ..FilterSettings::default()
    };
    let filter = CompiledFilter::compile("row.amount > 1 && row.amount < 500", &limits).unwrap();
    assert!(matches!(
        filter.evaluate(&row()),
        Err(FilterError::BudgetExhausted { limit: 3 })
    ));
    let filter = CompiledFilter::compile("row.active", &limits).unwrap();
    assert_eq!(filter.evaluate(&row()), Ok(Value::Bool(true)));
    assert_eq!(filter.evaluate(&row()), Ok(Value::Bool(true)));
}

#[test]
fn test_apply_filter_falls_back_on_error() {
    let rows = rows_from_json(&json!([{"n": 1}, {"n": 2}, {"n": 3}]));
    let limits = FilterSettings::default();

    let outcome = apply_filter(&rows, "row.n >= 2", &limits);
    assert!(outcome.applied);
    assert_eq!(outcome.rows.len(), 2);

    let outcome = apply_filter(&rows, "   ", &limits);
    assert!(!outcome.applied && !outcome.fell_back());
    assert_eq!(outcome.rows.len(), 3);

    let outcome = apply_filter(&rows, "row.n.includes(1)", &limits);
    assert!(outcome.fell_back());
    assert!(!outcome.applied);
    assert_eq!(outcome.rows.len(), 3);
}
