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

pub mod ast;
pub mod lexer;
pub mod parser;
pub use ast::{BinaryOp, Expr, Method, UnaryOp};
pub use parser::ExpressionParser;

use crate::data::value::format_number;
use crate::data::{Row, Value};
use crate::error::{FilterError, FilterResult};
use crate::settings::FilterSettings;
use std::cmp::Ordering;

/// A parsed row predicate. Compilation enforces the length and nesting
/// limits; evaluation runs each row against a fresh step budget.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    source: String,
    expr: Expr,
    max_steps: u64,
}

impl CompiledFilter {
    pub fn compile(source: &str, limits: &FilterSettings) -> FilterResult<Self> {
        let length = source.chars().count();
        if length > limits.max_expression_length {
            return Err(FilterError::TooLong {
                length,
                limit: limits.max_expression_length,
            });
        }
        let expr = ExpressionParser::parse(source, limits.max_depth)?;
        Ok(Self {
            source: source.to_string(),
            expr,
            max_steps: limits.max_steps_per_row,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn matches(&self, row: &Row) -> FilterResult<bool> {
        self.evaluate(row).map(|v| v.truthy())
    }

    pub fn evaluate(&self, row: &Row) -> FilterResult<Value> {
        let mut evaluator = Evaluator {
            row,
            gas: self.max_steps,
            limit: self.max_steps,
        };
        evaluator.eval(&self.expr)
    }
}

/// Rows selected by a filter expression. On any compile or evaluation
/// error every row is kept and the error is reported alongside.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub rows: Vec<&'a Row>,
    pub applied: bool,
    pub error: Option<FilterError>,
}

impl FilterOutcome<'_> {
    pub fn fell_back(&self) -> bool {
        self.error.is_some()
    }
}

pub fn apply_filter<'a>(rows: &'a [Row], source: &str, limits: &FilterSettings) -> FilterOutcome<'a> {
    let unfiltered = |error: Option<FilterError>| FilterOutcome {
        rows: rows.iter().collect(),
        applied: false,
        error,
    };
    if source.trim().is_empty() {
        return unfiltered(None);
    }
    match select_rows(rows, source, limits) {
        Ok(selected) => FilterOutcome {
            rows: selected,
            applied: true,
            error: None,
        },
        Err(err) => unfiltered(Some(err)),
    }
}

fn select_rows<'a>(rows: &'a [Row], source: &str, limits: &FilterSettings) -> FilterResult<Vec<&'a Row>> {
    let filter = CompiledFilter::compile(source, limits)?;
    let mut selected = Vec::new();
    for row in rows {
        if filter.matches(row)? {
            selected.push(row);
        }
    }
    Ok(selected)
}

struct Evaluator<'r> {
    row: &'r Row,
    gas: u64,
    limit: u64,
}

impl Evaluator<'_> {
    fn eval(&mut self, expr: &Expr) -> FilterResult<Value> {
        if self.gas == 0 {
            return Err(FilterError::BudgetExhausted { limit: self.limit });
        }
        self.gas -= 1;

        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Field(name) => Ok(self.row.get(name).cloned().unwrap_or_default()),
            Expr::Unary(op, inner) => {
                let value = self.eval(inner)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!value.truthy()),
                    UnaryOp::Neg => Value::Number(-numeric(&value)),
                    UnaryOp::Plus => Value::Number(numeric(&value)),
                })
            }
            Expr::Binary(BinaryOp::Or, lhs, rhs) => {
                let left = self.eval(lhs)?;
                if left.truthy() {
                    Ok(left)
                } else {
                    self.eval(rhs)
                }
            }
            Expr::Binary(BinaryOp::And, lhs, rhs) => {
                let left = self.eval(lhs)?;
                if left.truthy() {
                    self.eval(rhs)
                } else {
                    Ok(left)
                }
            }
            Expr::Binary(op, lhs, rhs) => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                Ok(binary(*op, &left, &right))
            }
            Expr::Length(inner) => match self.eval(inner)? {
                Value::Text(s) => Ok(Value::Number(s.chars().count() as f64)),
                Value::Null => Err(type_mismatch("length", &Value::Null)),
                _ => Ok(Value::Null),
            },
            Expr::Call {
                target,
                method,
                args,
            } => {
                let text = match self.eval(target)? {
                    Value::Text(text) => text,
                    other => return Err(type_mismatch(method.name(), &other)),
                };
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg)?);
                }
                let needle = values.first().map(js_string).unwrap_or_default();
                Ok(match method {
                    Method::Includes => Value::Bool(text.contains(&needle)),
                    Method::StartsWith => Value::Bool(text.starts_with(&needle)),
                    Method::EndsWith => Value::Bool(text.ends_with(&needle)),
                    Method::ToLowerCase => Value::Text(text.to_lowercase()),
                    Method::ToUpperCase => Value::Text(text.to_uppercase()),
                })
            }
        }
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Eq => Value::Bool(left.loose_eq(right)),
        BinaryOp::Ne => Value::Bool(!left.loose_eq(right)),
        BinaryOp::StrictEq => Value::Bool(left == right),
        BinaryOp::StrictNe => Value::Bool(left != right),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::Add => match (left, right) {
            (Value::Text(_), _) | (_, Value::Text(_)) => {
                Value::Text(format!("{}{}", js_string(left), js_string(right)))
            }
            _ => Value::Number(numeric(left) + numeric(right)),
        },
        BinaryOp::Sub => Value::Number(numeric(left) - numeric(right)),
        BinaryOp::Mul => Value::Number(numeric(left) * numeric(right)),
        BinaryOp::Div => Value::Number(numeric(left) / numeric(right)),
        BinaryOp::Rem => Value::Number(numeric(left) % numeric(right)),
        BinaryOp::Or | BinaryOp::And => Value::Bool(left.truthy() && right.truthy()),
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => numeric(left).partial_cmp(&numeric(right)),
    }
}

/// Numeric conversion for arithmetic: null and blank text are zero,
/// anything unparseable is NaN.
fn numeric(value: &Value) -> f64 {
    if value.is_blank() {
        return 0.0;
    }
    value.to_number().unwrap_or(f64::NAN)
}

fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Number(n) => format_number(*n),
        other => other.label(),
    }
}

fn type_mismatch(operation: &str, found: &Value) -> FilterError {
    let found = match found {
        Value::Null => "a missing value",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::Text(_) => "text",
    };
    FilterError::TypeMismatch {
        operation: operation.to_string(),
        found: found.to_string(),
    }
}
