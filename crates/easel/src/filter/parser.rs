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

use crate::data::Value;
use crate::error::{FilterError, FilterResult};
use crate::filter::ast::{BinaryOp, Expr, Method, UnaryOp};
use crate::filter::lexer::{tokenize, Token, TokenKind};

/// Recursive-descent parser, lowest precedence first:
/// `or > and > equality > comparison > additive > multiplicative > unary > postfix`.
pub struct ExpressionParser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl ExpressionParser {
    pub fn parse(source: &str, max_depth: usize) -> FilterResult<Expr> {
        let tokens = tokenize(source)?;
        let mut parser = Self {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        };
        let expr = parser.parse_or()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(FilterError::UnexpectedToken {
                found: token.kind.describe(),
                expected: "end of expression".to_string(),
                position: token.position,
            }),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> FilterResult<()> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(FilterError::UnexpectedToken {
                found: token.kind.describe(),
                expected: kind.describe(),
                position: token.position,
            }),
            None => Err(FilterError::UnexpectedEnd {
                expected: kind.describe(),
            }),
        }
    }

    fn enter(&mut self) -> FilterResult<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(FilterError::TooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let rhs = self.parse_and()?;
            lhs = Expr::binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.parse_equality()?;
        while self.eat(&TokenKind::And) {
            let rhs = self.parse_equality()?;
            lhs = Expr::binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Eq) => BinaryOp::Eq,
                Some(TokenKind::StrictEq) => BinaryOp::StrictEq,
                Some(TokenKind::Ne) => BinaryOp::Ne,
                Some(TokenKind::StrictNe) => BinaryOp::StrictNe,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_comparison()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_comparison(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Lt) => BinaryOp::Lt,
                Some(TokenKind::Le) => BinaryOp::Le,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Ge) => BinaryOp::Ge,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_additive()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_additive(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_multiplicative(&mut self) -> FilterResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                Some(TokenKind::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_unary(&mut self) -> FilterResult<Expr> {
        let op = match self.peek_kind() {
            Some(TokenKind::Not) => Some(UnaryOp::Not),
            Some(TokenKind::Minus) => Some(UnaryOp::Neg),
            Some(TokenKind::Plus) => Some(UnaryOp::Plus),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix();
        };
        self.pos += 1;
        self.enter()?;
        let operand = self.parse_unary();
        self.leave();
        Ok(Expr::Unary(op, Box::new(operand?)))
    }

    fn parse_postfix(&mut self) -> FilterResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::Dot) {
            let name = self.expect_ident("method or property name")?;
            if name == "length" {
                expr = Expr::Length(Box::new(expr));
                continue;
            }
            let method = Method::from_name(&name)
                .ok_or_else(|| FilterError::UnknownMethod { name: name.clone() })?;
            self.expect(TokenKind::LParen)?;
            let args = self.parse_arguments()?;
            if args.len() != method.arity() {
                return Err(FilterError::ArgumentCount {
                    name,
                    expected: method.arity(),
                    found: args.len(),
                });
            }
            expr = Expr::Call {
                target: Box::new(expr),
                method,
                args,
            };
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> FilterResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_nested()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn parse_nested(&mut self) -> FilterResult<Expr> {
        self.enter()?;
        let expr = self.parse_or();
        self.leave();
        expr
    }

    fn expect_ident(&mut self, expected: &str) -> FilterResult<String> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            Some(token) => Err(FilterError::UnexpectedToken {
                found: token.kind.describe(),
                expected: expected.to_string(),
                position: token.position,
            }),
            None => Err(FilterError::UnexpectedEnd {
                expected: expected.to_string(),
            }),
        }
    }

    fn parse_primary(&mut self) -> FilterResult<Expr> {
        let token = self.advance().ok_or_else(|| FilterError::UnexpectedEnd {
            expected: "a value".to_string(),
        })?;
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::Text(s))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::LParen => {
                let inner = self.parse_nested()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) if name == "row" || name == "context" => self.parse_scoped(),
            TokenKind::Ident(name) => Ok(Expr::Field(name)),
            other => Err(FilterError::UnexpectedToken {
                found: other.describe(),
                expected: "a value".to_string(),
                position: token.position,
            }),
        }
    }

    /// `row.field`, `row["field"]` and the `context` equivalents all read the
    /// current row.
    fn parse_scoped(&mut self) -> FilterResult<Expr> {
        if self.eat(&TokenKind::Dot) {
            let name = self.expect_ident("a field name")?;
            return Ok(Expr::Field(name));
        }
        self.expect(TokenKind::LBracket)?;
        let name = match self.advance() {
            Some(Token {
                kind: TokenKind::Str(name),
                ..
            }) => name,
            Some(token) => {
                return Err(FilterError::UnexpectedToken {
                    found: token.kind.describe(),
                    expected: "a quoted field name".to_string(),
                    position: token.position,
                })
            }
            None => {
                return Err(FilterError::UnexpectedEnd {
                    expected: "a quoted field name".to_string(),
                })
            }
        };
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::Field(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> FilterResult<Expr> {
        ExpressionParser::parse(source, 16)
    }

    #[test]
    fn test_precedence() {
        let expr = parse("a + 1 * 2 > 3 && b == 'x' || c").unwrap();
        let expected = Expr::binary(
            BinaryOp::Or,
            Expr::binary(
                BinaryOp::And,
                Expr::binary(
                    BinaryOp::Gt,
                    Expr::binary(
                        BinaryOp::Add,
                        Expr::field("a"),
                        Expr::binary(BinaryOp::Mul, Expr::literal(1.0), Expr::literal(2.0)),
                    ),
                    Expr::literal(3.0),
                ),
                Expr::binary(BinaryOp::Eq, Expr::field("b"), Expr::literal("x")),
            ),
            Expr::field("c"),
        );
        assert_eq!(expr, expected);
    }

    #[test]
    fn test_scoped_access_forms_are_equivalent() {
        let bare = parse("region").unwrap();
        assert_eq!(parse("row.region").unwrap(), bare);
        assert_eq!(parse("context.region").unwrap(), bare);
        assert_eq!(parse("row['region']").unwrap(), bare);
        assert_eq!(parse("context[\"region\"]").unwrap(), bare);
    }

    #[test]
    fn test_methods_and_length() {
        let expr = parse("row.name.toLowerCase().includes('shop')").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                target: Box::new(Expr::Call {
                    target: Box::new(Expr::field("name")),
                    method: Method::ToLowerCase,
                    args: vec![],
                }),
                method: Method::Includes,
                args: vec![Expr::literal("shop")],
            }
        );
        assert_eq!(
            parse("name.length").unwrap(),
            Expr::Length(Box::new(Expr::field("name")))
        );
    }

    #[test]
    fn test_unknown_method_and_arity() {
        assert_eq!(
            parse("name.eval('x')"),
            Err(FilterError::UnknownMethod {
                name: "eval".to_string()
            })
        );
        assert_eq!(
            parse("name.includes()"),
            Err(FilterError::ArgumentCount {
                name: "includes".to_string(),
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn test_trailing_and_missing_tokens() {
        assert!(matches!(
            parse("a b"),
            Err(FilterError::UnexpectedToken { .. })
        ));
        assert!(matches!(parse("a >"), Err(FilterError::UnexpectedEnd { .. })));
        assert!(matches!(parse("(a"), Err(FilterError::UnexpectedEnd { .. })));
        assert!(matches!(parse(""), Err(FilterError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(parse(&deep), Err(FilterError::TooDeep { limit: 16 }));
        let bangs = format!("{}a", "!".repeat(20));
        assert_eq!(parse(&bangs), Err(FilterError::TooDeep { limit: 16 }));
        assert!(parse("((1))").is_ok());
    }
}
