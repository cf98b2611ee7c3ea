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

use crate::error::{FilterError, FilterResult};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    Or,
    And,
    Not,
    Eq,
    StrictEq,
    Ne,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Str(s) => format!("string '{s}'"),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::True => "'true'".to_string(),
            TokenKind::False => "'false'".to_string(),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::Or => "'||'".to_string(),
            TokenKind::And => "'&&'".to_string(),
            TokenKind::Not => "'!'".to_string(),
            TokenKind::Eq => "'=='".to_string(),
            TokenKind::StrictEq => "'==='".to_string(),
            TokenKind::Ne => "'!='".to_string(),
            TokenKind::StrictNe => "'!=='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Le => "'<='".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::Ge => "'>='".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Comma => "','".to_string(),
        }
    }
}

pub fn tokenize(source: &str) -> FilterResult<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let kind = match ch {
            '0'..='9' => {
                let (kind, next) = lex_number(&chars, pos)?;
                pos = next;
                kind
            }
            '.' if chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit()) => {
                let (kind, next) = lex_number(&chars, pos)?;
                pos = next;
                kind
            }
            '\'' | '"' => {
                let (kind, next) = lex_string(&chars, pos)?;
                pos = next;
                kind
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                while pos < chars.len()
                    && (chars[pos].is_alphanumeric() || chars[pos] == '_' || chars[pos] == '$')
                {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                keyword(&word).unwrap_or(TokenKind::Ident(word))
            }
            _ => {
                let (kind, width) = lex_symbol(&chars, pos)?;
                pos += width;
                kind
            }
        };
        tokens.push(Token {
            kind,
            position: start,
        });
    }

    Ok(tokens)
}

fn keyword(word: &str) -> Option<TokenKind> {
    match word {
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "null" | "undefined" => Some(TokenKind::Null),
        "and" => Some(TokenKind::And),
        "or" => Some(TokenKind::Or),
        "not" => Some(TokenKind::Not),
        _ => None,
    }
}

fn lex_number(chars: &[char], start: usize) -> FilterResult<(TokenKind, usize)> {
    let mut pos = start;
    while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
        pos += 1;
    }
    if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
        pos += 1;
        if pos < chars.len() && (chars[pos] == '+' || chars[pos] == '-') {
            pos += 1;
        }
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    let literal: String = chars[start..pos].iter().collect();
    literal
        .parse::<f64>()
        .map(|n| (TokenKind::Number(n), pos))
        .map_err(|_| FilterError::InvalidNumber { literal })
}

fn lex_string(chars: &[char], start: usize) -> FilterResult<(TokenKind, usize)> {
    let quote = chars[start];
    let mut pos = start + 1;
    let mut out = String::new();
    while pos < chars.len() {
        match chars[pos] {
            c if c == quote => return Ok((TokenKind::Str(out), pos + 1)),
            '\\' => {
                let escaped = chars
                    .get(pos + 1)
                    .ok_or(FilterError::UnterminatedString { position: start })?;
                out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => *other,
                });
                pos += 2;
            }
            c => {
                out.push(c);
                pos += 1;
            }
        }
    }
    Err(FilterError::UnterminatedString { position: start })
}

fn lex_symbol(chars: &[char], pos: usize) -> FilterResult<(TokenKind, usize)> {
    let at = |offset: usize| chars.get(pos + offset).copied();
    let token = match (chars[pos], at(1), at(2)) {
        ('=', Some('='), Some('=')) => (TokenKind::StrictEq, 3),
        ('!', Some('='), Some('=')) => (TokenKind::StrictNe, 3),
        ('=', Some('='), _) => (TokenKind::Eq, 2),
        ('!', Some('='), _) => (TokenKind::Ne, 2),
        ('<', Some('='), _) => (TokenKind::Le, 2),
        ('>', Some('='), _) => (TokenKind::Ge, 2),
        ('&', Some('&'), _) => (TokenKind::And, 2),
        ('|', Some('|'), _) => (TokenKind::Or, 2),
        ('!', _, _) => (TokenKind::Not, 1),
        ('<', _, _) => (TokenKind::Lt, 1),
        ('>', _, _) => (TokenKind::Gt, 1),
        ('+', _, _) => (TokenKind::Plus, 1),
        ('-', _, _) => (TokenKind::Minus, 1),
        ('*', _, _) => (TokenKind::Star, 1),
        ('/', _, _) => (TokenKind::Slash, 1),
        ('%', _, _) => (TokenKind::Percent, 1),
        ('(', _, _) => (TokenKind::LParen, 1),
        (')', _, _) => (TokenKind::RParen, 1),
        ('[', _, _) => (TokenKind::LBracket, 1),
        (']', _, _) => (TokenKind::RBracket, 1),
        ('.', _, _) => (TokenKind::Dot, 1),
        (',', _, _) => (TokenKind::Comma, 1),
        (ch, _, _) => return Err(FilterError::UnexpectedCharacter { ch, position: pos }),
    };
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators_take_longest_match() {
        assert_eq!(
            kinds("a === 1 !== b != c == d"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::StrictEq,
                TokenKind::Number(1.0),
                TokenKind::StrictNe,
                TokenKind::Ident("b".into()),
                TokenKind::Ne,
                TokenKind::Ident("c".into()),
                TokenKind::Eq,
                TokenKind::Ident("d".into()),
            ]
        );
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(
            kinds(r#"'it\'s' "two""#),
            vec![TokenKind::Str("it's".into()), TokenKind::Str("two".into())]
        );
    }

    #[test]
    fn test_word_operators() {
        assert_eq!(
            kinds("not a and b or c"),
            vec![
                TokenKind::Not,
                TokenKind::Ident("a".into()),
                TokenKind::And,
                TokenKind::Ident("b".into()),
                TokenKind::Or,
                TokenKind::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn test_lex_errors() {
        assert_eq!(
            tokenize("a = 1"),
            Err(FilterError::UnexpectedCharacter {
                ch: '=',
                position: 2
            })
        );
        assert_eq!(
            tokenize("name == 'open"),
            Err(FilterError::UnterminatedString { position: 8 })
        );
        assert!(matches!(
            tokenize("1.2.3"),
            Err(FilterError::InvalidNumber { .. })
        ));
    }
}
