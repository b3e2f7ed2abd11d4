//! SPDX-style license expressions.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr    := and ( OR and )*
//! and     := with ( AND with )*
//! with    := license ( WITH exception )? | "(" expr ")"
//! ```
//!
//! Operators are matched case-insensitively and `/` is accepted as a legacy spelling of `OR`,
//! since both show up in real crate metadata.

use std::fmt;
use thiserror::Error;

/// A license identifier, optionally with an exception (`Apache-2.0 WITH LLVM-exception`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LicenseReq {
    pub license: String,
    pub exception: Option<String>,
}

impl fmt::Display for LicenseReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exception {
            Some(exception) => write!(f, "{} WITH {}", self.license, exception),
            None => f.write_str(&self.license),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LicenseExpr {
    License(LicenseReq),
    And(Vec<LicenseExpr>),
    Or(Vec<LicenseExpr>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("license expression is empty")]
    Empty,
    #[error("invalid character `{ch}` at offset {offset}")]
    InvalidChar { ch: char, offset: usize },
    #[error("unexpected `{token}` at offset {offset}")]
    Unexpected { token: String, offset: usize },
    #[error("unexpected end of license expression")]
    UnexpectedEnd,
    #[error("parentheses nested deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}

/// Maximum parenthesis nesting accepted by [`parse`].
pub const MAX_NESTING: usize = 64;

impl LicenseExpr {
    /// Evaluate the tree with `satisfied` deciding each leaf.
    pub fn evaluate(&self, satisfied: &mut impl FnMut(&LicenseReq) -> bool) -> bool {
        match self {
            LicenseExpr::License(req) => satisfied(req),
            LicenseExpr::And(children) => children.iter().all(|c| c.evaluate(satisfied)),
            LicenseExpr::Or(children) => children.iter().any(|c| c.evaluate(satisfied)),
        }
    }

    /// Leaves in source order.
    pub fn requirements(&self) -> Vec<&LicenseReq> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a LicenseReq>) {
        match self {
            LicenseExpr::License(req) => out.push(req),
            LicenseExpr::And(children) | LicenseExpr::Or(children) => {
                for child in children {
                    child.collect(out);
                }
            }
        }
    }
}

pub fn parse(input: &str) -> Result<LicenseExpr, ParseError> {
    let tokens = lex(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.or_expr()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some((token, offset)) => Err(ParseError::Unexpected {
            token: token.to_string(),
            offset: *offset,
        }),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    And,
    Or,
    With,
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::With => f.write_str("WITH"),
            Token::Ident(s) => f.write_str(s),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+' | ':' | '_')
}

fn lex(input: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((Token::LParen, offset));
            }
            ')' => {
                chars.next();
                tokens.push((Token::RParen, offset));
            }
            '/' => {
                chars.next();
                tokens.push((Token::Or, offset));
            }
            c if is_ident_char(c) => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                let token = match word.to_ascii_uppercase().as_str() {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    "WITH" => Token::With,
                    _ => Token::Ident(word),
                };
                tokens.push((token, offset));
            }
            ch => return Err(ParseError::InvalidChar { ch, offset }),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Open parentheses around the current position.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Result<(Token, usize), ParseError> {
        let item = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(ParseError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(item)
    }

    fn or_expr(&mut self) -> Result<LicenseExpr, ParseError> {
        let mut children = vec![self.and_expr()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            children.push(self.and_expr()?);
        }
        Ok(collapse(children, LicenseExpr::Or))
    }

    fn and_expr(&mut self) -> Result<LicenseExpr, ParseError> {
        let mut children = vec![self.with_expr()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            children.push(self.with_expr()?);
        }
        Ok(collapse(children, LicenseExpr::And))
    }

    fn with_expr(&mut self) -> Result<LicenseExpr, ParseError> {
        match self.next()? {
            (Token::LParen, offset) => {
                if self.depth == MAX_NESTING {
                    return Err(ParseError::TooDeep {
                        limit: MAX_NESTING,
                        offset,
                    });
                }
                self.depth += 1;
                let inner = self.or_expr()?;
                self.depth -= 1;
                match self.next()? {
                    (Token::RParen, _) => Ok(inner),
                    (token, offset) => Err(ParseError::Unexpected {
                        token: token.to_string(),
                        offset,
                    }),
                }
            }
            (Token::Ident(license), _) => {
                let exception = if self.peek() == Some(&Token::With) {
                    self.pos += 1;
                    match self.next()? {
                        (Token::Ident(exception), _) => Some(exception),
                        (token, offset) => {
                            return Err(ParseError::Unexpected {
                                token: token.to_string(),
                                offset,
                            });
                        }
                    }
                } else {
                    None
                };
                Ok(LicenseExpr::License(LicenseReq { license, exception }))
            }
            (token, offset) => Err(ParseError::Unexpected {
                token: token.to_string(),
                offset,
            }),
        }
    }
}

fn collapse(mut children: Vec<LicenseExpr>, wrap: fn(Vec<LicenseExpr>) -> LicenseExpr) -> LicenseExpr {
    if children.len() == 1 {
        children.remove(0)
    } else {
        wrap(children)
    }
}
