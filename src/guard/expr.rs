//! Recursive-descent parser for guard condition text.
//!
//! The grammar is the comparison fragment the models actually use: a
//! single `parameter OP value` comparison, or several of them joined by
//! one connective keyword, with optional parentheses around operands.
//! Anything else is [`MalformedGuard`]; callers pattern-match and skip.

use std::sync::Arc;

use thiserror::Error;

use super::lexer::{tokenize, Token, TokenKind};

/// A simple comparison extracted from a guard.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    /// The attribute name the guard references.
    pub parameter: Arc<str>,
    /// Comparison operator as written (`==`, `!=`, `<`, `<=`, `>`, `>=`, `=`).
    pub operator: Arc<str>,
    /// Right-hand comparison value, quotes stripped.
    pub value: Arc<str>,
}

/// Logical connective joining the comparisons of a compound guard.
///
/// Only `AND` is produced by the `&&` normalization; `OR` parses
/// best-effort into the same shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

/// A parsed guard: one comparison or a flat compound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardExpr {
    Comparison(Predicate),
    Compound {
        connective: Connective,
        operands: Vec<Predicate>,
    },
}

impl GuardExpr {
    /// The simple comparisons of this guard, in textual order.
    pub fn leaves(&self) -> &[Predicate] {
        match self {
            Self::Comparison(p) => std::slice::from_ref(p),
            Self::Compound { operands, .. } => operands,
        }
    }
}

/// Guard text outside the supported grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed guard at offset {offset}: {message}")]
pub struct MalformedGuard {
    pub message: String,
    pub offset: usize,
}

/// Parse normalized guard text.
pub fn parse(text: &str) -> Result<GuardExpr, MalformedGuard> {
    let tokens = tokenize(text);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: text.len(),
    };
    let (leaves, connective) = parser.expr()?;
    if !parser.at_eof() {
        return Err(parser.error("trailing input after expression"));
    }
    match (leaves.len(), connective) {
        (1, _) => {
            let mut leaves = leaves;
            Ok(GuardExpr::Comparison(leaves.remove(0)))
        }
        (_, Some(connective)) => Ok(GuardExpr::Compound {
            connective,
            operands: leaves,
        }),
        // expr() only returns multiple leaves with a connective.
        _ => Err(parser.error("empty expression")),
    }
}

struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().map(|t| t.kind) == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<&Token<'a>> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.current().map(|t| t.offset).unwrap_or(self.end)
    }

    fn error(&self, message: impl Into<String>) -> MalformedGuard {
        MalformedGuard {
            message: message.into(),
            offset: self.offset(),
        }
    }

    /// `operand (CONN operand)*`, all connectives identical.
    fn expr(&mut self) -> Result<(Vec<Predicate>, Option<Connective>), MalformedGuard> {
        let (mut leaves, mut connective) = self.operand()?;
        loop {
            let next = match self.current().map(|t| t.kind) {
                Some(TokenKind::And) => Connective::And,
                Some(TokenKind::Or) => Connective::Or,
                _ => break,
            };
            self.pos += 1;
            match connective {
                None => connective = Some(next),
                Some(existing) if existing != next => {
                    return Err(self.error("mixed connectives"));
                }
                Some(_) => {}
            }
            let (more, nested) = self.operand()?;
            if let Some(nested) = nested {
                if nested != next {
                    return Err(self.error("mixed connectives"));
                }
            }
            leaves.extend(more);
        }
        Ok((leaves, connective))
    }

    /// `'(' expr ')'` or a single comparison.
    fn operand(&mut self) -> Result<(Vec<Predicate>, Option<Connective>), MalformedGuard> {
        if self.at(TokenKind::LParen) {
            self.pos += 1;
            let inner = self.expr()?;
            if !self.at(TokenKind::RParen) {
                return Err(self.error("expected `)`"));
            }
            self.pos += 1;
            return Ok(inner);
        }
        Ok((vec![self.comparison()?], None))
    }

    fn comparison(&mut self) -> Result<Predicate, MalformedGuard> {
        let parameter = match self.current() {
            Some(t) if t.kind == TokenKind::Ident => Arc::from(t.text),
            _ => return Err(self.error("expected an attribute name")),
        };
        self.pos += 1;

        let operator: Arc<str> = match self.current().map(|t| t.kind) {
            Some(
                TokenKind::EqEq
                | TokenKind::BangEq
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::Eq,
            ) => {
                let t = self.bump().map(|t| t.text).unwrap_or_default();
                Arc::from(t)
            }
            _ => return Err(self.error("expected a comparison operator")),
        };

        let value: Arc<str> = match self.current() {
            Some(t) if t.kind == TokenKind::Number || t.kind == TokenKind::Ident => {
                Arc::from(t.text)
            }
            Some(t) if t.kind == TokenKind::QuotedString => {
                Arc::from(&t.text[1..t.text.len() - 1])
            }
            _ => return Err(self.error("expected a comparison value")),
        };
        self.pos += 1;

        Ok(Predicate {
            parameter,
            operator,
            value,
        })
    }
}
