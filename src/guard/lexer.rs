//! Logos-based lexer for guard condition text.

use logos::Logos;

/// A token with its kind, text, and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Lexer wrapping the logos-generated tokenizer.
pub(crate) struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = match self.inner.next()? {
            Ok(k) => k,
            Err(()) => TokenKind::Error,
        };
        Some(Token {
            kind,
            text: self.inner.slice(),
            offset: self.inner.span().start,
        })
    }
}

/// Tokenize an entire guard string.
pub(crate) fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum TokenKind {
    // Multi-character operators before single-character ones.
    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("=")]
    Eq,

    // Connective keywords; longest-match keeps `android` an Ident.
    #[regex("AND|and")]
    And,

    #[regex("OR|or")]
    Or,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"'[^']*'")]
    #[regex(r#""[^"]*""#)]
    QuotedString,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// Catch-all for characters outside the grammar.
    #[regex(r".", priority = 0)]
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_comparison_tokens() {
        assert_eq!(
            kinds("age >= 18"),
            [TokenKind::Ident, TokenKind::GtEq, TokenKind::Number]
        );
    }

    #[test]
    fn test_connective_keywords() {
        assert_eq!(
            kinds("a == 1 AND b == 2"),
            [
                TokenKind::Ident,
                TokenKind::EqEq,
                TokenKind::Number,
                TokenKind::And,
                TokenKind::Ident,
                TokenKind::EqEq,
                TokenKind::Number,
            ]
        );
        assert_eq!(kinds("x or y")[1], TokenKind::Or);
    }

    #[test]
    fn test_keyword_prefix_stays_ident() {
        assert_eq!(kinds("android == 1")[0], TokenKind::Ident);
        assert_eq!(kinds("order == 1")[0], TokenKind::Ident);
    }

    #[test]
    fn test_negative_number() {
        assert_eq!(
            kinds("balance < -5"),
            [TokenKind::Ident, TokenKind::Lt, TokenKind::Number]
        );
    }

    #[test]
    fn test_unexpected_character_is_error_token() {
        assert!(kinds("a # b").contains(&TokenKind::Error));
    }
}
