//! Parse error types and error reporting

use crate::token::{Span, Token, TokenKind, TokenSet};
use std::fmt;
use thiserror::Error;

/// A parse error with the offending token and what was expected instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// The token at which the error was detected
    pub token: Token,

    /// Token kinds that would have been accepted
    pub expected: Vec<TokenKind>,

    /// Human-readable error message
    pub message: String,

    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A token that does not fit the rule being parsed
    #[error("unexpected token")]
    UnexpectedToken,

    /// Input ended in the middle of a rule
    #[error("unexpected end of stream")]
    UnexpectedEndOfStream,

    /// No alternative of `rule` starts with the current token
    #[error("no viable alternative for {rule}")]
    NoViableAlternative { rule: &'static str },

    /// Nesting exceeded the configured limit; parsing stops
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.token.file, self.token.span.line, self.token.span.column, self.message
        )?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => String::new(),
        [only] => format!("expected {}", only),
        _ => {
            let kinds: Vec<String> = expected.iter().map(|k| k.to_string()).collect();
            format!("expected one of {}", kinds.join(", "))
        }
    }
}

impl ParseError {
    /// Create an "unexpected token" error, or an "unexpected end of stream"
    /// error when `found` is the end-of-stream token.
    pub fn unexpected_token(expected: TokenSet, found: Token) -> Self {
        let expected = expected.to_vec();
        if found.kind == TokenKind::EndOfStream {
            return Self::unexpected_end(expected, found);
        }
        let message = format!("{}, found {}", describe_expected(&expected), found);

        Self {
            kind: ParseErrorKind::UnexpectedToken,
            token: found,
            expected,
            message,
            suggestion: None,
        }
    }

    fn unexpected_end(expected: Vec<TokenKind>, found: Token) -> Self {
        let message = format!("unexpected end of stream, {}", describe_expected(&expected));
        Self {
            kind: ParseErrorKind::UnexpectedEndOfStream,
            token: found,
            expected,
            message,
            suggestion: None,
        }
    }

    /// Create a "no viable alternative" error for a rule that could not pick
    /// a production.
    pub fn no_viable_alternative(rule: &'static str, expected: TokenSet, found: Token) -> Self {
        let expected = expected.to_vec();
        if found.kind == TokenKind::EndOfStream {
            return Self::unexpected_end(expected, found);
        }
        let message = format!("no viable alternative for {} at {}", rule, found);

        Self {
            kind: ParseErrorKind::NoViableAlternative { rule },
            token: found,
            expected,
            message,
            suggestion: None,
        }
    }

    /// Create a "nesting too deep" error.
    pub fn nesting_too_deep(limit: usize, found: Token) -> Self {
        Self {
            kind: ParseErrorKind::NestingTooDeep { limit },
            token: found,
            expected: Vec::new(),
            message: format!("nesting deeper than {} levels", limit),
            suggestion: Some("split the construct into smaller functions".to_string()),
        }
    }

    /// Add a suggestion to this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn span(&self) -> Span {
        self.token.span
    }

    pub fn line(&self) -> u32 {
        self.token.span.line
    }

    pub fn column(&self) -> u32 {
        self.token.span.column
    }

    /// Fatal errors stop the parse instead of being recovered.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ParseErrorKind::NestingTooDeep { .. })
    }
}
