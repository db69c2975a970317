//! Unified error taxonomy for the front end
//!
//! Every phase keeps its own error type; [`CompileError`] wraps them so a
//! compilation unit carries one ordered list, and assigns each a stable
//! [`ErrorCode`] and an [`ErrorCategory`].

use crate::analyzer::{BindError, InternalError};
use crate::lexer::{LexError, LexErrorKind};
use crate::parser::{ParseError, ParseErrorKind};
use crate::token::Span;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable error code (e.g., "E1001")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Broad class of an error, used for summaries and recovery policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    DuplicateSymbol,
    /// Names that do not resolve, or resolve to the wrong kind of symbol
    UnresolvedSymbol,
    FatalInternal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Lexical => "lexical error",
            ErrorCategory::Syntax => "syntax error",
            ErrorCategory::DuplicateSymbol => "duplicate symbol",
            ErrorCategory::UnresolvedSymbol => "unresolved symbol",
            ErrorCategory::FatalInternal => "internal error",
        };
        f.write_str(name)
    }
}

/// Any error produced while compiling one unit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error("{0}")]
    Semantic(#[from] BindError),

    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}

impl CompileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::Lexical(error) => match error.kind {
                LexErrorKind::UnexpectedCharacter { .. } => ErrorCode("E0001"),
                LexErrorKind::UnterminatedString => ErrorCode("E0002"),
                LexErrorKind::UnterminatedComment => ErrorCode("E0003"),
                LexErrorKind::MalformedNumber { .. } => ErrorCode("E0004"),
            },
            CompileError::Syntax(error) => match error.kind {
                ParseErrorKind::UnexpectedToken => ErrorCode("E1001"),
                ParseErrorKind::UnexpectedEndOfStream => ErrorCode("E1002"),
                ParseErrorKind::NoViableAlternative { .. } => ErrorCode("E1003"),
                ParseErrorKind::NestingTooDeep { .. } => ErrorCode("E1004"),
            },
            CompileError::Semantic(error) => match error {
                BindError::DuplicateSymbol { .. } => ErrorCode("E2001"),
                BindError::UnresolvedSymbol { .. } => ErrorCode("E2002"),
                BindError::NotAClass { .. } => ErrorCode("E2003"),
                BindError::CyclicInheritance { .. } => ErrorCode("E2004"),
            },
            CompileError::Internal(_) => ErrorCode("E9001"),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::Lexical(_) => ErrorCategory::Lexical,
            CompileError::Syntax(_) => ErrorCategory::Syntax,
            CompileError::Semantic(BindError::DuplicateSymbol { .. }) => {
                ErrorCategory::DuplicateSymbol
            }
            CompileError::Semantic(_) => ErrorCategory::UnresolvedSymbol,
            CompileError::Internal(_) => ErrorCategory::FatalInternal,
        }
    }

    /// Whether the error stopped its phase early.
    pub fn is_fatal(&self) -> bool {
        match self {
            CompileError::Syntax(error) => error.is_fatal(),
            CompileError::Internal(_) => true,
            _ => false,
        }
    }

    /// Primary source location, if the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Lexical(error) => Some(error.span),
            CompileError::Syntax(error) => Some(error.span()),
            CompileError::Semantic(error) => Some(error.span()),
            CompileError::Internal(_) => None,
        }
    }

    /// The message without location prefix.
    pub fn message(&self) -> String {
        match self {
            CompileError::Lexical(error) => error.message(),
            CompileError::Syntax(error) => error.message.clone(),
            CompileError::Semantic(error) => error.to_string(),
            CompileError::Internal(error) => error.to_string(),
        }
    }
}
