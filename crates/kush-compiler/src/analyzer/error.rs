//! Error types for name binding
//!
//! Binding errors are recoverable: the analyzer records them and keeps going.
//! [`InternalError`] is reserved for broken invariants of the input tree.

use crate::ast::{NodeId, NodeKind};
use crate::symbols::SymbolCategory;
use crate::token::Span;
use thiserror::Error;

/// Errors that can occur during name binding
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindError {
    /// Duplicate symbol definition in the same scope
    #[error("duplicate symbol '{name}'")]
    DuplicateSymbol {
        name: String,
        /// Location of the definition that was kept
        original: Span,
        /// Location of the rejected definition
        duplicate: Span,
    },

    /// Name with no visible definition
    #[error("unresolved symbol '{name}'")]
    UnresolvedSymbol { name: String, span: Span },

    /// Superclass name bound to something other than a class
    #[error("'{name}' is a {category}, not a class")]
    NotAClass {
        name: String,
        category: SymbolCategory,
        span: Span,
    },

    /// Class that (transitively) extends itself
    #[error("cyclic inheritance: {}", cycle.join(" -> "))]
    CyclicInheritance {
        name: String,
        /// Class names along the cycle, first repeated at the end
        cycle: Vec<String>,
        span: Span,
    },
}

impl BindError {
    /// Primary location of the error.
    pub fn span(&self) -> Span {
        match self {
            BindError::DuplicateSymbol { duplicate, .. } => *duplicate,
            BindError::UnresolvedSymbol { span, .. }
            | BindError::NotAClass { span, .. }
            | BindError::CyclicInheritance { span, .. } => *span,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BindError::DuplicateSymbol { name, .. }
            | BindError::UnresolvedSymbol { name, .. }
            | BindError::NotAClass { name, .. }
            | BindError::CyclicInheritance { name, .. } => name,
        }
    }
}

/// Invariant violations that stop analysis of a unit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InternalError {
    #[error("analysis root {node} is a {kind}, not a compilation unit")]
    NotACompilationUnit { node: NodeId, kind: NodeKind },

    #[error("scope stack not balanced after the definition pass ({depth} scopes open)")]
    UnbalancedScopes { depth: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_messages() {
        let span = Span::new(4, 5, 1, 5);
        let err = BindError::NotAClass {
            name: "x".to_string(),
            category: SymbolCategory::Variable,
            span,
        };
        assert_eq!(err.to_string(), "'x' is a variable, not a class");
        assert_eq!(err.span(), span);

        let cycle = BindError::CyclicInheritance {
            name: "A".to_string(),
            cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()],
            span,
        };
        assert_eq!(cycle.to_string(), "cyclic inheritance: A -> B -> A");
    }

    #[test]
    fn test_duplicate_points_at_second_definition() {
        let err = BindError::DuplicateSymbol {
            name: "x".to_string(),
            original: Span::new(0, 1, 1, 1),
            duplicate: Span::new(10, 11, 2, 1),
        };
        assert_eq!(err.span().line, 2);
        assert_eq!(err.name(), "x");
    }
}
