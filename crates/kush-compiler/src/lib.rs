//! Kush Language Front End
//!
//! Lexer, parser, AST walker and symbol analyzer for the Kush programming
//! language. [`Compiler`] runs the whole pipeline on a source file and
//! produces a [`CompilationUnit`] whose AST nodes are annotated with their
//! scopes and symbols.

pub mod analyzer;
pub mod ast;
pub mod compiler;
pub mod component;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod token;

/// Remaining stack below which recursive descent moves to a fresh segment.
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each segment allocated by `stacker::maybe_grow`.
pub(crate) const STACK_SEGMENT: usize = 2 * 1024 * 1024;

pub use analyzer::{Analysis, Analyzer, BindError, InternalError};
pub use ast::{Ast, AstListener, AstWalker, Context, NodeId, NodeKind, WalkerState};
pub use compiler::{CompilationUnit, Compiler};
pub use component::MainComponent;
pub use config::FrontendConfig;
pub use diagnostic::{Diagnostic, DiagnosticRecord};
pub use error::{CompileError, ErrorCategory, ErrorCode};
pub use lexer::{LexError, LexErrorKind, Lexed, Lexer};
pub use parser::{ParseError, ParseErrorKind, ParseResult, Parser};
pub use symbols::{Scope, ScopeId, ScopeKind, Symbol, SymbolId, SymbolKind, SymbolTable};
pub use token::{Span, Token, TokenKind, TokenSet, TokenStream};
