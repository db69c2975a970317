//! Parser for the Kush language
//!
//! A recursive descent parser with one function per grammar rule. Each rule
//! pushes its follow set for the duration of the call; errors travel as
//! [`ParseError`] values to the nearest recovery point (top-level component
//! loop, class member loop, statement suite loop), which records them, drops
//! the partial subtree and resynchronizes with [`recovery::synchronize`].

pub mod decl;
pub mod error;
pub mod expr;
pub mod follow;
pub mod recovery;
pub mod stmt;

use crate::ast::{Ast, Context, NodeId};
use crate::component::MainComponent;
use crate::config::FrontendConfig;
use crate::token::{Span, Token, TokenKind, TokenSet, TokenStream};
use crate::{STACK_RED_ZONE, STACK_SEGMENT};
use recovery::Resync;

pub use error::{ParseError, ParseErrorKind};

/// Output of [`Parser::parse`]. Produced even when errors were recorded.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub ast: Ast,
    /// The `CompilationUnit` node.
    pub root: NodeId,
    pub errors: Vec<ParseError>,
    pub main_component: MainComponent,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parser state for the Kush programming language.
pub struct Parser {
    /// Input with read cursor
    tokens: TokenStream,

    /// Arena receiving the nodes
    ast: Ast,

    /// Follow sets of the rules currently being parsed, innermost last
    follow: Vec<TokenSet>,

    /// Current block/expression nesting
    depth: usize,

    /// Accumulated parse errors (allows continuing after errors)
    errors: Vec<ParseError>,

    max_nesting_depth: usize,
    main_function: String,
}

/// Outcome of handling an error at a recovery point.
enum Recovered {
    /// Parse the next item
    Continue,
    /// Leave the item loop
    Break,
}

impl Parser {
    pub fn new(tokens: TokenStream, config: &FrontendConfig) -> Self {
        let ast = Ast::new(tokens.file().clone());
        Self {
            tokens,
            ast,
            follow: Vec::new(),
            depth: 0,
            errors: Vec::new(),
            max_nesting_depth: config.max_nesting_depth,
            main_function: config.main_function.clone(),
        }
    }

    /// Rebind the parser to a new token stream, discarding all state.
    pub fn reset(&mut self, tokens: TokenStream) {
        self.ast = Ast::new(tokens.file().clone());
        self.tokens = tokens;
        self.follow.clear();
        self.depth = 0;
        self.errors.clear();
    }

    /// Parse the bound token stream from its first token.
    pub fn parse(&mut self) -> ParseResult {
        self.tokens.reset(0);
        self.ast = Ast::new(self.tokens.file().clone());
        self.follow.clear();
        self.depth = 0;
        self.errors.clear();

        let (root, main_component) = decl::parse_compilation_unit(self);

        tracing::debug!(
            path = %self.tokens.file(),
            nodes = self.ast.len(),
            errors = self.errors.len(),
            "parsed"
        );

        ParseResult {
            ast: std::mem::replace(&mut self.ast, Ast::new(self.tokens.file().clone())),
            root,
            errors: std::mem::take(&mut self.errors),
            main_component,
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub(crate) fn main_function(&self) -> &str {
        &self.main_function
    }

    pub(crate) fn file(&self) -> &str {
        self.tokens.file()
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        self.tokens.current()
    }

    /// Kind of the token `k` positions ahead (1 is the current token).
    #[inline]
    pub fn peek_kind(&self, k: usize) -> TokenKind {
        self.tokens.la_kind(k)
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        self.tokens.consume()
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Check if the current token is in the given set.
    #[inline]
    pub fn check_set(&self, set: TokenSet) -> bool {
        set.contains(self.current().kind)
    }

    /// Check if we've reached the end of the stream.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.tokens.at_end()
    }

    /// Consume the current token if it has the expected kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(TokenSet::of(&[kind])))
        }
    }

    /// Consume the current token if it matches, returning whether it did.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of the expected kind into a terminal node.
    pub fn expect_terminal(&mut self, kind: TokenKind) -> Result<NodeId, ParseError> {
        let token = self.expect(kind)?;
        Ok(self.ast.push_terminal(token))
    }

    /// Consume the current token, whatever it is, into a terminal node.
    pub fn terminal(&mut self) -> NodeId {
        let token = self.advance();
        self.ast.push_terminal(token)
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    /// Span of the current token; the start of a rule.
    #[inline]
    pub fn start_span(&self) -> Span {
        self.current().span
    }

    /// Allocate a rule node spanning from `start` to the last consumed token.
    pub fn finish(&mut self, start: Span, context: Context) -> NodeId {
        let end = self.tokens.la(0).span;
        let span = if self.tokens.index() == 0 || end.end < start.start {
            Span::new(start.start, start.start, start.line, start.column)
        } else {
            start.to(&end)
        };
        self.ast.push(context, span)
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    // ========================================================================
    // Rules and recovery
    // ========================================================================

    /// Run a rule body with its follow set pushed.
    pub fn rule<T>(
        &mut self,
        follow: TokenSet,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.follow.push(follow);
        let result = body(self);
        self.follow.pop();
        result
    }

    /// Run a body one nesting level deeper, failing fatally past the limit.
    pub fn nested<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_nesting_depth {
            return Err(ParseError::nesting_too_deep(
                self.max_nesting_depth,
                self.current().clone(),
            ));
        }
        self.depth += 1;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || body(self));
        self.depth -= 1;
        result
    }

    /// Error for the current token when one of `expected` was required.
    pub fn unexpected(&self, expected: TokenSet) -> ParseError {
        ParseError::unexpected_token(expected, self.current().clone())
    }

    /// Error for a rule that cannot choose a production.
    pub fn no_viable_alternative(&self, rule: &'static str, expected: TokenSet) -> ParseError {
        ParseError::no_viable_alternative(rule, expected, self.current().clone())
    }

    /// Handle an error raised by one item of a list.
    ///
    /// `item_start` is the token index and `mark` the arena length taken
    /// before the item. Fatal errors are handed back to the caller.
    fn recover(
        &mut self,
        error: ParseError,
        item_start: usize,
        mark: usize,
        resume: TokenSet,
        terminators: TokenSet,
    ) -> Result<Recovered, ParseError> {
        if error.is_fatal() {
            self.ast.truncate(mark);
            return Err(error);
        }

        self.ast.truncate(mark);
        let mut from = self.tokens.index();
        if from == item_start && !self.at_end() {
            from += 1;
        }

        let resync = recovery::synchronize(
            self.tokens.tokens(),
            from,
            resume,
            terminators,
            &self.follow,
        );
        tracing::trace!(
            line = error.line(),
            column = error.column(),
            skipped = resync.position().saturating_sub(item_start),
            "recovered from syntax error"
        );
        self.errors.push(error);
        self.tokens.reset(resync.position());

        Ok(match resync {
            Resync::Resume(_) => Recovered::Continue,
            Resync::Stop(_) => Recovered::Break,
        })
    }

    /// Parse items until a terminator, recovering from item errors.
    ///
    /// Returns the ids of the items parsed successfully.
    fn item_list(
        &mut self,
        resume: TokenSet,
        terminators: TokenSet,
        mut item: impl FnMut(&mut Self) -> Result<NodeId, ParseError>,
    ) -> Result<Vec<NodeId>, ParseError> {
        let mut items = Vec::new();
        while !self.at_end() && !self.check_set(terminators) {
            let item_start = self.tokens.index();
            let mark = self.ast.len();
            match item(self) {
                Ok(node) => items.push(node),
                Err(error) => match self.recover(error, item_start, mark, resume, terminators)? {
                    Recovered::Continue => continue,
                    Recovered::Break => break,
                },
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::lexer::Lexer;

    fn parser(source: &str) -> Parser {
        let lexed = Lexer::new(source, "test.kush").tokenize();
        Parser::new(lexed.tokens, &FrontendConfig::default())
    }

    #[test]
    fn test_parser_advance() {
        let mut parser = parser("var x");
        assert!(parser.check(TokenKind::Var));
        let tok = parser.advance();
        assert_eq!(tok.kind, TokenKind::Var);
        assert!(parser.check(TokenKind::Identifier));
        assert_eq!(parser.peek_kind(2), TokenKind::EndOfStream);
    }

    #[test]
    fn test_parser_expect_reports_expected() {
        let mut parser = parser("var");
        let err = parser.expect(TokenKind::Semicolon).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.expected, vec![TokenKind::Semicolon]);
    }

    #[test]
    fn test_follow_stack_is_balanced() {
        let mut parser = parser("x");
        let result: Result<(), ParseError> = parser.rule(follow::EXPRESSION_FOLLOW, |p| {
            assert_eq!(p.follow.len(), 1);
            Err(p.unexpected(TokenSet::EMPTY))
        });
        assert!(result.is_err());
        assert!(parser.follow.is_empty());
    }

    #[test]
    fn test_empty_input_parses() {
        let mut parser = parser("");
        let result = parser.parse();
        assert!(!result.has_errors());
        assert_eq!(result.ast.kind(result.root), NodeKind::CompilationUnit);
        assert!(result.main_component.is_module());
    }

    #[test]
    fn test_parse_is_repeatable_and_reset_rebinds() {
        let mut parser = parser("function f() {}");
        let first = parser.parse();
        let second = parser.parse();
        assert_eq!(first.ast.len(), second.ast.len());

        let lexed = Lexer::new("class A {} class B {}", "other.kush").tokenize();
        parser.reset(lexed.tokens);
        let third = parser.parse();
        assert!(!third.has_errors());
        assert_eq!(&**third.ast.file(), "other.kush");
        assert_eq!(third.ast.children(third.root).len(), 2);
    }
}
