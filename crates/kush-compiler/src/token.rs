//! Token definitions for the Kush programming language.
//!
//! This module defines every terminal that can appear in Kush source code
//! (keywords, operators, punctuation and literal classes), the `Token` value
//! produced by the lexer, compact `TokenSet` bitsets used for FIRST and follow
//! sets, and the `TokenStream` consumed by the parser.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// The kind of a token.
///
/// The discriminant doubles as the bit index inside a [`TokenSet`], so the
/// enum must stay below 128 variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum TokenKind {
    // Keywords
    Abstract,
    Annotation,
    Assert,
    Break,
    Catch,
    Class,
    Continue,
    Else,
    Enum,
    Extends,
    False,
    Final,
    Finally,
    For,
    Function,
    If,
    Import,
    Is,
    Native,
    New,
    Null,
    Package,
    Private,
    Public,
    Return,
    Secret,
    Static,
    Synchronize,
    This,
    Throw,
    True,
    Try,
    Var,
    While,
    With,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    Colon,
    Question,
    At,
    Hash,

    // Assignment
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    AmpEqual,
    PipeEqual,
    CaretEqual,
    LessLessEqual,
    GreaterGreaterEqual,
    GreaterGreaterGreaterEqual,

    // Comparison
    EqualEqual,
    BangEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    // Shift
    LessLess,
    GreaterGreater,
    GreaterGreaterGreater,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Unary
    PlusPlus,
    MinusMinus,
    Bang,
    Tilde,

    // Bitwise and logical
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,

    // Literals and identifiers
    Identifier,
    Integer,
    FloatingPoint,
    String,

    // Special
    /// Malformed input; always accompanied by a recorded lexical error.
    Unknown,
    /// Distinguished end-of-stream marker appended by the lexer.
    EndOfStream,
}

impl TokenKind {
    /// Every token kind, indexed by discriminant.
    pub const ALL: [TokenKind; 90] = [
        TokenKind::Abstract,
        TokenKind::Annotation,
        TokenKind::Assert,
        TokenKind::Break,
        TokenKind::Catch,
        TokenKind::Class,
        TokenKind::Continue,
        TokenKind::Else,
        TokenKind::Enum,
        TokenKind::Extends,
        TokenKind::False,
        TokenKind::Final,
        TokenKind::Finally,
        TokenKind::For,
        TokenKind::Function,
        TokenKind::If,
        TokenKind::Import,
        TokenKind::Is,
        TokenKind::Native,
        TokenKind::New,
        TokenKind::Null,
        TokenKind::Package,
        TokenKind::Private,
        TokenKind::Public,
        TokenKind::Return,
        TokenKind::Secret,
        TokenKind::Static,
        TokenKind::Synchronize,
        TokenKind::This,
        TokenKind::Throw,
        TokenKind::True,
        TokenKind::Try,
        TokenKind::Var,
        TokenKind::While,
        TokenKind::With,
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::LeftBracket,
        TokenKind::RightBracket,
        TokenKind::Semicolon,
        TokenKind::Comma,
        TokenKind::Dot,
        TokenKind::Ellipsis,
        TokenKind::Colon,
        TokenKind::Question,
        TokenKind::At,
        TokenKind::Hash,
        TokenKind::Equal,
        TokenKind::PlusEqual,
        TokenKind::MinusEqual,
        TokenKind::StarEqual,
        TokenKind::SlashEqual,
        TokenKind::PercentEqual,
        TokenKind::AmpEqual,
        TokenKind::PipeEqual,
        TokenKind::CaretEqual,
        TokenKind::LessLessEqual,
        TokenKind::GreaterGreaterEqual,
        TokenKind::GreaterGreaterGreaterEqual,
        TokenKind::EqualEqual,
        TokenKind::BangEqual,
        TokenKind::Less,
        TokenKind::Greater,
        TokenKind::LessEqual,
        TokenKind::GreaterEqual,
        TokenKind::LessLess,
        TokenKind::GreaterGreater,
        TokenKind::GreaterGreaterGreater,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::PlusPlus,
        TokenKind::MinusMinus,
        TokenKind::Bang,
        TokenKind::Tilde,
        TokenKind::Amp,
        TokenKind::Pipe,
        TokenKind::Caret,
        TokenKind::AmpAmp,
        TokenKind::PipePipe,
        TokenKind::Identifier,
        TokenKind::Integer,
        TokenKind::FloatingPoint,
        TokenKind::String,
        TokenKind::Unknown,
        TokenKind::EndOfStream,
    ];

    /// Source spelling for fixed tokens, or a descriptive name for classes.
    pub fn spelling(self) -> &'static str {
        match self {
            TokenKind::Abstract => "abstract",
            TokenKind::Annotation => "annotation",
            TokenKind::Assert => "assert",
            TokenKind::Break => "break",
            TokenKind::Catch => "catch",
            TokenKind::Class => "class",
            TokenKind::Continue => "continue",
            TokenKind::Else => "else",
            TokenKind::Enum => "enum",
            TokenKind::Extends => "extends",
            TokenKind::False => "false",
            TokenKind::Final => "final",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::Is => "is",
            TokenKind::Native => "native",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Package => "package",
            TokenKind::Private => "private",
            TokenKind::Public => "public",
            TokenKind::Return => "return",
            TokenKind::Secret => "secret",
            TokenKind::Static => "static",
            TokenKind::Synchronize => "synchronize",
            TokenKind::This => "this",
            TokenKind::Throw => "throw",
            TokenKind::True => "true",
            TokenKind::Try => "try",
            TokenKind::Var => "var",
            TokenKind::While => "while",
            TokenKind::With => "with",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::At => "@",
            TokenKind::Hash => "#",
            TokenKind::Equal => "=",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::PercentEqual => "%=",
            TokenKind::AmpEqual => "&=",
            TokenKind::PipeEqual => "|=",
            TokenKind::CaretEqual => "^=",
            TokenKind::LessLessEqual => "<<=",
            TokenKind::GreaterGreaterEqual => ">>=",
            TokenKind::GreaterGreaterGreaterEqual => ">>>=",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessLess => "<<",
            TokenKind::GreaterGreater => ">>",
            TokenKind::GreaterGreaterGreater => ">>>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Identifier => "identifier",
            TokenKind::Integer => "integer literal",
            TokenKind::FloatingPoint => "floating point literal",
            TokenKind::String => "string literal",
            TokenKind::Unknown => "unknown token",
            TokenKind::EndOfStream => "end of stream",
        }
    }

    /// Check if this kind is a reserved word.
    pub fn is_keyword(self) -> bool {
        (self as u8) <= (TokenKind::With as u8)
    }

    /// Check if this kind is a literal value (including `true`, `false` and `null`).
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::FloatingPoint
                | TokenKind::String
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Check if this kind is a class member modifier.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Public
                | TokenKind::Private
                | TokenKind::Secret
                | TokenKind::Static
                | TokenKind::Native
                | TokenKind::Abstract
        )
    }

    /// Check if this kind is an assignment operator.
    pub fn is_assignment_operator(self) -> bool {
        (TokenKind::Equal as u8..=TokenKind::GreaterGreaterGreaterEqual as u8).contains(&(self as u8))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier
            | TokenKind::Integer
            | TokenKind::FloatingPoint
            | TokenKind::String
            | TokenKind::Unknown
            | TokenKind::EndOfStream => f.write_str(self.spelling()),
            _ => write!(f, "'{}'", self.spelling()),
        }
    }
}

/// A set of token kinds, stored as a 128-bit mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet(u128);

impl TokenSet {
    /// The empty set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Build a set from a list of kinds. Usable in `const` items.
    pub const fn of(kinds: &[TokenKind]) -> TokenSet {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1u128 << (kinds[i] as u8);
            i += 1;
        }
        TokenSet(bits)
    }

    /// Union of two sets.
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    /// Add a single kind.
    pub const fn with(self, kind: TokenKind) -> TokenSet {
        TokenSet(self.0 | (1u128 << (kind as u8)))
    }

    /// Remove a single kind.
    pub const fn without(self, kind: TokenKind) -> TokenSet {
        TokenSet(self.0 & !(1u128 << (kind as u8)))
    }

    #[inline]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1u128 << (kind as u8)) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the kinds in the set, in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }

    /// Collect the kinds into a vector (used by diagnostics).
    pub fn to_vec(self) -> Vec<TokenKind> {
        self.iter().collect()
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<TokenKind> for TokenSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter().fold(TokenSet::EMPTY, TokenSet::with)
    }
}

/// Source location information for tokens and AST nodes.
///
/// `start`/`end` are byte offsets; `line`/`column` are 1-based and refer to
/// the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    /// Starting byte offset
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Span covering `self` through `end`.
    pub fn to(&self, end: &Span) -> Span {
        Span {
            start: self.start,
            end: end.end.max(self.start),
            line: self.line,
            column: self.column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A token produced by the lexer. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The lexeme exactly as it appears in the source.
    pub text: String,
    pub span: Span,
    /// Path of the compilation unit the token was read from.
    pub file: Arc<str>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, file: Arc<str>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            file,
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.span.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.span.column
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfStream => f.write_str("end of stream"),
            TokenKind::Identifier => write!(f, "identifier '{}'", self.text),
            TokenKind::Integer | TokenKind::FloatingPoint | TokenKind::String => {
                write!(f, "literal {}", self.text)
            }
            _ => write!(f, "'{}'", self.text),
        }
    }
}

/// Ordered sequence of tokens with a movable read cursor.
///
/// The last token is always [`TokenKind::EndOfStream`]; consuming at the end
/// of the stream keeps returning it.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    file: Arc<str>,
}

impl TokenStream {
    /// Create a stream, appending an end-of-stream token if missing.
    pub fn new(mut tokens: Vec<Token>, file: Arc<str>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::EndOfStream) {
            let span = match tokens.last() {
                Some(last) => Span::new(last.span.end, last.span.end, last.span.line, last.span.column),
                None => Span::new(0, 0, 1, 1),
            };
            tokens.push(Token::new(TokenKind::EndOfStream, "", span, file.clone()));
        }
        Self {
            tokens,
            cursor: 0,
            file,
        }
    }

    /// Path of the compilation unit this stream was lexed from.
    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    /// Lookahead by offset: `la(1)` is the current token, `la(2)` the next.
    ///
    /// `la(0)` is the previously consumed token (or the first token at the
    /// start of the stream). Offsets past the end yield the end-of-stream token.
    pub fn la(&self, k: usize) -> &Token {
        let index = if k == 0 {
            self.cursor.saturating_sub(1)
        } else {
            self.cursor + k - 1
        };
        &self.tokens[index.min(self.tokens.len() - 1)]
    }

    /// Kind of the token at lookahead offset `k`.
    #[inline]
    pub fn la_kind(&self, k: usize) -> TokenKind {
        self.la(k).kind
    }

    /// The current token.
    #[inline]
    pub fn current(&self) -> &Token {
        self.la(1)
    }

    /// Consume the current token and return it.
    pub fn consume(&mut self) -> Token {
        let token = self.tokens[self.cursor].clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }

    /// Remember the current position.
    #[inline]
    pub fn mark(&self) -> usize {
        self.cursor
    }

    /// Return to a position obtained from [`TokenStream::mark`].
    pub fn reset(&mut self, mark: usize) {
        self.cursor = mark.min(self.tokens.len() - 1);
    }

    /// Index of the current token.
    #[inline]
    pub fn index(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.current().kind == TokenKind::EndOfStream
    }

    /// Number of tokens, including the end-of-stream token.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(kinds: &[TokenKind]) -> TokenStream {
        let file: Arc<str> = Arc::from("test.kush");
        let tokens = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| Token::new(*kind, kind.spelling(), Span::new(i, i + 1, 1, i as u32 + 1), file.clone()))
            .collect();
        TokenStream::new(tokens, file)
    }

    #[test]
    fn test_kind_table_matches_discriminants() {
        for (index, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index, "{:?} out of place", kind);
        }
    }

    #[test]
    fn test_token_set_membership() {
        const SET: TokenSet = TokenSet::of(&[TokenKind::Semicolon, TokenKind::RightBrace]);
        assert!(SET.contains(TokenKind::Semicolon));
        assert!(SET.contains(TokenKind::RightBrace));
        assert!(!SET.contains(TokenKind::Identifier));
        assert_eq!(SET.to_vec(), vec![TokenKind::RightBrace, TokenKind::Semicolon]);

        let wider = SET.with(TokenKind::EndOfStream).without(TokenKind::Semicolon);
        assert!(wider.contains(TokenKind::EndOfStream));
        assert!(!wider.contains(TokenKind::Semicolon));
    }

    #[test]
    fn test_keyword_and_assignment_classes() {
        assert!(TokenKind::With.is_keyword());
        assert!(TokenKind::Abstract.is_keyword());
        assert!(!TokenKind::LeftParen.is_keyword());
        assert!(TokenKind::Equal.is_assignment_operator());
        assert!(TokenKind::GreaterGreaterGreaterEqual.is_assignment_operator());
        assert!(!TokenKind::EqualEqual.is_assignment_operator());
    }

    #[test]
    fn test_stream_appends_end_of_stream() {
        let tokens = stream(&[TokenKind::Identifier]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.la_kind(2), TokenKind::EndOfStream);
    }

    #[test]
    fn test_stream_lookahead_and_consume() {
        let mut tokens = stream(&[TokenKind::Var, TokenKind::Identifier, TokenKind::Semicolon]);
        assert_eq!(tokens.la_kind(1), TokenKind::Var);
        assert_eq!(tokens.la_kind(3), TokenKind::Semicolon);
        assert_eq!(tokens.la_kind(10), TokenKind::EndOfStream);

        let mark = tokens.mark();
        assert_eq!(tokens.consume().kind, TokenKind::Var);
        assert_eq!(tokens.la_kind(0), TokenKind::Var);
        assert_eq!(tokens.current().kind, TokenKind::Identifier);

        tokens.reset(mark);
        assert_eq!(tokens.current().kind, TokenKind::Var);
    }

    #[test]
    fn test_consume_at_end_stays_at_end() {
        let mut tokens = stream(&[]);
        assert!(tokens.at_end());
        assert_eq!(tokens.consume().kind, TokenKind::EndOfStream);
        assert_eq!(tokens.consume().kind, TokenKind::EndOfStream);
        assert!(tokens.at_end());
    }
}
