//! Lexer for the Kush programming language.
//!
//! Scanning is driven by a logos-generated automaton over a private raw token
//! enum, which is converted to [`TokenKind`] afterwards. The lexer never fails:
//! malformed input becomes a single [`TokenKind::Unknown`] token plus a recorded
//! [`LexError`], and the stream always ends with [`TokenKind::EndOfStream`].

use crate::token::{Span, Token, TokenKind, TokenStream};
use logos::Logos;
use std::sync::Arc;
use thiserror::Error;

/// Logos-based token enum for lexing.
///
/// Only used internally; converted to [`TokenKind`] by [`RawToken::kind`].
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    /// Emitted only when the comment runs off the end of the input.
    #[token("/*", lex_block_comment)]
    UnterminatedComment,

    // Keywords (literal tokens outrank the identifier regex)
    #[token("abstract")]
    Abstract,
    #[token("annotation")]
    Annotation,
    #[token("assert")]
    Assert,
    #[token("break")]
    Break,
    #[token("catch")]
    Catch,
    #[token("class")]
    Class,
    #[token("continue")]
    Continue,
    #[token("else")]
    Else,
    #[token("enum")]
    Enum,
    #[token("extends")]
    Extends,
    #[token("false")]
    False,
    #[token("final")]
    Final,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("is")]
    Is,
    #[token("native")]
    Native,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("package")]
    Package,
    #[token("private")]
    Private,
    #[token("public")]
    Public,
    #[token("return")]
    Return,
    #[token("secret")]
    Secret,
    #[token("static")]
    Static,
    #[token("synchronize")]
    Synchronize,
    #[token("this")]
    This,
    #[token("throw")]
    Throw,
    #[token("true")]
    True,
    #[token("try")]
    Try,
    #[token("var")]
    Var,
    #[token("while")]
    While,
    #[token("with")]
    With,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    /// Any run of alphanumerics starting with a digit; classified afterwards
    /// by [`classify_number`].
    #[regex(r"[0-9][0-9A-Za-z_]*")]
    Number,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9]+[eE][+-][0-9]+[fFdD]?")]
    Float,

    #[token("\"", lex_string)]
    #[token("'", lex_string)]
    Str(Closing),

    // Punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("@")]
    At,
    #[token("#")]
    Hash,

    // Operators (logos picks the longest match)
    #[token("=")]
    Equal,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    StarEqual,
    #[token("/=")]
    SlashEqual,
    #[token("%=")]
    PercentEqual,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token("<<=")]
    LessLessEqual,
    #[token(">>=")]
    GreaterGreaterEqual,
    #[token(">>>=")]
    GreaterGreaterGreaterEqual,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("<<")]
    LessLess,
    #[token(">>")]
    GreaterGreater,
    #[token(">>>")]
    GreaterGreaterGreater,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
}

fn lex_block_comment(lex: &mut logos::Lexer<RawToken>) -> logos::Filter<()> {
    // "/*" is already consumed
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            logos::Filter::Skip
        }
        None => {
            lex.bump(remainder.len());
            logos::Filter::Emit(())
        }
    }
}

/// Whether a string literal found its closing quote.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Closing {
    Terminated,
    Unterminated,
}

fn lex_string(lex: &mut logos::Lexer<RawToken>) -> Closing {
    let quote = lex.slice().as_bytes()[0];
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() && bytes[i + 1] != b'\n' => i += 2,
            b'\n' => break,
            b if b == quote => {
                lex.bump(i + 1);
                return Closing::Terminated;
            }
            _ => i += 1,
        }
    }
    // Stop before the newline so the next line lexes normally. The escape
    // skip above can step over a multi-byte sequence, so back off to a
    // character boundary.
    let mut end = i.min(bytes.len());
    while !lex.remainder().is_char_boundary(end) {
        end -= 1;
    }
    lex.bump(end);
    Closing::Unterminated
}

/// Decide whether an alphanumeric run starting with a digit is a valid
/// integer or exponent-only float.
fn classify_number(text: &str) -> Option<TokenKind> {
    let body = text.strip_suffix(['l', 'L']).unwrap_or(text);
    let radix_digits = |digits: &str, radix: u32| !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));

    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        return radix_digits(hex, 16).then_some(TokenKind::Integer);
    }
    if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        return radix_digits(bin, 2).then_some(TokenKind::Integer);
    }
    if let Some(oct) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        return radix_digits(oct, 8).then_some(TokenKind::Integer);
    }
    if radix_digits(body, 10) {
        return Some(TokenKind::Integer);
    }

    // digits [eE] digits [fFdD]?
    let float = text.strip_suffix(['f', 'F', 'd', 'D']).unwrap_or(text);
    let (mantissa, exponent) = float.split_once(['e', 'E'])?;
    (radix_digits(mantissa, 10) && radix_digits(exponent, 10)).then_some(TokenKind::FloatingPoint)
}

impl RawToken {
    fn kind(self) -> TokenKind {
        match self {
            RawToken::Abstract => TokenKind::Abstract,
            RawToken::Annotation => TokenKind::Annotation,
            RawToken::Assert => TokenKind::Assert,
            RawToken::Break => TokenKind::Break,
            RawToken::Catch => TokenKind::Catch,
            RawToken::Class => TokenKind::Class,
            RawToken::Continue => TokenKind::Continue,
            RawToken::Else => TokenKind::Else,
            RawToken::Enum => TokenKind::Enum,
            RawToken::Extends => TokenKind::Extends,
            RawToken::False => TokenKind::False,
            RawToken::Final => TokenKind::Final,
            RawToken::Finally => TokenKind::Finally,
            RawToken::For => TokenKind::For,
            RawToken::Function => TokenKind::Function,
            RawToken::If => TokenKind::If,
            RawToken::Import => TokenKind::Import,
            RawToken::Is => TokenKind::Is,
            RawToken::Native => TokenKind::Native,
            RawToken::New => TokenKind::New,
            RawToken::Null => TokenKind::Null,
            RawToken::Package => TokenKind::Package,
            RawToken::Private => TokenKind::Private,
            RawToken::Public => TokenKind::Public,
            RawToken::Return => TokenKind::Return,
            RawToken::Secret => TokenKind::Secret,
            RawToken::Static => TokenKind::Static,
            RawToken::Synchronize => TokenKind::Synchronize,
            RawToken::This => TokenKind::This,
            RawToken::Throw => TokenKind::Throw,
            RawToken::True => TokenKind::True,
            RawToken::Try => TokenKind::Try,
            RawToken::Var => TokenKind::Var,
            RawToken::While => TokenKind::While,
            RawToken::With => TokenKind::With,
            RawToken::Identifier => TokenKind::Identifier,
            RawToken::Float => TokenKind::FloatingPoint,
            RawToken::LeftParen => TokenKind::LeftParen,
            RawToken::RightParen => TokenKind::RightParen,
            RawToken::LeftBrace => TokenKind::LeftBrace,
            RawToken::RightBrace => TokenKind::RightBrace,
            RawToken::LeftBracket => TokenKind::LeftBracket,
            RawToken::RightBracket => TokenKind::RightBracket,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Question => TokenKind::Question,
            RawToken::At => TokenKind::At,
            RawToken::Hash => TokenKind::Hash,
            RawToken::Equal => TokenKind::Equal,
            RawToken::PlusEqual => TokenKind::PlusEqual,
            RawToken::MinusEqual => TokenKind::MinusEqual,
            RawToken::StarEqual => TokenKind::StarEqual,
            RawToken::SlashEqual => TokenKind::SlashEqual,
            RawToken::PercentEqual => TokenKind::PercentEqual,
            RawToken::AmpEqual => TokenKind::AmpEqual,
            RawToken::PipeEqual => TokenKind::PipeEqual,
            RawToken::CaretEqual => TokenKind::CaretEqual,
            RawToken::LessLessEqual => TokenKind::LessLessEqual,
            RawToken::GreaterGreaterEqual => TokenKind::GreaterGreaterEqual,
            RawToken::GreaterGreaterGreaterEqual => TokenKind::GreaterGreaterGreaterEqual,
            RawToken::EqualEqual => TokenKind::EqualEqual,
            RawToken::BangEqual => TokenKind::BangEqual,
            RawToken::Less => TokenKind::Less,
            RawToken::Greater => TokenKind::Greater,
            RawToken::LessEqual => TokenKind::LessEqual,
            RawToken::GreaterEqual => TokenKind::GreaterEqual,
            RawToken::LessLess => TokenKind::LessLess,
            RawToken::GreaterGreater => TokenKind::GreaterGreater,
            RawToken::GreaterGreaterGreater => TokenKind::GreaterGreaterGreater,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            // Classified by the caller.
            RawToken::Number | RawToken::Str(_) | RawToken::UnterminatedComment => TokenKind::Unknown,
        }
    }
}

/// What went wrong while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{character}'")]
    UnexpectedCharacter {
        /// First offending character
        character: char,
    },

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("malformed number '{text}'")]
    MalformedNumber {
        /// The full malformed lexeme
        text: String,
    },
}

/// A recorded lexical error. The offending text is also present in the token
/// stream as a single [`TokenKind::Unknown`] token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}:{}:{}: {kind}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub path: Arc<str>,
}

impl LexError {
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn column(&self) -> u32 {
        self.span.column
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a hint for fixing this error
    pub fn hint(&self) -> Option<String> {
        match &self.kind {
            LexErrorKind::UnterminatedString => {
                Some("add a closing quote before the end of the line".to_string())
            }
            LexErrorKind::UnterminatedComment => Some("close the comment with '*/'".to_string()),
            LexErrorKind::MalformedNumber { .. } => Some(
                "integers are decimal or 0x/0b/0o prefixed with an optional 'l' suffix".to_string(),
            ),
            LexErrorKind::UnexpectedCharacter { .. } => None,
        }
    }
}

/// Result of tokenizing one source file.
#[derive(Debug, Clone)]
pub struct Lexed {
    pub tokens: TokenStream,
    pub errors: Vec<LexError>,
}

/// Byte offset to 1-based line/column conversion.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { source, line_starts }
    }

    fn span(&self, start: usize, end: usize) -> Span {
        let line = self.line_starts.partition_point(|&s| s <= start) - 1;
        let column = self.source[self.line_starts[line]..start].chars().count() + 1;
        Span::new(start, end, line as u32 + 1, column as u32)
    }
}

/// Characters that end the error token produced for an unexpected character.
fn is_resync_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '.' | '"' | '\'')
}

/// Main lexer structure.
pub struct Lexer<'a> {
    source: &'a str,
    path: Arc<str>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, path: impl Into<Arc<str>>) -> Self {
        Self {
            source,
            path: path.into(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Scan the whole source. Never fails.
    pub fn tokenize(mut self) -> Lexed {
        let index = LineIndex::new(self.source);
        let mut lex = RawToken::lexer(self.source);

        while let Some(result) = lex.next() {
            match result {
                Ok(raw) => {
                    let span = lex.span();
                    let text = lex.slice();
                    let span = index.span(span.start, span.end);
                    let kind = match raw {
                        RawToken::Number => match classify_number(text) {
                            Some(kind) => kind,
                            None => self.error(
                                LexErrorKind::MalformedNumber { text: text.to_string() },
                                span,
                            ),
                        },
                        RawToken::Str(Closing::Terminated) => TokenKind::String,
                        RawToken::Str(Closing::Unterminated) => self.error(LexErrorKind::UnterminatedString, span),
                        RawToken::UnterminatedComment => {
                            self.error(LexErrorKind::UnterminatedComment, span)
                        }
                        other => other.kind(),
                    };
                    self.push(kind, text, span);
                }
                Err(()) => {
                    // Extend the error token to the next boundary so a run of
                    // garbage yields a single error.
                    let rest = lex.remainder();
                    let extra = rest.find(is_resync_boundary).unwrap_or(rest.len());
                    lex.bump(extra);

                    let range = lex.span();
                    let text = lex.slice();
                    let character = text.chars().next().unwrap_or('\0');
                    let span = index.span(range.start, range.end);
                    let kind = self.error(LexErrorKind::UnexpectedCharacter { character }, span);
                    self.push(kind, text, span);
                }
            }
        }

        let end = index.span(self.source.len(), self.source.len());
        self.push(TokenKind::EndOfStream, "", end);

        tracing::debug!(
            path = %self.path,
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "lexed"
        );

        Lexed {
            tokens: TokenStream::new(self.tokens, self.path.clone()),
            errors: self.errors,
        }
    }

    fn push(&mut self, kind: TokenKind, text: &str, span: Span) {
        self.tokens.push(Token::new(kind, text, span, self.path.clone()));
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) -> TokenKind {
        tracing::trace!(line = span.line, column = span.column, error = %kind, "lexical error");
        self.errors.push(LexError {
            kind,
            span,
            path: self.path.clone(),
        });
        TokenKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let lexed = Lexer::new(source, "test.kush").tokenize();
        lexed.tokens.tokens().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_classify_number() {
        assert_eq!(classify_number("42"), Some(TokenKind::Integer));
        assert_eq!(classify_number("42L"), Some(TokenKind::Integer));
        assert_eq!(classify_number("0xFF"), Some(TokenKind::Integer));
        assert_eq!(classify_number("0b1010l"), Some(TokenKind::Integer));
        assert_eq!(classify_number("0o17"), Some(TokenKind::Integer));
        assert_eq!(classify_number("1e10"), Some(TokenKind::FloatingPoint));
        assert_eq!(classify_number("1e10f"), Some(TokenKind::FloatingPoint));
        assert_eq!(classify_number("0x"), None);
        assert_eq!(classify_number("0b102"), None);
        assert_eq!(classify_number("12abc"), None);
        assert_eq!(classify_number("1e"), None);
    }

    #[test]
    fn test_keywords_outrank_identifiers() {
        assert_eq!(
            kinds("class classy for forest"),
            vec![
                TokenKind::Class,
                TokenKind::Identifier,
                TokenKind::For,
                TokenKind::Identifier,
                TokenKind::EndOfStream
            ]
        );
    }

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(
            kinds(">>>= >>> >> >= ..."),
            vec![
                TokenKind::GreaterGreaterGreaterEqual,
                TokenKind::GreaterGreaterGreater,
                TokenKind::GreaterGreater,
                TokenKind::GreaterEqual,
                TokenKind::Ellipsis,
                TokenKind::EndOfStream
            ]
        );
    }

    #[test]
    fn test_block_comment_terminated_is_skipped() {
        assert_eq!(kinds("a /* b \n c */ d"), vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::EndOfStream
        ]);
    }

    #[test]
    fn test_block_comment_unterminated_runs_to_end() {
        let lexed = Lexer::new("a /* b\n c", "test.kush").tokenize();
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedComment);

        let tokens = lexed.tokens.tokens();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text, "/* b\n c");
        assert_eq!(tokens[2].kind, TokenKind::EndOfStream);
    }

    #[test]
    fn test_string_escape_does_not_close() {
        let lexed = Lexer::new(r#""a\"b" 'c'"#, "test.kush").tokenize();
        assert!(lexed.errors.is_empty());
        let tokens = lexed.tokens.tokens();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, r#""a\"b""#);
        assert_eq!(tokens[1].kind, TokenKind::String);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let lexed = Lexer::new("\"abc\nx", "test.kush").tokenize();
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
        let tokens = lexed.tokens.tokens();
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let lexed = Lexer::new("var x;\n  x = 1;", "test.kush").tokenize();
        let tokens = lexed.tokens.tokens();
        assert_eq!((tokens[0].line(), tokens[0].column()), (1, 1));
        assert_eq!((tokens[1].line(), tokens[1].column()), (1, 5));
        assert_eq!((tokens[3].line(), tokens[3].column()), (2, 3));
        assert_eq!((tokens[5].line(), tokens[5].column()), (2, 7));
    }
}
