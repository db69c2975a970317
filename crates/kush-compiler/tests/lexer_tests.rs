//! Token-level tests for the Kush lexer.

use kush_compiler::{LexErrorKind, Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let lexed = Lexer::new(source, "test.kush").tokenize();
    lexed.tokens.tokens().iter().map(|t| t.kind).collect()
}

fn assert_kinds(source: &str, expected: Vec<TokenKind>) {
    let mut expected_with_eos = expected;
    expected_with_eos.push(TokenKind::EndOfStream);
    assert_eq!(kinds(source), expected_with_eos, "Token mismatch for {:?}", source);
}

// ============================================================================
// Keywords and identifiers
// ============================================================================

#[test]
fn test_assignment_statement_tokens() {
    assert_kinds(
        "x = 1 + 2;",
        vec![
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Integer,
            TokenKind::Plus,
            TokenKind::Integer,
            TokenKind::Semicolon,
        ],
    );
}

#[test]
fn test_keywords_declarations() {
    assert_kinds(
        "class function enum annotation var final",
        vec![
            TokenKind::Class,
            TokenKind::Function,
            TokenKind::Enum,
            TokenKind::Annotation,
            TokenKind::Var,
            TokenKind::Final,
        ],
    );
}

#[test]
fn test_keywords_modifiers() {
    let all = kinds("public private secret static native abstract");
    assert!(all[..6].iter().all(|k| k.is_modifier()));
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_kinds(
        "classy iffy _new new_",
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
        ],
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_integer_forms() {
    assert_kinds(
        "0 42 0xFF 0b1010 0o17 99L",
        vec![TokenKind::Integer; 6],
    );
}

#[test]
fn test_float_forms() {
    assert_kinds(
        "3.14 2.5f 1.0e10 1e5 7E+3d",
        vec![TokenKind::FloatingPoint; 5],
    );
}

#[test]
fn test_member_access_on_integer_is_not_float() {
    assert_kinds(
        "a.b",
        vec![TokenKind::Identifier, TokenKind::Dot, TokenKind::Identifier],
    );
}

#[test]
fn test_string_forms() {
    let lexed = Lexer::new(r#""double" 'single' "esc\"aped""#, "test.kush").tokenize();
    assert!(lexed.errors.is_empty());
    let tokens = lexed.tokens.tokens();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[1].text, "'single'");
    assert_eq!(tokens[2].text, r#""esc\"aped""#);
}

#[test]
fn test_literal_keywords() {
    let all = kinds("true false null");
    assert!(all[..3].iter().all(|k| k.is_literal()));
}

// ============================================================================
// Trivia
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    assert_kinds(
        "a // line\n/* block\n spanning */ b",
        vec![TokenKind::Identifier, TokenKind::Identifier],
    );
}

#[test]
fn test_empty_input_is_end_of_stream() {
    assert_kinds("", vec![]);
    assert_kinds("   \n\t  // nothing\n", vec![]);
}

#[test]
fn test_positions() {
    let lexed = Lexer::new("var x;\n  y", "src/pos.kush").tokenize();
    let y = &lexed.tokens.tokens()[3];
    assert_eq!(y.text, "y");
    assert_eq!((y.line(), y.column()), (2, 3));
    assert_eq!(&*y.file, "src/pos.kush");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unexpected_character_resynchronizes() {
    let lexed = Lexer::new("a $$$ b", "test.kush").tokenize();
    assert_eq!(lexed.errors.len(), 1);
    match &lexed.errors[0].kind {
        LexErrorKind::UnexpectedCharacter { character } => assert_eq!(*character, '$'),
        _ => panic!("Expected unexpected character error"),
    }
    let tokens = lexed.tokens.tokens();
    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert_eq!(tokens[1].text, "$$$");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn test_unterminated_string() {
    let lexed = Lexer::new("\"abc\nx", "test.kush").tokenize();
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
    assert_eq!(lexed.errors[0].line(), 1);
    let tokens = lexed.tokens.tokens();
    assert_eq!(tokens[0].kind, TokenKind::Unknown);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn test_unterminated_comment() {
    let lexed = Lexer::new("a /* never closed", "test.kush").tokenize();
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedComment);
    assert_eq!(
        lexed.tokens.tokens().last().map(|t| t.kind),
        Some(TokenKind::EndOfStream)
    );
}

#[test]
fn test_malformed_number() {
    let lexed = Lexer::new("12abc 0x", "test.kush").tokenize();
    assert_eq!(lexed.errors.len(), 2);
    match &lexed.errors[0].kind {
        LexErrorKind::MalformedNumber { text } => assert_eq!(text, "12abc"),
        _ => panic!("Expected malformed number"),
    }
    assert_eq!(lexed.errors[0].path(), "test.kush");
    assert!(lexed.errors[0].to_string().starts_with("test.kush:1:1:"));
}
