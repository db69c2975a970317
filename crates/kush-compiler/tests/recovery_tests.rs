//! Syntax error recovery tests
//!
//! Every test checks both the errors reported and that the tree built after
//! the error is still usable.

use kush_compiler::ast::*;
use kush_compiler::{FrontendConfig, Lexer, ParseErrorKind, ParseResult, Parser, TokenKind};

fn parse_with(source: &str, config: &FrontendConfig) -> ParseResult {
    let lexed = Lexer::new(source, "broken.kush").tokenize();
    Parser::new(lexed.tokens, config).parse()
}

fn parse(source: &str) -> ParseResult {
    parse_with(source, &FrontendConfig::default())
}

fn count(result: &ParseResult, kind: NodeKind) -> usize {
    result.ast.iter().filter(|(_, n)| n.kind() == kind).count()
}

// ============================================================================
// Statement level
// ============================================================================

#[test]
fn test_missing_semicolon_in_block() {
    let result = parse("function f() { x = 1 y = 2; }");
    assert_eq!(result.errors.len(), 1);

    let error = &result.errors[0];
    assert_eq!(error.kind, ParseErrorKind::UnexpectedToken);
    assert_eq!(error.expected, vec![TokenKind::Semicolon]);
    assert_eq!(error.token.text, "y");
    assert_eq!(error.message, "expected ';', found identifier 'y'");

    // The broken statement is dropped, the next one survives.
    assert_eq!(count(&result, NodeKind::Statement), 1);
    assert_eq!(count(&result, NodeKind::FunctionDeclaration), 1);
}

#[test]
fn test_errors_in_separate_statements() {
    let result = parse("function f() { a = ; b = 2; c = (1; d = 4; }");
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors[0].line() == 1 && result.errors[0].column() < result.errors[1].column());
    assert!(count(&result, NodeKind::Statement) >= 2);
}

#[test]
fn test_missing_closing_brace_at_end() {
    let result = parse("function f() { var x = 1;");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, ParseErrorKind::UnexpectedEndOfStream);
    assert_eq!(result.ast.kind(result.root), NodeKind::CompilationUnit);
}

#[test]
fn test_broken_compound_header_skips_its_block() {
    let result = parse("function f() { if (x { y; } z; } function g() {}");
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
    assert_eq!(result.errors[0].message, "expected ')', found '{'");

    // The if statement and its block are dropped; `z;` and g survive.
    assert_eq!(count(&result, NodeKind::IfStatement), 0);
    assert_eq!(count(&result, NodeKind::Statement), 1);
    assert_eq!(count(&result, NodeKind::FunctionDeclaration), 2);
    let survivors: Vec<&str> = result
        .ast
        .iter()
        .filter_map(|(_, n)| match &n.context {
            Context::Terminal(token) if token.kind == TokenKind::Identifier => Some(token.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(survivors, vec!["f", "z", "g"]);
}

#[test]
fn test_try_without_handler_suggests_fix() {
    let result = parse("function f() { try { } }");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].suggestion.is_some());
}

// ============================================================================
// Member and top level
// ============================================================================

#[test]
fn test_bad_class_member_skipped() {
    let result = parse("class A { var x; 42; function f() {} }");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(count(&result, NodeKind::ClassMember), 2);
}

#[test]
fn test_top_level_garbage_skipped() {
    let result = parse("x + 1; class A {} ) ) function f() {}");
    assert_eq!(result.errors.len(), 2);
    assert_eq!(count(&result, NodeKind::ClassDeclaration), 1);
    assert_eq!(count(&result, NodeKind::FunctionDeclaration), 1);
}

#[test]
fn test_broken_component_resumes_at_next_declaration() {
    let result = parse("class { var x; } class B {}");
    assert!(!result.errors.is_empty());
    let names: Vec<_> = result
        .ast
        .iter()
        .filter_map(|(_, n)| match &n.context {
            Context::ClassDeclaration(class) => Some(result.ast.text(class.identifier).to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["B"]);
}

#[test]
fn test_lexical_garbage_reaches_parser_as_unknown() {
    let lexed = Lexer::new("function f() { x = $; }", "broken.kush").tokenize();
    assert_eq!(lexed.errors.len(), 1);
    let result = Parser::new(lexed.tokens, &FrontendConfig::default()).parse();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].token.kind, TokenKind::Unknown);
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_nesting_limit_is_fatal() {
    let config = FrontendConfig::default().with_max_nesting_depth(4);
    let result = parse_with(
        "function f() { x = ((((((1)))))); } function g() {}",
        &config,
    );
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].is_fatal());
    assert!(matches!(
        result.errors[0].kind,
        ParseErrorKind::NestingTooDeep { limit: 4 }
    ));
    // Parsing stopped: g was never reached.
    assert_eq!(count(&result, NodeKind::FunctionDeclaration), 0);
}

fn nested_parens(depth: usize) -> String {
    // The function body is the first nesting level.
    format!("function f() {{ return {}1{}; }}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_deep_input_just_below_limit() {
    let limit = FrontendConfig::default().max_nesting_depth;
    let result = parse(&nested_parens(limit - 1));
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(count(&result, NodeKind::FunctionDeclaration), 1);
}

#[test]
fn test_default_limit_reported_without_overflow() {
    let limit = FrontendConfig::default().max_nesting_depth;
    let result = parse(&nested_parens(limit));
    assert_eq!(result.errors.len(), 1);
    match result.errors[0].kind {
        ParseErrorKind::NestingTooDeep { limit: reported } => assert_eq!(reported, limit),
        _ => panic!("Expected nesting error"),
    }
}

#[test]
fn test_deep_blocks_just_below_limit() {
    let limit = FrontendConfig::default().max_nesting_depth;
    let depth = limit - 1;
    let source = format!(
        "function f() {{ {}{} }}",
        "while (a) { ".repeat(depth),
        "} ".repeat(depth)
    );
    let result = parse(&source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(count(&result, NodeKind::StatementSuite), limit);
}

#[test]
fn test_recovery_terminates_on_any_input() {
    let inputs = [
        "}}}}",
        "((((",
        "class",
        "function f(",
        "@",
        "enum E { , }",
        "import ;",
        "function f() { #l }",
        "class A { new",
    ];
    for input in inputs {
        let result = parse(input);
        assert!(!result.errors.is_empty(), "no error for {:?}", input);
        assert_eq!(result.ast.kind(result.root), NodeKind::CompilationUnit);
    }
}
