//! End-to-end tests: source text through the compiler pipeline to symbols
//! and diagnostics.

use std::collections::BTreeMap;

use kush_compiler::diagnostic::create_files;
use kush_compiler::symbols::{ResolutionState, SymbolCategory};
use kush_compiler::*;

fn compile(source: &str) -> CompilationUnit {
    Compiler::default().compile("unit.kush", source)
}

fn lookup(unit: &CompilationUnit, name: &str) -> SymbolId {
    let analysis = unit.analysis.as_ref().expect("unit was not analyzed");
    analysis
        .symbols
        .scope(analysis.root_scope)
        .get(name)
        .unwrap_or_else(|| panic!("'{}' not defined at top level", name))
}

// ============================================================================
// Clean units
// ============================================================================

#[test]
fn test_clean_unit_is_safe_for_codegen() {
    let unit = compile(
        "package app.core;\n\
         import lib.Base;\n\
         class Service extends Base {\n\
             private var cache = {};\n\
             function get(key) { return cache[key]; }\n\
         }\n",
    );
    assert!(unit.errors.is_empty(), "errors: {:?}", unit.errors);
    assert!(unit.is_safe_for_codegen());

    let analysis = unit.analysis.as_ref().unwrap();
    assert_eq!(analysis.package.as_deref(), Some("app.core"));

    let service = analysis.symbols.symbol(lookup(&unit, "Service"));
    let class = service.as_class().unwrap();
    assert_eq!(class.state, ResolutionState::Resolved);
    assert!(class.superclasses.is_empty());
    assert_eq!(class.imported_superclasses, vec![lookup(&unit, "Base")]);
}

#[test]
fn test_superclass_declared_earlier() {
    let unit = compile("class A {} class B extends A {}");
    assert!(unit.is_safe_for_codegen());

    let analysis = unit.analysis.as_ref().unwrap();
    let a = lookup(&unit, "A");
    let b = analysis.symbols.symbol(lookup(&unit, "B")).as_class().unwrap();
    assert_eq!(b.superclasses, vec![a]);
}

#[test]
fn test_superclass_declared_later() {
    let unit = compile("class B extends A {} class A {}");
    assert!(unit.is_safe_for_codegen());

    let analysis = unit.analysis.as_ref().unwrap();
    let a = lookup(&unit, "A");
    let b = analysis.symbols.symbol(lookup(&unit, "B")).as_class().unwrap();
    assert_eq!(b.superclasses, vec![a]);
    assert_eq!(b.state, ResolutionState::Resolved);
}

#[test]
fn test_every_scope_is_attached_to_its_node() {
    let unit = compile(
        "class A {\n\
             function f(x) {\n\
                 for (var i : x) { }\n\
                 try { } catch (Error e) { }\n\
             }\n\
         }\n",
    );
    assert!(unit.is_safe_for_codegen());
    let analysis = unit.analysis.as_ref().unwrap();

    let scoped: Vec<NodeKind> = unit
        .ast
        .iter()
        .filter(|(id, _)| analysis.scope_of(*id).is_some())
        .map(|(_, node)| node.kind())
        .collect();
    for kind in [
        NodeKind::CompilationUnit,
        NodeKind::ClassDeclaration,
        NodeKind::FunctionDeclaration,
        NodeKind::ForStatement,
        NodeKind::CatchClause,
        NodeKind::StatementSuite,
    ] {
        assert!(scoped.contains(&kind), "no scope recorded for {}", kind);
    }
    // One scope per recorded node
    assert_eq!(scoped.len(), analysis.symbols.scope_count());
    assert_eq!(analysis.scope_of(unit.root), Some(analysis.root_scope));
}

#[test]
fn test_main_component_agrees_with_analysis() {
    let unit = Compiler::default().compile("tools/runner.kush", "class runner {} function helper() {}");
    assert_eq!(unit.main_component.name(), Some("runner"));
    assert_eq!(
        unit.analysis.as_ref().map(|a| a.main_component.clone()),
        Some(unit.main_component.clone())
    );
}

// ============================================================================
// Semantic errors
// ============================================================================

#[test]
fn test_duplicate_keeps_first_definition() {
    let unit = compile("function f() {}\nfunction f(a) {}\n");
    assert_eq!(unit.errors.len(), 1);
    assert_eq!(unit.count(ErrorCategory::DuplicateSymbol), 1);
    assert!(!unit.is_safe_for_codegen());

    let analysis = unit.analysis.as_ref().unwrap();
    let kept = analysis.symbols.symbol(lookup(&unit, "f"));
    assert_eq!(kept.token.line(), 1);

    match &unit.errors[0] {
        CompileError::Semantic(BindError::DuplicateSymbol { name, original, duplicate }) => {
            assert_eq!(name, "f");
            assert_eq!(original.line, 1);
            assert_eq!(duplicate.line, 2);
        }
        other => panic!("Expected duplicate symbol, got {:?}", other),
    }
}

#[test]
fn test_unresolved_superclass() {
    let unit = compile("class A extends Missing {}");
    assert_eq!(unit.count(ErrorCategory::UnresolvedSymbol), 1);
    assert_eq!(unit.errors[0].code(), ErrorCode("E2002"));

    let analysis = unit.analysis.as_ref().unwrap();
    let a = analysis.symbols.symbol(lookup(&unit, "A")).as_class().unwrap();
    assert_eq!(a.state, ResolutionState::Failed);
}

#[test]
fn test_superclass_must_be_a_class() {
    let unit = compile("function helper() {} class A extends helper {}");
    match &unit.errors[..] {
        [CompileError::Semantic(BindError::NotAClass { name, category, .. })] => {
            assert_eq!(name, "helper");
            assert_eq!(*category, SymbolCategory::Function);
        }
        other => panic!("Expected one not-a-class error, got {:?}", other),
    }
}

#[test]
fn test_inheritance_cycle_reported_once() {
    let unit = compile("class A extends C {} class B extends A {} class C extends B {}");
    let cycles: Vec<_> = unit
        .errors
        .iter()
        .filter(|e| matches!(e, CompileError::Semantic(BindError::CyclicInheritance { .. })))
        .collect();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].code(), ErrorCode("E2004"));

    let analysis = unit.analysis.as_ref().unwrap();
    for name in ["A", "B", "C"] {
        let class = analysis.symbols.symbol(lookup(&unit, name)).as_class().unwrap();
        assert_eq!(class.state, ResolutionState::Failed, "{} should have failed", name);
    }
}

#[test]
fn test_unknown_loop_label() {
    let unit = compile("function f() { #outer while (true) { break inner; } }");
    assert_eq!(unit.count(ErrorCategory::UnresolvedSymbol), 1);
    assert_eq!(unit.errors[0].message(), "unresolved symbol 'inner'");
}

// ============================================================================
// Error ordering and configuration
// ============================================================================

#[test]
fn test_errors_ordered_by_phase() {
    let unit = compile("function f() { x = $; } function f() {}");
    let categories: Vec<ErrorCategory> = unit.errors.iter().map(|e| e.category()).collect();
    assert_eq!(
        categories,
        vec![
            ErrorCategory::Lexical,
            ErrorCategory::Syntax,
            ErrorCategory::DuplicateSymbol,
        ]
    );
    assert!(unit.analysis.is_some());
}

#[test]
fn test_analysis_skipped_after_syntax_errors_when_configured() {
    let config = FrontendConfig {
        analyze_with_syntax_errors: false,
        ..FrontendConfig::default()
    };
    let unit = Compiler::new(config).compile("unit.kush", "function f() { x = ; } function f() {}");
    assert!(unit.analysis.is_none());
    assert_eq!(unit.count(ErrorCategory::Syntax), 1);
    assert_eq!(unit.count(ErrorCategory::DuplicateSymbol), 0);
    assert!(!unit.is_safe_for_codegen());
}

#[test]
fn test_open_local_scopes_remain_visible() {
    let config = FrontendConfig::default().with_close_local_scopes(false);
    let unit = Compiler::new(config).compile("unit.kush", "function f() { if (true) { var x = 1; } }");
    let analysis = unit.analysis.as_ref().unwrap();
    assert!(analysis
        .symbols
        .scopes()
        .filter(|scope| scope.kind == ScopeKind::Local)
        .all(|scope| !scope.closed));
}

#[test]
fn test_deeply_nested_blocks_analyzed() {
    let depth = FrontendConfig::default().max_nesting_depth - 1;
    let source = format!(
        "function f(a) {{ {}{} }}",
        "if (a) { ".repeat(depth),
        "} ".repeat(depth)
    );
    let unit = compile(&source);
    assert!(unit.errors.is_empty(), "errors: {:?}", unit.errors);

    let analysis = unit.analysis.as_ref().unwrap();
    let locals = analysis
        .symbols
        .scopes()
        .filter(|scope| scope.kind == ScopeKind::Local)
        .count();
    assert_eq!(locals, depth + 1);
}

#[test]
fn test_compile_all_is_path_ordered_and_independent() {
    let mut sources = BTreeMap::new();
    sources.insert("b.kush".to_string(), "class B extends A {}".to_string());
    sources.insert("a.kush".to_string(), "class A {}".to_string());

    let units = Compiler::default().compile_all(&sources);
    let paths: Vec<&str> = units.iter().map(|u| &*u.path).collect();
    assert_eq!(paths, vec!["a.kush", "b.kush"]);

    // No cross-unit resolution: A is unknown in b.kush
    assert!(units[0].is_safe_for_codegen());
    assert_eq!(units[1].count(ErrorCategory::UnresolvedSymbol), 1);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_duplicate_diagnostic_has_both_locations() {
    let source = "class A {}\nclass A {}\n";
    let unit = compile(source);
    let (files, file_id) = create_files("unit.kush", source);

    let diagnostics = unit.diagnostics(file_id);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), Some(ErrorCode("E2001")));

    let record = diagnostics[0].to_record(&files);
    assert_eq!(record.severity, "error");
    assert_eq!(record.labels.len(), 2);
    assert_eq!(record.labels[0].style, "primary");
    assert_eq!(record.labels[0].start_line, 2);
    assert_eq!(record.labels[1].style, "secondary");
    assert_eq!(record.labels[1].start_line, 1);
}

#[test]
fn test_diagnostic_record_json() {
    let source = "function f() { x = 1 y = 2; }";
    let unit = compile(source);
    let (files, file_id) = create_files("unit.kush", source);

    let records: Vec<DiagnosticRecord> = unit
        .diagnostics(file_id)
        .iter()
        .map(|d| d.to_record(&files))
        .collect();
    let json = serde_json::to_value(&records).unwrap();

    assert_eq!(json[0]["code"], "E1001");
    assert_eq!(json[0]["category"], "syntax");
    assert_eq!(json[0]["message"], "expected ';', found identifier 'y'");
    assert_eq!(json[0]["labels"][0]["file"], "unit.kush");
    assert_eq!(json[0]["labels"][0]["start_column"], 22);
}

#[test]
fn test_rendered_diagnostic_mentions_code_and_help() {
    let source = "function f() { try { } }";
    let unit = compile(source);
    let (files, file_id) = create_files("unit.kush", source);

    let mut out = termcolor::NoColor::new(Vec::new());
    for diagnostic in unit.diagnostics(file_id) {
        diagnostic.emit(&mut out, &files).unwrap();
    }
    let text = String::from_utf8(out.into_inner()).unwrap();
    assert!(text.contains("error[E1001]"), "{}", text);
    assert!(text.contains("unit.kush:1:"), "{}", text);
    assert!(text.contains("catch or finally"), "{}", text);
}
