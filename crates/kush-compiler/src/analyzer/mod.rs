//! Name binding for a parsed compilation unit
//!
//! Analysis runs in two steps:
//!
//! 1. A definition pass, implemented as an [`AstListener`], walks the tree once.
//!    It opens a scope for every scope-introducing node, records it in an
//!    [`AstAnnotations`] table and defines the declared names.
//! 2. Superclass resolution runs over the finished table, so a class may extend
//!    one declared later in the file.

pub mod error;

pub use error::{BindError, InternalError};

use crate::ast::*;
use crate::component::{MainComponent, MainComponentDetector};
use crate::config::FrontendConfig;
use crate::symbols::{
    ClassSymbol, FunctionSymbol, Modifiers, ResolutionState, ScopeId, ScopeKind, Symbol,
    SymbolId, SymbolKind, SymbolTable,
};
use crate::token::Token;
use crate::{STACK_RED_ZONE, STACK_SEGMENT};

/// Result of analyzing one compilation unit.
#[derive(Debug)]
pub struct Analysis {
    pub symbols: SymbolTable,
    /// Scope opened by each scope-introducing node
    pub scopes: AstAnnotations<ScopeId>,
    pub root_scope: ScopeId,
    pub errors: Vec<BindError>,
    /// Dotted name from the package declaration
    pub package: Option<String>,
    pub main_component: MainComponent,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Scope recorded for `node`, if it introduces one.
    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.scopes.get(node).copied()
    }
}

/// Semantic analyzer for Kush compilation units.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: FrontendConfig,
}

impl Analyzer {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Define and resolve the symbols of the unit rooted at `root`.
    pub fn analyze(&self, ast: &Ast, root: NodeId) -> Result<Analysis, InternalError> {
        let kind = ast.kind(root);
        if kind != NodeKind::CompilationUnit {
            return Err(InternalError::NotACompilationUnit { node: root, kind });
        }

        let mut pass = DefinitionPass::new(&self.config, ast.file());
        AstWalker::new(ast).walk(&mut pass, root);

        let depth = pass.symbols.ancestors(pass.symbols.current_scope_id()).count();
        if depth != 1 {
            return Err(InternalError::UnbalancedScopes { depth });
        }

        let DefinitionPass {
            mut symbols,
            scopes,
            mut errors,
            package,
            detector,
            classes,
            ..
        } = pass;

        resolve_superclasses(ast, &mut symbols, &classes, &mut errors);
        detect_cycles(&mut symbols, &classes, &mut errors);

        tracing::debug!(
            path = %ast.file(),
            scopes = symbols.scope_count(),
            symbols = symbols.symbol_count(),
            errors = errors.len(),
            "analyzed"
        );

        Ok(Analysis {
            root_scope: symbols.root(),
            symbols,
            scopes,
            errors,
            package,
            main_component: detector.finish(),
        })
    }
}

/// A class awaiting superclass resolution.
#[derive(Debug, Clone)]
struct PendingClass {
    symbol: SymbolId,
    /// Scope the class is declared in; names resolve from here
    enclosing: ScopeId,
    /// `QualifiedName` nodes of the extends clause
    extends: Vec<NodeId>,
}

/// Label of an enclosing loop.
#[derive(Debug, Clone)]
struct LoopLabel {
    name: String,
}

struct DefinitionPass {
    symbols: SymbolTable,
    scopes: AstAnnotations<ScopeId>,
    errors: Vec<BindError>,
    package: Option<String>,
    detector: MainComponentDetector,
    classes: Vec<PendingClass>,
    close_local_scopes: bool,

    /// Modifiers of the class members being entered, with the class scope
    /// they apply to
    member_modifiers: Vec<(ScopeId, Modifiers)>,
    /// Labels of the loops enclosing the current statement
    labels: Vec<LoopLabel>,
    /// Label stacks of the enclosing functions and classes
    saved_labels: Vec<Vec<LoopLabel>>,
    next_loop: u32,
}

impl DefinitionPass {
    fn new(config: &FrontendConfig, path: &str) -> Self {
        Self {
            symbols: SymbolTable::new(),
            scopes: AstAnnotations::new(),
            errors: Vec::new(),
            package: None,
            detector: MainComponentDetector::new(&config.main_function, path),
            classes: Vec::new(),
            close_local_scopes: config.close_local_scopes,
            member_modifiers: Vec::new(),
            labels: Vec::new(),
            saved_labels: Vec::new(),
            next_loop: 0,
        }
    }

    /// Define `symbol` in `scope`, applying member modifiers and reporting
    /// duplicates.
    fn define_in(&mut self, scope: ScopeId, symbol: Symbol) -> Option<SymbolId> {
        let symbol = match self.member_modifiers.last() {
            Some((member_scope, modifiers)) if *member_scope == scope => {
                symbol.with_modifiers(*modifiers)
            }
            _ => symbol,
        };
        match self.symbols.define_in(scope, symbol) {
            Ok(id) => Some(id),
            Err(duplicate) => {
                let original = self.symbols.symbol(duplicate.original).token.span;
                self.errors.push(BindError::DuplicateSymbol {
                    name: duplicate.name,
                    original,
                    duplicate: duplicate.duplicate.span,
                });
                None
            }
        }
    }

    fn define(&mut self, symbol: Symbol) -> Option<SymbolId> {
        self.define_in(self.symbols.current_scope_id(), symbol)
    }

    /// Open a scope for `node` below the current one.
    fn open(&mut self, kind: ScopeKind, node: NodeId) -> ScopeId {
        let scope = self.symbols.push_scope(kind, Some(node));
        self.scopes.insert(node, scope);
        scope
    }

    fn close(&mut self) {
        let close = self.close_local_scopes && self.symbols.current().kind == ScopeKind::Local;
        self.symbols.pop_scope(close);
    }

    /// Open the member scope of a named declaration and define its symbol in
    /// the enclosing scope.
    fn open_owned(
        &mut self,
        node: NodeId,
        token: &Token,
        scope_kind: ScopeKind,
        symbol_kind: impl FnOnce(ScopeId) -> SymbolKind,
    ) -> (ScopeId, Option<SymbolId>) {
        let enclosing = self.symbols.current_scope_id();
        let scope = self.open(scope_kind, node);
        let symbol = self.define_in(enclosing, Symbol::new(token.clone(), symbol_kind(scope)));
        if let Some(symbol) = symbol {
            self.symbols.set_owner(scope, symbol);
        }
        (scope, symbol)
    }

    /// Loop labels do not cross function or class boundaries.
    fn enter_label_boundary(&mut self) {
        self.saved_labels.push(std::mem::take(&mut self.labels));
    }

    fn exit_label_boundary(&mut self) {
        self.labels = self.saved_labels.pop().unwrap_or_default();
    }

    fn resolve_label(&mut self, ast: &Ast, identifier: Option<NodeId>) {
        let Some(token) = identifier.and_then(|id| ast.terminal(id)) else {
            return;
        };
        if !self.labels.iter().rev().any(|label| label.name == token.text) {
            self.errors.push(BindError::UnresolvedSymbol {
                name: token.text.clone(),
                span: token.span,
            });
        }
    }

    fn is_top_level(&self) -> bool {
        self.symbols.current_scope_id() == self.symbols.root()
    }
}

impl AstListener for DefinitionPass {
    fn enter_compilation_unit(
        &mut self,
        _walker: &mut AstWalker<'_>,
        node: NodeId,
        _context: &CompilationUnitContext,
    ) {
        self.scopes.insert(node, self.symbols.root());
    }

    fn enter_package_declaration(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &PackageDeclarationContext,
    ) {
        self.package = walker.ast().qualified_name(context.qualified_name);
        walker.set_state(WalkerState::SkipChildren);
    }

    fn enter_import_declaration(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &ImportDeclarationContext,
    ) {
        walker.set_state(WalkerState::SkipChildren);
        // `import a.b.*;` binds no name of its own.
        if context.wildcard {
            return;
        }
        let ast = walker.ast();
        let Context::QualifiedName(name) = ast.context(context.qualified_name) else {
            return;
        };
        let Some(last) = name.identifiers.last().and_then(|id| ast.terminal(*id)) else {
            return;
        };
        let qualified_name = ast.qualified_name(context.qualified_name).unwrap_or_default();
        self.define(Symbol::new(last.clone(), SymbolKind::External { qualified_name }));
    }

    fn enter_annotation(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &AnnotationContext,
    ) {
        walker.set_state(WalkerState::SkipChildren);
    }

    fn enter_class_member(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &ClassMemberContext,
    ) {
        let ast = walker.ast();
        let mut modifiers = Modifiers::NONE;
        for id in &context.modifiers {
            if let Some(modifier) = ast.terminal(*id).and_then(|t| Modifiers::from_token_kind(t.kind)) {
                modifiers.insert(modifier);
            }
        }
        self.member_modifiers
            .push((self.symbols.current_scope_id(), modifiers));
    }

    fn exit_class_member(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &ClassMemberContext,
    ) {
        self.member_modifiers.pop();
    }

    fn enter_class_declaration(
        &mut self,
        walker: &mut AstWalker<'_>,
        node: NodeId,
        context: &ClassDeclarationContext,
    ) {
        let ast = walker.ast();
        let Some(token) = ast.terminal(context.identifier) else {
            return;
        };
        if self.is_top_level() {
            self.detector.class(&token.text, node);
        }
        let enclosing = self.symbols.current_scope_id();
        let (_, symbol) = self.open_owned(node, token, ScopeKind::Class, |scope| {
            SymbolKind::Class(ClassSymbol::new(scope))
        });

        let extends = match context.class_extends_clause.map(|id| ast.context(id)) {
            Some(Context::ClassExtendsClause(clause)) => clause.qualified_names.clone(),
            _ => Vec::new(),
        };
        if let Some(symbol) = symbol {
            self.classes.push(PendingClass {
                symbol,
                enclosing,
                extends,
            });
        }
        self.enter_label_boundary();
    }

    fn exit_class_declaration(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &ClassDeclarationContext,
    ) {
        self.exit_label_boundary();
        self.close();
    }

    fn enter_class_extends_clause(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &ClassExtendsClauseContext,
    ) {
        walker.set_state(WalkerState::SkipChildren);
    }

    fn enter_annotation_declaration(
        &mut self,
        walker: &mut AstWalker<'_>,
        node: NodeId,
        context: &AnnotationDeclarationContext,
    ) {
        let ast = walker.ast();
        let Some(token) = ast.terminal(context.identifier) else {
            return;
        };
        let (scope, _) = self.open_owned(node, token, ScopeKind::Annotation, |scope| {
            SymbolKind::Class(ClassSymbol::new(scope))
        });
        for attribute in &context.attributes {
            if let Some(token) = ast.terminal(*attribute) {
                self.define_in(scope, Symbol::new(token.clone(), SymbolKind::Variable));
            }
        }
        walker.set_state(WalkerState::SkipChildren);
    }

    fn exit_annotation_declaration(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &AnnotationDeclarationContext,
    ) {
        self.close();
    }

    fn enter_function_declaration(
        &mut self,
        walker: &mut AstWalker<'_>,
        node: NodeId,
        context: &FunctionDeclarationContext,
    ) {
        let ast = walker.ast();
        let Some(token) = ast.terminal(context.identifier) else {
            return;
        };
        if self.is_top_level() {
            self.detector.function(&token.text, node);
        }
        let (parameter_count, variadic) = match ast.context(context.function_parameters) {
            Context::FunctionParameters(parameters) => (
                parameters.fixed_parameters.len(),
                parameters.variable_parameter.is_some(),
            ),
            _ => (0, false),
        };
        self.open_owned(node, token, ScopeKind::Function, |scope| {
            SymbolKind::Function(FunctionSymbol {
                scope,
                parameter_count,
                variadic,
            })
        });
        self.enter_label_boundary();
    }

    fn exit_function_declaration(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &FunctionDeclarationContext,
    ) {
        self.exit_label_boundary();
        self.close();
    }

    fn enter_constructor_declaration(
        &mut self,
        _walker: &mut AstWalker<'_>,
        node: NodeId,
        _context: &ConstructorDeclarationContext,
    ) {
        self.open(ScopeKind::Function, node);
        self.enter_label_boundary();
    }

    fn exit_constructor_declaration(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &ConstructorDeclarationContext,
    ) {
        self.exit_label_boundary();
        self.close();
    }

    fn enter_function_parameters(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &FunctionParametersContext,
    ) {
        let ast = walker.ast();
        let parameters = context
            .fixed_parameters
            .iter()
            .chain(context.variable_parameter.iter());
        for parameter in parameters {
            if let Some(token) = ast.terminal(*parameter) {
                self.define(Symbol::new(token.clone(), SymbolKind::Variable));
            }
        }
        walker.set_state(WalkerState::SkipChildren);
    }

    fn enter_enumeration_declaration(
        &mut self,
        walker: &mut AstWalker<'_>,
        node: NodeId,
        context: &EnumerationDeclarationContext,
    ) {
        let Some(token) = walker.ast().terminal(context.identifier) else {
            return;
        };
        self.open_owned(node, token, ScopeKind::Enumeration, |scope| {
            SymbolKind::Enumeration { scope }
        });
    }

    fn exit_enumeration_declaration(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &EnumerationDeclarationContext,
    ) {
        self.close();
    }

    fn enter_enumeration_base_clause(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &EnumerationBaseClauseContext,
    ) {
        walker.set_state(WalkerState::SkipChildren);
    }

    fn enter_enumerate(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &EnumerateContext,
    ) {
        if let Some(token) = walker.ast().terminal(context.identifier) {
            self.define(Symbol::new(token.clone(), SymbolKind::Enumerate { index: None }));
        }
    }

    fn enter_statement_suite(
        &mut self,
        _walker: &mut AstWalker<'_>,
        node: NodeId,
        _context: &StatementSuiteContext,
    ) {
        self.open(ScopeKind::Local, node);
    }

    fn exit_statement_suite(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &StatementSuiteContext,
    ) {
        self.close();
    }

    fn enter_variable_declarator(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &VariableDeclaratorContext,
    ) {
        if let Some(token) = walker.ast().terminal(context.identifier) {
            self.define(Symbol::new(token.clone(), SymbolKind::Variable));
        }
    }

    fn enter_constant_declarator(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &ConstantDeclaratorContext,
    ) {
        if let Some(token) = walker.ast().terminal(context.identifier) {
            self.define(Symbol::new(token.clone(), SymbolKind::Constant { index: None }));
        }
    }

    fn enter_iterative_statement(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &IterativeStatementContext,
    ) {
        let ast = walker.ast();
        let loop_identifier = self.next_loop;
        self.next_loop += 1;

        let Some(Context::LabelClause(label)) = context.label_clause.map(|id| ast.context(id))
        else {
            return;
        };
        let Some(token) = ast.terminal(label.identifier) else {
            return;
        };
        self.define(Symbol::new(
            token.clone(),
            SymbolKind::Label {
                loop_identifier: Some(loop_identifier),
            },
        ));
        self.labels.push(LoopLabel {
            name: token.text.clone(),
        });
    }

    fn exit_iterative_statement(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &IterativeStatementContext,
    ) {
        if context.label_clause.is_some() {
            self.labels.pop();
        }
    }

    fn enter_for_statement(
        &mut self,
        walker: &mut AstWalker<'_>,
        node: NodeId,
        context: &ForStatementContext,
    ) {
        self.open(ScopeKind::Local, node);
        if let Some(token) = walker.ast().terminal(context.identifier) {
            self.define(Symbol::new(token.clone(), SymbolKind::Variable));
        }
    }

    fn exit_for_statement(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &ForStatementContext,
    ) {
        self.close();
    }

    fn enter_catch_clause(
        &mut self,
        walker: &mut AstWalker<'_>,
        node: NodeId,
        context: &CatchClauseContext,
    ) {
        self.open(ScopeKind::Local, node);
        if let Some(token) = walker.ast().terminal(context.identifier) {
            self.define(Symbol::new(token.clone(), SymbolKind::Variable));
        }
    }

    fn exit_catch_clause(
        &mut self,
        _walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &CatchClauseContext,
    ) {
        self.close();
    }

    fn enter_break_statement(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &BreakStatementContext,
    ) {
        self.resolve_label(walker.ast(), context.identifier);
    }

    fn enter_continue_statement(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        context: &ContinueStatementContext,
    ) {
        self.resolve_label(walker.ast(), context.identifier);
    }
}

// ============================================================================
// Superclass resolution
// ============================================================================

/// Resolve a dotted name from `scope`.
///
/// The first identifier is looked up through the scope chain, including
/// scopes already closed by the definition pass; later identifiers descend
/// into member scopes. An external symbol absorbs the rest of the name.
fn resolve_qualified(
    ast: &Ast,
    symbols: &SymbolTable,
    scope: ScopeId,
    name: &QualifiedNameContext,
) -> Option<SymbolId> {
    let mut parts = name.identifiers.iter().map(|id| ast.text(*id));
    let mut current = symbols.lookup_any(scope, parts.next()?)?;
    for part in parts {
        let symbol = symbols.symbol(current);
        if matches!(symbol.kind, SymbolKind::External { .. }) {
            return Some(current);
        }
        let members = symbol.kind.scope()?;
        current = symbols.scope(members).get(part)?;
    }
    Some(current)
}

fn resolve_superclasses(
    ast: &Ast,
    symbols: &mut SymbolTable,
    classes: &[PendingClass],
    errors: &mut Vec<BindError>,
) {
    for class in classes {
        let mut superclasses = Vec::new();
        let mut imported = Vec::new();
        let mut failed = false;

        for &name_node in &class.extends {
            let Context::QualifiedName(name) = ast.context(name_node) else {
                continue;
            };
            let text = ast.qualified_name(name_node).unwrap_or_default();
            let span = ast.span(name_node);
            match resolve_qualified(ast, symbols, class.enclosing, name) {
                None => {
                    failed = true;
                    errors.push(BindError::UnresolvedSymbol { name: text, span });
                }
                Some(target) => match &symbols.symbol(target).kind {
                    SymbolKind::Class(_) => superclasses.push(target),
                    SymbolKind::External { .. } => imported.push(target),
                    other => {
                        failed = true;
                        errors.push(BindError::NotAClass {
                            name: text,
                            category: other.category(),
                            span,
                        });
                    }
                },
            }
        }

        if let Some(symbol) = symbols.symbol_mut(class.symbol).as_class_mut() {
            symbol.superclasses = superclasses;
            symbol.imported_superclasses = imported;
            symbol.state = if failed {
                ResolutionState::Failed
            } else {
                ResolutionState::Resolved
            };
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Report every inheritance cycle once and fail the classes on it.
fn detect_cycles(symbols: &mut SymbolTable, classes: &[PendingClass], errors: &mut Vec<BindError>) {
    let mut marks = vec![Mark::Unvisited; symbols.symbol_count()];
    let mut cycles: Vec<Vec<SymbolId>> = Vec::new();

    for class in classes {
        if marks[class.symbol.index()] == Mark::Unvisited {
            let mut path = Vec::new();
            visit(symbols, class.symbol, &mut marks, &mut path, &mut cycles);
        }
    }

    for cycle in cycles {
        let Some(&first) = cycle.first() else {
            continue;
        };
        let mut names: Vec<String> = cycle.iter().map(|id| symbols.symbol(*id).name.clone()).collect();
        names.push(symbols.symbol(first).name.clone());

        let head = symbols.symbol(first);
        errors.push(BindError::CyclicInheritance {
            name: head.name.clone(),
            cycle: names,
            span: head.token.span,
        });
        for id in cycle {
            if let Some(class) = symbols.symbol_mut(id).as_class_mut() {
                class.state = ResolutionState::Failed;
            }
        }
    }
}

fn visit(
    symbols: &SymbolTable,
    id: SymbolId,
    marks: &mut [Mark],
    path: &mut Vec<SymbolId>,
    cycles: &mut Vec<Vec<SymbolId>>,
) {
    marks[id.index()] = Mark::InProgress;
    path.push(id);

    let superclasses = symbols
        .symbol(id)
        .as_class()
        .map(|class| class.superclasses.clone())
        .unwrap_or_default();
    for superclass in superclasses {
        match marks[superclass.index()] {
            Mark::Unvisited => stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
                visit(symbols, superclass, marks, path, cycles)
            }),
            Mark::InProgress => {
                if let Some(start) = path.iter().position(|p| *p == superclass) {
                    cycles.push(path[start..].to_vec());
                }
            }
            Mark::Done => {}
        }
    }

    path.pop();
    marks[id.index()] = Mark::Done;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use crate::symbols::SymbolCategory;

    fn analyze_with(source: &str, config: &FrontendConfig) -> (Ast, Analysis) {
        let lexed = Lexer::new(source, "test.kush").tokenize();
        let result = Parser::new(lexed.tokens, config).parse();
        assert!(result.errors.is_empty(), "parse errors: {:?}", result.errors);
        let analysis = Analyzer::new(config)
            .analyze(&result.ast, result.root)
            .expect("analysis should not fail");
        (result.ast, analysis)
    }

    fn analyze(source: &str) -> (Ast, Analysis) {
        analyze_with(source, &FrontendConfig::default())
    }

    fn lookup(analysis: &Analysis, name: &str) -> SymbolId {
        analysis
            .symbols
            .lookup_any(analysis.root_scope, name)
            .unwrap_or_else(|| panic!("no symbol '{}'", name))
    }

    #[test]
    fn test_rejects_non_root() {
        let lexed = Lexer::new("function f() {}", "test.kush").tokenize();
        let result = Parser::new(lexed.tokens, &FrontendConfig::default()).parse();
        let child = result.ast.children(result.root)[0];
        match Analyzer::default().analyze(&result.ast, child) {
            Err(InternalError::NotACompilationUnit { kind, .. }) => {
                assert_eq!(kind, NodeKind::AnnotatedComponentDeclaration)
            }
            _ => panic!("Expected NotACompilationUnit"),
        }
    }

    #[test]
    fn test_package_and_imports() {
        let (_, analysis) = analyze("package a.b; import x.y.Z; import x.w.*;");
        assert_eq!(analysis.package.as_deref(), Some("a.b"));
        let z = analysis.symbols.symbol(lookup(&analysis, "Z"));
        match &z.kind {
            SymbolKind::External { qualified_name } => assert_eq!(qualified_name, "x.y.Z"),
            _ => panic!("Expected external symbol"),
        }
        assert_eq!(analysis.symbols.scope(analysis.root_scope).len(), 1);
    }

    #[test]
    fn test_function_scope_and_parameters() {
        let (_, analysis) = analyze("function f(a, b, ...rest) { var x = a; }");
        let f = analysis.symbols.symbol(lookup(&analysis, "f"));
        match &f.kind {
            SymbolKind::Function(function) => {
                assert_eq!(function.parameter_count, 2);
                assert!(function.variadic);
                let scope = analysis.symbols.scope(function.scope);
                assert_eq!(scope.kind, ScopeKind::Function);
                assert_eq!(scope.len(), 3);
                assert!(scope.get("rest").is_some());
            }
            _ => panic!("Expected function symbol"),
        }
    }

    #[test]
    fn test_every_scope_node_recorded() {
        let (ast, analysis) = analyze(
            "class A { new() {} } function f() { for (var i : xs) {} try {} catch (E e) {} }",
        );
        for (id, node) in ast.iter() {
            let opens_scope = matches!(
                node.kind(),
                NodeKind::CompilationUnit
                    | NodeKind::ClassDeclaration
                    | NodeKind::ConstructorDeclaration
                    | NodeKind::FunctionDeclaration
                    | NodeKind::StatementSuite
                    | NodeKind::ForStatement
                    | NodeKind::CatchClause
            );
            assert_eq!(analysis.scope_of(id).is_some(), opens_scope, "{}", node.kind());
        }
    }

    #[test]
    fn test_local_scopes_closed() {
        let (ast, analysis) = analyze("function f() { var x; }");
        let suite = ast
            .iter()
            .find(|(_, n)| n.kind() == NodeKind::StatementSuite)
            .map(|(id, _)| id)
            .unwrap();
        let scope = analysis.scope_of(suite).unwrap();
        assert!(analysis.symbols.scope(scope).closed);
        assert_eq!(analysis.symbols.lookup(scope, "x"), None);
        assert!(analysis.symbols.lookup_any(scope, "x").is_some());

        let config = FrontendConfig::default().with_close_local_scopes(false);
        let (_, open) = analyze_with("function f() { var x; }", &config);
        assert!(open.symbols.scopes().all(|s| !s.closed));
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let (_, analysis) = analyze("function f() {} class f {}");
        assert_eq!(analysis.errors.len(), 1);
        match &analysis.errors[0] {
            BindError::DuplicateSymbol { name, original, duplicate } => {
                assert_eq!(name, "f");
                assert!(original.start < duplicate.start);
            }
            _ => panic!("Expected DuplicateSymbol"),
        }
        let f = analysis.symbols.symbol(lookup(&analysis, "f"));
        assert_eq!(f.category(), SymbolCategory::Function);
    }

    #[test]
    fn test_member_modifiers() {
        let (_, analysis) = analyze(
            "class A { public static var count; private function f(x) {} secret final K = 1; }",
        );
        let class = analysis.symbols.symbol(lookup(&analysis, "A"));
        let members = analysis.symbols.scope(class.kind.scope().unwrap());
        let modifiers = |name: &str| analysis.symbols.symbol(members.get(name).unwrap()).modifiers;

        assert!(modifiers("count").contains(Modifiers::PUBLIC | Modifiers::STATIC));
        assert!(modifiers("f").contains(Modifiers::PRIVATE));
        assert!(modifiers("K").contains(Modifiers::SECRET));

        let f = analysis.symbols.symbol(members.get("f").unwrap());
        let params = analysis.symbols.scope(f.kind.scope().unwrap());
        let x = analysis.symbols.symbol(params.get("x").unwrap());
        assert!(x.modifiers.is_empty());
    }

    #[test]
    fn test_enumeration_and_annotation() {
        let (_, analysis) = analyze("enum Color { RED, GREEN(1), } annotation Tag { value; }");
        let color = analysis.symbols.symbol(lookup(&analysis, "Color"));
        let scope = analysis.symbols.scope(color.kind.scope().unwrap());
        assert_eq!(scope.kind, ScopeKind::Enumeration);
        assert_eq!(scope.len(), 2);

        let tag = analysis.symbols.symbol(lookup(&analysis, "Tag"));
        assert_eq!(tag.category(), SymbolCategory::Class);
        let members = analysis.symbols.scope(tag.kind.scope().unwrap());
        assert_eq!(members.kind, ScopeKind::Annotation);
        assert!(members.get("value").is_some());
    }

    #[test]
    fn test_labels() {
        let (_, analysis) = analyze(
            "function f() { #outer while (true) { for (var x : xs) { break outer; continue; } } }",
        );
        assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);

        let (_, analysis) = analyze("function f() { while (true) { break missing; } }");
        match analysis.errors.as_slice() {
            [BindError::UnresolvedSymbol { name, .. }] => assert_eq!(name, "missing"),
            _ => panic!("Expected one UnresolvedSymbol"),
        }
    }

    #[test]
    fn test_labels_do_not_cross_functions() {
        let (_, analysis) = analyze(
            "function f() { #outer while (true) { function g() { while (true) { break outer; } } } }",
        );
        assert_eq!(analysis.errors.len(), 1);
    }

    #[test]
    fn test_superclass_forward_reference() {
        let (_, analysis) = analyze("class B extends A {} class A {}");
        assert!(analysis.errors.is_empty());
        let b = analysis.symbols.symbol(lookup(&analysis, "B")).as_class().unwrap();
        assert_eq!(b.state, ResolutionState::Resolved);
        assert_eq!(b.superclasses, vec![lookup(&analysis, "A")]);
    }

    #[test]
    fn test_superclass_errors() {
        let (_, analysis) = analyze("enum v { X } class A extends Missing, v {}");
        assert_eq!(analysis.errors.len(), 2);
        assert!(matches!(analysis.errors[0], BindError::UnresolvedSymbol { .. }));
        match &analysis.errors[1] {
            BindError::NotAClass { category, .. } => assert_eq!(*category, SymbolCategory::Enumeration),
            _ => panic!("Expected NotAClass"),
        }
        let a = analysis.symbols.symbol(lookup(&analysis, "A")).as_class().unwrap();
        assert_eq!(a.state, ResolutionState::Failed);
        assert!(a.superclasses.is_empty());
    }

    #[test]
    fn test_qualified_and_imported_superclasses() {
        let (_, analysis) = analyze(
            "import lib.Base; class Outer { class Inner {} } class C extends Outer.Inner, Base {}",
        );
        assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
        let c = analysis.symbols.symbol(lookup(&analysis, "C")).as_class().unwrap();
        assert_eq!(c.superclasses.len(), 1);
        assert_eq!(analysis.symbols.symbol(c.superclasses[0]).name, "Inner");
        assert_eq!(c.imported_superclasses, vec![lookup(&analysis, "Base")]);
    }

    #[test]
    fn test_cyclic_inheritance() {
        let (_, analysis) = analyze("class A extends B {} class B extends A {} class C extends C {}");
        let cycles: Vec<_> = analysis
            .errors
            .iter()
            .filter(|e| matches!(e, BindError::CyclicInheritance { .. }))
            .collect();
        assert_eq!(cycles.len(), 2);
        for name in ["A", "B", "C"] {
            let class = analysis.symbols.symbol(lookup(&analysis, name)).as_class().unwrap();
            assert_eq!(class.state, ResolutionState::Failed);
        }
    }

    #[test]
    fn test_main_component() {
        let (_, analysis) = analyze("class Helper {} function main() {}");
        assert_eq!(analysis.main_component.name(), Some("main"));

        let (_, analysis) = analyze("class test {}");
        assert!(matches!(analysis.main_component, MainComponent::Class { .. }));
    }
}
