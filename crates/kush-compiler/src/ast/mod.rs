//! Abstract Syntax Tree for Kush.
//!
//! The tree lives in an arena ([`Ast`]) and nodes are addressed by [`NodeId`].
//! Every node carries a span and a [`Context`]: either a terminal token or the
//! typed context of the grammar rule that produced it. Children are always
//! allocated before their parent, so the tree is acyclic by construction.
//!
//! Traversal goes through one generic [`AstWalker`] that calls an
//! [`AstListener`]. Analysis results are kept outside the tree in
//! [`AstAnnotations`].
//!
//! # Example
//!
//! ```rust,ignore
//! use kush_compiler::ast::*;
//!
//! struct CountClasses {
//!     count: usize,
//! }
//!
//! impl AstListener for CountClasses {
//!     fn enter_class_declaration(
//!         &mut self,
//!         _walker: &mut AstWalker<'_>,
//!         _node: NodeId,
//!         _context: &ClassDeclarationContext,
//!     ) {
//!         self.count += 1;
//!     }
//! }
//! ```

pub mod annotations;
pub mod context;
pub mod walker;

pub use annotations::AstAnnotations;
pub use context::*;
pub use walker::{AstWalker, WalkerState};

use crate::token::{Span, Token};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Handle to a node in an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declares every grammar rule once and derives the node kind tag, the
/// context union, the listener hooks and the hook dispatch from that list.
macro_rules! grammar_rules {
    ($($variant:ident($context:ident) => $enter:ident, $exit:ident;)*) => {
        /// Tag of a node: `Terminal` or the grammar rule that produced it.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum NodeKind {
            Terminal,
            $($variant,)*
        }

        /// Payload of an AST node.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Context {
            Terminal(Token),
            $($variant($context),)*
        }

        impl Context {
            pub fn kind(&self) -> NodeKind {
                match self {
                    Context::Terminal(_) => NodeKind::Terminal,
                    $(Context::$variant(_) => NodeKind::$variant,)*
                }
            }

            /// Non-null children in source order. Terminals have none.
            pub fn children(&self) -> Vec<NodeId> {
                match self {
                    Context::Terminal(_) => Vec::new(),
                    $(Context::$variant(context) => context.children(),)*
                }
            }
        }

        /// Callbacks invoked by [`AstWalker`]. Every hook defaults to a no-op.
        ///
        /// Hooks receive the walker so they can inspect the tree and choose
        /// which children of the current node are visited
        /// ([`AstWalker::set_state`]).
        pub trait AstListener {
            fn on_enter_every_rule(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId) {}

            fn on_exit_every_rule(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId) {}

            fn on_visit_terminal(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId, _token: &Token) {}

            $(
                fn $enter(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId, _context: &$context) {}

                fn $exit(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId, _context: &$context) {}
            )*
        }

        pub(crate) fn dispatch_enter<L: AstListener + ?Sized>(
            listener: &mut L,
            walker: &mut AstWalker<'_>,
            node: NodeId,
            context: &Context,
        ) {
            match context {
                Context::Terminal(_) => {}
                $(Context::$variant(context) => listener.$enter(walker, node, context),)*
            }
        }

        pub(crate) fn dispatch_exit<L: AstListener + ?Sized>(
            listener: &mut L,
            walker: &mut AstWalker<'_>,
            node: NodeId,
            context: &Context,
        ) {
            match context {
                Context::Terminal(_) => {}
                $(Context::$variant(context) => listener.$exit(walker, node, context),)*
            }
        }
    };
}

grammar_rules! {
    CompilationUnit(CompilationUnitContext) => enter_compilation_unit, exit_compilation_unit;
    PackageDeclaration(PackageDeclarationContext) => enter_package_declaration, exit_package_declaration;
    ImportDeclaration(ImportDeclarationContext) => enter_import_declaration, exit_import_declaration;
    AnnotatedComponentDeclaration(AnnotatedComponentDeclarationContext) => enter_annotated_component_declaration, exit_annotated_component_declaration;
    Annotations(AnnotationsContext) => enter_annotations, exit_annotations;
    Annotation(AnnotationContext) => enter_annotation, exit_annotation;
    AnnotationAttribute(AnnotationAttributeContext) => enter_annotation_attribute, exit_annotation_attribute;
    ComponentDeclaration(ComponentDeclarationContext) => enter_component_declaration, exit_component_declaration;
    FunctionDeclaration(FunctionDeclarationContext) => enter_function_declaration, exit_function_declaration;
    FunctionParameters(FunctionParametersContext) => enter_function_parameters, exit_function_parameters;
    ConstructorDeclaration(ConstructorDeclarationContext) => enter_constructor_declaration, exit_constructor_declaration;
    StatementSuite(StatementSuiteContext) => enter_statement_suite, exit_statement_suite;
    Statement(StatementContext) => enter_statement, exit_statement;
    SimpleStatement(SimpleStatementContext) => enter_simple_statement, exit_simple_statement;
    EmptyStatement(EmptyStatementContext) => enter_empty_statement, exit_empty_statement;
    ExpressionStatement(ExpressionStatementContext) => enter_expression_statement, exit_expression_statement;
    VariableDeclaration(VariableDeclarationContext) => enter_variable_declaration, exit_variable_declaration;
    VariableDeclarator(VariableDeclaratorContext) => enter_variable_declarator, exit_variable_declarator;
    ConstantDeclaration(ConstantDeclarationContext) => enter_constant_declaration, exit_constant_declaration;
    ConstantDeclarator(ConstantDeclaratorContext) => enter_constant_declarator, exit_constant_declarator;
    AssertStatement(AssertStatementContext) => enter_assert_statement, exit_assert_statement;
    BreakStatement(BreakStatementContext) => enter_break_statement, exit_break_statement;
    ContinueStatement(ContinueStatementContext) => enter_continue_statement, exit_continue_statement;
    ReturnStatement(ReturnStatementContext) => enter_return_statement, exit_return_statement;
    ThrowStatement(ThrowStatementContext) => enter_throw_statement, exit_throw_statement;
    CompoundStatement(CompoundStatementContext) => enter_compound_statement, exit_compound_statement;
    IfStatement(IfStatementContext) => enter_if_statement, exit_if_statement;
    IfClause(IfClauseContext) => enter_if_clause, exit_if_clause;
    ElseIfClause(ElseIfClauseContext) => enter_else_if_clause, exit_else_if_clause;
    ElseClause(ElseClauseContext) => enter_else_clause, exit_else_clause;
    IterativeStatement(IterativeStatementContext) => enter_iterative_statement, exit_iterative_statement;
    LabelClause(LabelClauseContext) => enter_label_clause, exit_label_clause;
    WhileStatement(WhileStatementContext) => enter_while_statement, exit_while_statement;
    ForStatement(ForStatementContext) => enter_for_statement, exit_for_statement;
    TryStatement(TryStatementContext) => enter_try_statement, exit_try_statement;
    TryClause(TryClauseContext) => enter_try_clause, exit_try_clause;
    CatchClause(CatchClauseContext) => enter_catch_clause, exit_catch_clause;
    CatchFilter(CatchFilterContext) => enter_catch_filter, exit_catch_filter;
    FinallyClause(FinallyClauseContext) => enter_finally_clause, exit_finally_clause;
    SynchronizeStatement(SynchronizeStatementContext) => enter_synchronize_statement, exit_synchronize_statement;
    WithStatement(WithStatementContext) => enter_with_statement, exit_with_statement;
    ClassDeclaration(ClassDeclarationContext) => enter_class_declaration, exit_class_declaration;
    ClassExtendsClause(ClassExtendsClauseContext) => enter_class_extends_clause, exit_class_extends_clause;
    ClassSuite(ClassSuiteContext) => enter_class_suite, exit_class_suite;
    ClassMember(ClassMemberContext) => enter_class_member, exit_class_member;
    EnumerationDeclaration(EnumerationDeclarationContext) => enter_enumeration_declaration, exit_enumeration_declaration;
    EnumerationBaseClause(EnumerationBaseClauseContext) => enter_enumeration_base_clause, exit_enumeration_base_clause;
    EnumerationSuite(EnumerationSuiteContext) => enter_enumeration_suite, exit_enumeration_suite;
    Enumerate(EnumerateContext) => enter_enumerate, exit_enumerate;
    AnnotationDeclaration(AnnotationDeclarationContext) => enter_annotation_declaration, exit_annotation_declaration;
    QualifiedName(QualifiedNameContext) => enter_qualified_name, exit_qualified_name;
    Expressions(ExpressionsContext) => enter_expressions, exit_expressions;
    AssignmentExpression(AssignmentExpressionContext) => enter_assignment_expression, exit_assignment_expression;
    ConditionalExpression(ConditionalExpressionContext) => enter_conditional_expression, exit_conditional_expression;
    LogicalOrExpression(BinaryExpressionContext) => enter_logical_or_expression, exit_logical_or_expression;
    LogicalAndExpression(BinaryExpressionContext) => enter_logical_and_expression, exit_logical_and_expression;
    InclusiveOrExpression(BinaryExpressionContext) => enter_inclusive_or_expression, exit_inclusive_or_expression;
    ExclusiveOrExpression(BinaryExpressionContext) => enter_exclusive_or_expression, exit_exclusive_or_expression;
    AndExpression(BinaryExpressionContext) => enter_and_expression, exit_and_expression;
    EqualityExpression(BinaryExpressionContext) => enter_equality_expression, exit_equality_expression;
    RelationalExpression(BinaryExpressionContext) => enter_relational_expression, exit_relational_expression;
    ShiftExpression(BinaryExpressionContext) => enter_shift_expression, exit_shift_expression;
    AdditiveExpression(BinaryExpressionContext) => enter_additive_expression, exit_additive_expression;
    MultiplicativeExpression(BinaryExpressionContext) => enter_multiplicative_expression, exit_multiplicative_expression;
    UnaryExpression(UnaryExpressionContext) => enter_unary_expression, exit_unary_expression;
    PostfixExpression(PostfixExpressionContext) => enter_postfix_expression, exit_postfix_expression;
    Subscript(SubscriptContext) => enter_subscript, exit_subscript;
    FunctionArguments(FunctionArgumentsContext) => enter_function_arguments, exit_function_arguments;
    MemberAccess(MemberAccessContext) => enter_member_access, exit_member_access;
    PrimaryExpression(PrimaryExpressionContext) => enter_primary_expression, exit_primary_expression;
    MapExpression(MapExpressionContext) => enter_map_expression, exit_map_expression;
    MapEntries(MapEntriesContext) => enter_map_entries, exit_map_entries;
    MapEntry(MapEntryContext) => enter_map_entry, exit_map_entry;
    ListExpression(ListExpressionContext) => enter_list_expression, exit_list_expression;
    NewExpression(NewExpressionContext) => enter_new_expression, exit_new_expression;
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub context: Context,
    pub span: Span,
}

impl AstNode {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.context.kind()
    }
}

/// Arena owning every node of one compilation unit.
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<AstNode>,
    file: Arc<str>,
}

impl Ast {
    pub fn new(file: impl Into<Arc<str>>) -> Self {
        Self {
            nodes: Vec::new(),
            file: file.into(),
        }
    }

    /// Move a context into the arena, creating its node.
    pub fn push(&mut self, context: Context, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(AstNode { context, span });
        id
    }

    /// Create a terminal node for a token.
    pub fn push_terminal(&mut self, token: Token) -> NodeId {
        let span = token.span;
        self.push(Context::Terminal(token), span)
    }

    /// Drop every node allocated at or after `mark` (a value of [`Ast::len`]).
    ///
    /// Used to discard the partial subtree of an item that failed to parse.
    pub fn truncate(&mut self, mark: usize) {
        self.nodes.truncate(mark);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn file(&self) -> &Arc<str> {
        &self.file
    }

    /// Access a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &AstNode {
        match self.nodes.get(id.index()) {
            Some(node) => node,
            None => panic!("node {} does not belong to the AST of {}", id, self.file),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn context(&self, id: NodeId) -> &Context {
        &self.node(id).context
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).context.children()
    }

    /// The token of a terminal node.
    pub fn terminal(&self, id: NodeId) -> Option<&Token> {
        match self.context(id) {
            Context::Terminal(token) => Some(token),
            _ => None,
        }
    }

    /// Lexeme of a terminal node, or `""` for rule nodes.
    pub fn text(&self, id: NodeId) -> &str {
        self.terminal(id).map(|t| t.text.as_str()).unwrap_or("")
    }

    /// Dotted text of a `QualifiedName` node.
    pub fn qualified_name(&self, id: NodeId) -> Option<String> {
        match self.context(id) {
            Context::QualifiedName(name) => Some(
                name.identifiers
                    .iter()
                    .map(|part| self.text(*part))
                    .collect::<Vec<_>>()
                    .join("."),
            ),
            _ => None,
        }
    }

    /// Iterate over all nodes with their ids, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &AstNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }
}
