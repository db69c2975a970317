//! Rule contexts: the typed payload of every non-terminal AST node.
//!
//! Every field is a [`NodeId`] into the owning [`Ast`](super::Ast). Fields named
//! `identifier`, `operator`, `literal` and the like point at terminal nodes.
//! Punctuation is not kept. Each context enumerates its non-null children in
//! source order through `children()`.

use super::NodeId;

/// Builder for child lists.
#[derive(Default)]
struct ChildList(Vec<NodeId>);

impl ChildList {
    fn one(mut self, id: NodeId) -> Self {
        self.0.push(id);
        self
    }

    fn opt(mut self, id: Option<NodeId>) -> Self {
        self.0.extend(id);
        self
    }

    fn many(mut self, ids: &[NodeId]) -> Self {
        self.0.extend_from_slice(ids);
        self
    }

    fn done(self) -> Vec<NodeId> {
        self.0
    }
}

// ============================================================================
// Compilation unit
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnitContext {
    pub package_declaration: Option<NodeId>,
    pub import_declarations: Vec<NodeId>,
    pub annotated_component_declarations: Vec<NodeId>,
}

impl CompilationUnitContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .opt(self.package_declaration)
            .many(&self.import_declarations)
            .many(&self.annotated_component_declarations)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDeclarationContext {
    pub qualified_name: NodeId,
}

impl PackageDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.qualified_name]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclarationContext {
    pub qualified_name: NodeId,
    /// `import a.b.*;`
    pub wildcard: bool,
}

impl ImportDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.qualified_name]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedComponentDeclarationContext {
    pub annotations: NodeId,
    pub component_declaration: NodeId,
}

impl AnnotatedComponentDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.annotations, self.component_declaration]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationsContext {
    pub annotations: Vec<NodeId>,
}

impl AnnotationsContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.annotations.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationContext {
    pub qualified_name: NodeId,
    pub attributes: Vec<NodeId>,
}

impl AnnotationContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default().one(self.qualified_name).many(&self.attributes).done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationAttributeContext {
    pub identifier: NodeId,
    pub literal: NodeId,
}

impl AnnotationAttributeContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.identifier, self.literal]
    }
}

/// Wraps exactly one function, class, enumeration or annotation declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDeclarationContext {
    pub declaration: NodeId,
}

impl ComponentDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.declaration]
    }
}

// ============================================================================
// Functions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclarationContext {
    pub identifier: NodeId,
    pub function_parameters: NodeId,
    /// `None` for declarations terminated by `;` (native or abstract).
    pub statement_suite: Option<NodeId>,
}

impl FunctionDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .one(self.identifier)
            .one(self.function_parameters)
            .opt(self.statement_suite)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionParametersContext {
    pub fixed_parameters: Vec<NodeId>,
    /// The identifier after `...`.
    pub variable_parameter: Option<NodeId>,
}

impl FunctionParametersContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .many(&self.fixed_parameters)
            .opt(self.variable_parameter)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDeclarationContext {
    pub function_parameters: NodeId,
    pub statement_suite: NodeId,
}

impl ConstructorDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.function_parameters, self.statement_suite]
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementSuiteContext {
    pub statements: Vec<NodeId>,
}

impl StatementSuiteContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.statements.clone()
    }
}

/// Wraps a simple or compound statement.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementContext {
    pub statement: NodeId,
}

impl StatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.statement]
    }
}

/// A statement terminated by `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleStatementContext {
    pub statement: NodeId,
}

impl SimpleStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.statement]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmptyStatementContext;

impl EmptyStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatementContext {
    pub expression: NodeId,
}

impl ExpressionStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableDeclarationContext {
    pub variable_declarators: Vec<NodeId>,
}

impl VariableDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.variable_declarators.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaratorContext {
    pub identifier: NodeId,
    pub expression: Option<NodeId>,
}

impl VariableDeclaratorContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default().one(self.identifier).opt(self.expression).done()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantDeclarationContext {
    pub constant_declarators: Vec<NodeId>,
}

impl ConstantDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.constant_declarators.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDeclaratorContext {
    pub identifier: NodeId,
    pub expression: NodeId,
}

impl ConstantDeclaratorContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.identifier, self.expression]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertStatementContext {
    pub condition: NodeId,
    pub message: Option<NodeId>,
}

impl AssertStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default().one(self.condition).opt(self.message).done()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakStatementContext {
    pub identifier: Option<NodeId>,
}

impl BreakStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.identifier.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContinueStatementContext {
    pub identifier: Option<NodeId>,
}

impl ContinueStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.identifier.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnStatementContext {
    pub expression: Option<NodeId>,
}

impl ReturnStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.expression.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatementContext {
    pub expression: NodeId,
}

impl ThrowStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression]
    }
}

/// Wraps a block-structured statement or a nested declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundStatementContext {
    pub statement: NodeId,
}

impl CompoundStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.statement]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatementContext {
    pub if_clause: NodeId,
    pub else_if_clauses: Vec<NodeId>,
    pub else_clause: Option<NodeId>,
}

impl IfStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .one(self.if_clause)
            .many(&self.else_if_clauses)
            .opt(self.else_clause)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClauseContext {
    pub expression: NodeId,
    pub statement_suite: NodeId,
}

impl IfClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression, self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIfClauseContext {
    pub expression: NodeId,
    pub statement_suite: NodeId,
}

impl ElseIfClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression, self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseClauseContext {
    pub statement_suite: NodeId,
}

impl ElseClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterativeStatementContext {
    pub label_clause: Option<NodeId>,
    /// A while or for statement.
    pub statement: NodeId,
}

impl IterativeStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default().opt(self.label_clause).one(self.statement).done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelClauseContext {
    pub identifier: NodeId,
}

impl LabelClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.identifier]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatementContext {
    pub expression: NodeId,
    pub statement_suite: NodeId,
}

impl WhileStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression, self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatementContext {
    pub identifier: NodeId,
    pub expression: NodeId,
    pub statement_suite: NodeId,
}

impl ForStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.identifier, self.expression, self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatementContext {
    pub try_clause: NodeId,
    pub catch_clauses: Vec<NodeId>,
    pub finally_clause: Option<NodeId>,
}

impl TryStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .one(self.try_clause)
            .many(&self.catch_clauses)
            .opt(self.finally_clause)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryClauseContext {
    pub statement_suite: NodeId,
}

impl TryClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClauseContext {
    pub catch_filter: NodeId,
    pub identifier: NodeId,
    pub statement_suite: NodeId,
}

impl CatchClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.catch_filter, self.identifier, self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatchFilterContext {
    pub qualified_names: Vec<NodeId>,
}

impl CatchFilterContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.qualified_names.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinallyClauseContext {
    pub statement_suite: NodeId,
}

impl FinallyClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizeStatementContext {
    pub expression: NodeId,
    pub statement_suite: NodeId,
}

impl SynchronizeStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression, self.statement_suite]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithStatementContext {
    pub expressions: NodeId,
    pub statement_suite: NodeId,
}

impl WithStatementContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expressions, self.statement_suite]
    }
}

// ============================================================================
// Classes, enumerations and annotation types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclarationContext {
    pub identifier: NodeId,
    pub class_extends_clause: Option<NodeId>,
    pub class_suite: NodeId,
}

impl ClassDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .one(self.identifier)
            .opt(self.class_extends_clause)
            .one(self.class_suite)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassExtendsClauseContext {
    pub qualified_names: Vec<NodeId>,
}

impl ClassExtendsClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.qualified_names.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassSuiteContext {
    pub class_members: Vec<NodeId>,
}

impl ClassSuiteContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.class_members.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMemberContext {
    pub annotations: NodeId,
    /// Modifier keyword terminals, in source order.
    pub modifiers: Vec<NodeId>,
    pub declaration: NodeId,
}

impl ClassMemberContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .one(self.annotations)
            .many(&self.modifiers)
            .one(self.declaration)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationDeclarationContext {
    pub identifier: NodeId,
    pub enumeration_base_clause: Option<NodeId>,
    pub enumeration_suite: NodeId,
}

impl EnumerationDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default()
            .one(self.identifier)
            .opt(self.enumeration_base_clause)
            .one(self.enumeration_suite)
            .done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationBaseClauseContext {
    pub qualified_name: NodeId,
}

impl EnumerationBaseClauseContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.qualified_name]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumerationSuiteContext {
    pub enumerates: Vec<NodeId>,
}

impl EnumerationSuiteContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.enumerates.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumerateContext {
    pub identifier: NodeId,
    pub function_arguments: Option<NodeId>,
}

impl EnumerateContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default().one(self.identifier).opt(self.function_arguments).done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDeclarationContext {
    pub identifier: NodeId,
    /// Attribute identifier terminals.
    pub attributes: Vec<NodeId>,
}

impl AnnotationDeclarationContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default().one(self.identifier).many(&self.attributes).done()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QualifiedNameContext {
    pub identifiers: Vec<NodeId>,
}

impl QualifiedNameContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.identifiers.clone()
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpressionsContext {
    pub expressions: Vec<NodeId>,
}

impl ExpressionsContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.expressions.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpressionContext {
    pub target: NodeId,
    pub operator: NodeId,
    pub value: NodeId,
}

impl AssignmentExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.target, self.operator, self.value]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpressionContext {
    pub condition: NodeId,
    pub then_expression: NodeId,
    pub else_expression: NodeId,
}

impl ConditionalExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.condition, self.then_expression, self.else_expression]
    }
}

/// Shared by every left-associative binary level.
///
/// `children` alternates operand, operator, operand, ... and always has odd
/// length of at least three.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinaryExpressionContext {
    pub children: Vec<NodeId>,
}

impl BinaryExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.children.clone()
    }

    pub fn operands(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().step_by(2).copied()
    }

    pub fn operators(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().skip(1).step_by(2).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpressionContext {
    pub operator: NodeId,
    pub operand: NodeId,
}

impl UnaryExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.operator, self.operand]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpressionContext {
    pub primary: NodeId,
    /// Subscripts, argument lists, member accesses and `++`/`--` terminals.
    pub postfix_parts: Vec<NodeId>,
}

impl PostfixExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        ChildList::default().one(self.primary).many(&self.postfix_parts).done()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptContext {
    pub expression: NodeId,
}

impl SubscriptContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionArgumentsContext {
    pub expressions: Option<NodeId>,
}

impl FunctionArgumentsContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.expressions.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccessContext {
    pub identifier: NodeId,
}

impl MemberAccessContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.identifier]
    }
}

/// An identifier, literal or `this` terminal, a parenthesized expression, or
/// a map, list or new expression.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryExpressionContext {
    pub expression: NodeId,
}

impl PrimaryExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.expression]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapExpressionContext {
    pub map_entries: Option<NodeId>,
}

impl MapExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.map_entries.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapEntriesContext {
    pub map_entries: Vec<NodeId>,
}

impl MapEntriesContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.map_entries.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntryContext {
    pub key: NodeId,
    pub value: NodeId,
}

impl MapEntryContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.key, self.value]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListExpressionContext {
    pub expressions: Option<NodeId>,
}

impl ListExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        self.expressions.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpressionContext {
    pub qualified_name: NodeId,
    pub function_arguments: NodeId,
}

impl NewExpressionContext {
    pub fn children(&self) -> Vec<NodeId> {
        vec![self.qualified_name, self.function_arguments]
    }
}
