//! Declaration parsing: compilation unit, imports, annotations, functions,
//! classes, enumerations and annotation types.

use super::follow::*;
use super::{expr, stmt, ParseError, Parser, Recovered};
use crate::ast::*;
use crate::component::{MainComponent, MainComponentDetector};
use crate::token::{TokenKind, TokenSet};

/// Tokens at which the top-level loop resumes after an error.
const TOP_LEVEL_RESUME: TokenSet = COMPONENT_START.union(TokenSet::of(&[TokenKind::Import, TokenKind::Package]));

/// Parse a whole compilation unit. Never fails; errors are recorded on the
/// parser.
pub fn parse_compilation_unit(p: &mut Parser) -> (NodeId, MainComponent) {
    let start = p.start_span();
    p.follow.push(COMPILATION_UNIT_FOLLOW);

    let mut detector = MainComponentDetector::new(p.main_function(), p.file());
    let mut context = CompilationUnitContext::default();

    while !p.at_end() {
        let item_start = p.tokens.index();
        let mark = p.ast.len();

        let result = if p.check(TokenKind::Package)
            && context.package_declaration.is_none()
            && context.import_declarations.is_empty()
            && context.annotated_component_declarations.is_empty()
        {
            parse_package_declaration(p).map(|node| context.package_declaration = Some(node))
        } else if p.check(TokenKind::Import) && context.annotated_component_declarations.is_empty() {
            parse_import_declaration(p).map(|node| context.import_declarations.push(node))
        } else {
            parse_annotated_component_declaration(p).map(|node| {
                observe_component(p.ast(), node, &mut detector);
                context.annotated_component_declarations.push(node);
            })
        };

        if let Err(error) = result {
            match p.recover(error, item_start, mark, TOP_LEVEL_RESUME, COMPILATION_UNIT_FOLLOW) {
                Ok(Recovered::Continue) => {}
                Ok(Recovered::Break) => break,
                Err(fatal) => {
                    tracing::debug!(error = %fatal, "parsing stopped");
                    p.errors.push(fatal);
                    break;
                }
            }
        }
    }

    p.follow.pop();
    let root = p.finish(start, Context::CompilationUnit(context));
    (root, detector.finish())
}

/// Feed a top-level function or class to the main component detector.
fn observe_component(ast: &Ast, node: NodeId, detector: &mut MainComponentDetector) {
    let Context::AnnotatedComponentDeclaration(annotated) = ast.context(node) else {
        return;
    };
    let Context::ComponentDeclaration(component) = ast.context(annotated.component_declaration) else {
        return;
    };
    match ast.context(component.declaration) {
        Context::FunctionDeclaration(function) => {
            detector.function(ast.text(function.identifier), component.declaration)
        }
        Context::ClassDeclaration(class) => {
            detector.class(ast.text(class.identifier), component.declaration)
        }
        _ => {}
    }
}

pub fn parse_package_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TOP_LEVEL_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Package)?;
        let qualified_name = parse_qualified_name(p)?;
        p.expect(TokenKind::Semicolon)?;
        Ok(p.finish(
            start,
            Context::PackageDeclaration(PackageDeclarationContext { qualified_name }),
        ))
    })
}

pub fn parse_import_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TOP_LEVEL_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Import)?;
        let qualified_name = parse_qualified_name(p)?;
        let wildcard = if p.eat(TokenKind::Dot) {
            p.expect(TokenKind::Star)?;
            true
        } else {
            false
        };
        p.expect(TokenKind::Semicolon)?;
        Ok(p.finish(
            start,
            Context::ImportDeclaration(ImportDeclarationContext {
                qualified_name,
                wildcard,
            }),
        ))
    })
}

pub fn parse_annotated_component_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TOP_LEVEL_FOLLOW, |p| {
        let start = p.start_span();
        let annotations = parse_annotations(p)?;
        let component_declaration = parse_component_declaration(p)?;
        Ok(p.finish(
            start,
            Context::AnnotatedComponentDeclaration(AnnotatedComponentDeclarationContext {
                annotations,
                component_declaration,
            }),
        ))
    })
}

pub fn parse_component_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TOP_LEVEL_FOLLOW, |p| {
        let start = p.start_span();
        let declaration = match p.peek_kind(1) {
            TokenKind::Function => parse_function_declaration(p)?,
            TokenKind::Class => parse_class_declaration(p)?,
            TokenKind::Enum => parse_enumeration_declaration(p)?,
            TokenKind::Annotation => parse_annotation_declaration(p)?,
            _ => {
                return Err(p
                    .no_viable_alternative("component declaration", COMPONENT_START.without(TokenKind::At)))
            }
        };
        Ok(p.finish(
            start,
            Context::ComponentDeclaration(ComponentDeclarationContext { declaration }),
        ))
    })
}

// ============================================================================
// Annotations
// ============================================================================

/// Zero or more annotations. Always produces a node.
pub fn parse_annotations(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(COMPONENT_START.union(CLASS_MEMBER_START), |p| {
        let start = p.start_span();
        let mut annotations = Vec::new();
        while p.check(TokenKind::At) {
            annotations.push(parse_annotation(p)?);
        }
        Ok(p.finish(start, Context::Annotations(AnnotationsContext { annotations })))
    })
}

pub fn parse_annotation(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(COMPONENT_START.union(CLASS_MEMBER_START), |p| {
        let start = p.start_span();
        p.expect(TokenKind::At)?;
        let qualified_name = parse_qualified_name(p)?;
        let mut attributes = Vec::new();
        if p.eat(TokenKind::LeftParen) {
            attributes.push(parse_annotation_attribute(p)?);
            while p.eat(TokenKind::Comma) {
                attributes.push(parse_annotation_attribute(p)?);
            }
            p.expect(TokenKind::RightParen)?;
        }
        Ok(p.finish(
            start,
            Context::Annotation(AnnotationContext {
                qualified_name,
                attributes,
            }),
        ))
    })
}

pub fn parse_annotation_attribute(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::Comma, TokenKind::RightParen]), |p| {
        let start = p.start_span();
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        p.expect(TokenKind::Equal)?;
        if !p.check_set(LITERALS) {
            return Err(p.unexpected(LITERALS));
        }
        let literal = p.terminal();
        Ok(p.finish(
            start,
            Context::AnnotationAttribute(AnnotationAttributeContext { identifier, literal }),
        ))
    })
}

// ============================================================================
// Functions
// ============================================================================

pub fn parse_function_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Function)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        let function_parameters = parse_function_parameters(p)?;
        let statement_suite = match p.peek_kind(1) {
            TokenKind::Semicolon => {
                p.advance();
                None
            }
            TokenKind::LeftBrace => Some(stmt::parse_statement_suite(p)?),
            _ => return Err(p.unexpected(PARAMETERS_FOLLOW)),
        };
        Ok(p.finish(
            start,
            Context::FunctionDeclaration(FunctionDeclarationContext {
                identifier,
                function_parameters,
                statement_suite,
            }),
        ))
    })
}

pub fn parse_function_parameters(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(PARAMETERS_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::LeftParen)?;
        let mut context = FunctionParametersContext::default();
        if !p.check(TokenKind::RightParen) {
            loop {
                if p.eat(TokenKind::Ellipsis) {
                    context.variable_parameter = Some(p.expect_terminal(TokenKind::Identifier)?);
                    break;
                }
                context.fixed_parameters.push(p.expect_terminal(TokenKind::Identifier)?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        p.expect(TokenKind::RightParen)?;
        Ok(p.finish(start, Context::FunctionParameters(context)))
    })
}

pub fn parse_constructor_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::New)?;
        let function_parameters = parse_function_parameters(p)?;
        let statement_suite = stmt::parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::ConstructorDeclaration(ConstructorDeclarationContext {
                function_parameters,
                statement_suite,
            }),
        ))
    })
}

// ============================================================================
// Classes
// ============================================================================

pub fn parse_class_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Class)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        let class_extends_clause = if p.check(TokenKind::Extends) {
            Some(parse_class_extends_clause(p)?)
        } else {
            None
        };
        let class_suite = parse_class_suite(p)?;
        Ok(p.finish(
            start,
            Context::ClassDeclaration(ClassDeclarationContext {
                identifier,
                class_extends_clause,
                class_suite,
            }),
        ))
    })
}

pub fn parse_class_extends_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::LeftBrace]), |p| {
        let start = p.start_span();
        p.expect(TokenKind::Extends)?;
        let mut qualified_names = vec![parse_qualified_name(p)?];
        while p.eat(TokenKind::Comma) {
            qualified_names.push(parse_qualified_name(p)?);
        }
        Ok(p.finish(
            start,
            Context::ClassExtendsClause(ClassExtendsClauseContext { qualified_names }),
        ))
    })
}

/// `{ classMember* }`, recovering from errors in individual members.
pub fn parse_class_suite(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        p.nested(|p| {
            let start = p.start_span();
            p.expect(TokenKind::LeftBrace)?;
            let class_members = p.item_list(
                CLASS_MEMBER_START,
                TokenSet::of(&[TokenKind::RightBrace]),
                parse_class_member,
            )?;
            p.expect(TokenKind::RightBrace)?;
            Ok(p.finish(start, Context::ClassSuite(ClassSuiteContext { class_members })))
        })
    })
}

pub fn parse_class_member(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(CLASS_MEMBER_FOLLOW, |p| {
        let start = p.start_span();
        let annotations = parse_annotations(p)?;
        let mut modifiers = Vec::new();
        while p.check_set(MODIFIERS) {
            modifiers.push(p.terminal());
        }
        let declaration = match p.peek_kind(1) {
            TokenKind::Var => {
                let declaration = stmt::parse_variable_declaration(p)?;
                p.expect(TokenKind::Semicolon)?;
                declaration
            }
            TokenKind::Final => {
                let declaration = stmt::parse_constant_declaration(p)?;
                p.expect(TokenKind::Semicolon)?;
                declaration
            }
            TokenKind::Function => parse_function_declaration(p)?,
            TokenKind::New => parse_constructor_declaration(p)?,
            TokenKind::Class => parse_class_declaration(p)?,
            TokenKind::Enum => parse_enumeration_declaration(p)?,
            _ => {
                let expected = TokenSet::of(&[
                    TokenKind::Var,
                    TokenKind::Final,
                    TokenKind::Function,
                    TokenKind::New,
                    TokenKind::Class,
                    TokenKind::Enum,
                ]);
                return Err(p.no_viable_alternative("class member", expected));
            }
        };
        Ok(p.finish(
            start,
            Context::ClassMember(ClassMemberContext {
                annotations,
                modifiers,
                declaration,
            }),
        ))
    })
}

// ============================================================================
// Enumerations
// ============================================================================

pub fn parse_enumeration_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Enum)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        let enumeration_base_clause = if p.check(TokenKind::Colon) {
            Some(parse_enumeration_base_clause(p)?)
        } else {
            None
        };
        let enumeration_suite = parse_enumeration_suite(p)?;
        Ok(p.finish(
            start,
            Context::EnumerationDeclaration(EnumerationDeclarationContext {
                identifier,
                enumeration_base_clause,
                enumeration_suite,
            }),
        ))
    })
}

pub fn parse_enumeration_base_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::LeftBrace]), |p| {
        let start = p.start_span();
        p.expect(TokenKind::Colon)?;
        let qualified_name = parse_qualified_name(p)?;
        Ok(p.finish(
            start,
            Context::EnumerationBaseClause(EnumerationBaseClauseContext { qualified_name }),
        ))
    })
}

pub fn parse_enumeration_suite(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        p.nested(|p| {
            let start = p.start_span();
            p.expect(TokenKind::LeftBrace)?;
            let mut enumerates = vec![parse_enumerate(p)?];
            while p.eat(TokenKind::Comma) {
                // trailing comma
                if p.check(TokenKind::RightBrace) {
                    break;
                }
                enumerates.push(parse_enumerate(p)?);
            }
            p.expect(TokenKind::RightBrace)?;
            Ok(p.finish(
                start,
                Context::EnumerationSuite(EnumerationSuiteContext { enumerates }),
            ))
        })
    })
}

pub fn parse_enumerate(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::Comma, TokenKind::RightBrace]), |p| {
        let start = p.start_span();
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        let function_arguments = if p.check(TokenKind::LeftParen) {
            Some(expr::parse_function_arguments(p)?)
        } else {
            None
        };
        Ok(p.finish(
            start,
            Context::Enumerate(EnumerateContext {
                identifier,
                function_arguments,
            }),
        ))
    })
}

// ============================================================================
// Annotation types
// ============================================================================

pub fn parse_annotation_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TOP_LEVEL_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Annotation)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        p.expect(TokenKind::LeftBrace)?;
        let mut attributes = Vec::new();
        while p.check(TokenKind::Identifier) {
            attributes.push(p.terminal());
            p.expect(TokenKind::Semicolon)?;
        }
        p.expect(TokenKind::RightBrace)?;
        Ok(p.finish(
            start,
            Context::AnnotationDeclaration(AnnotationDeclarationContext {
                identifier,
                attributes,
            }),
        ))
    })
}

/// `IDENTIFIER ('.' IDENTIFIER)*`. A dot not followed by an identifier is
/// left for the caller (`import a.b.*`).
pub fn parse_qualified_name(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(QUALIFIED_NAME_FOLLOW, |p| {
        let start = p.start_span();
        let mut identifiers = vec![p.expect_terminal(TokenKind::Identifier)?];
        while p.check(TokenKind::Dot) && p.peek_kind(2) == TokenKind::Identifier {
            p.advance();
            identifiers.push(p.expect_terminal(TokenKind::Identifier)?);
        }
        Ok(p.finish(start, Context::QualifiedName(QualifiedNameContext { identifiers })))
    })
}
