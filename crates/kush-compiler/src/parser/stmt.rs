//! Statement parsing

use super::follow::*;
use super::{decl, expr, ParseError, Parser};
use crate::ast::*;
use crate::token::{TokenKind, TokenSet};

const RIGHT_BRACE: TokenSet = TokenSet::of(&[TokenKind::RightBrace]);
const SEMICOLON: TokenSet = TokenSet::of(&[TokenKind::Semicolon]);
const DECLARATOR_FOLLOW: TokenSet = TokenSet::of(&[TokenKind::Comma, TokenKind::Semicolon]);

/// `{ statement* }`, recovering from errors in individual statements.
pub fn parse_statement_suite(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        p.nested(|p| {
            let start = p.start_span();
            p.expect(TokenKind::LeftBrace)?;
            let statements = p.item_list(STATEMENT_RESUME, RIGHT_BRACE, parse_statement)?;
            p.expect(TokenKind::RightBrace)?;
            Ok(p.finish(start, Context::StatementSuite(StatementSuiteContext { statements })))
        })
    })
}

pub fn parse_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(STATEMENT_FOLLOW, |p| {
        let start = p.start_span();
        let statement = if p.check_set(COMPOUND_STATEMENT_START) {
            parse_compound_statement(p)?
        } else {
            parse_simple_statement(p)?
        };
        Ok(p.finish(start, Context::Statement(StatementContext { statement })))
    })
}

// ============================================================================
// Simple statements
// ============================================================================

pub fn parse_simple_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(STATEMENT_FOLLOW, |p| {
        let start = p.start_span();
        let statement = match p.peek_kind(1) {
            TokenKind::Semicolon => p.finish(start, Context::EmptyStatement(EmptyStatementContext)),
            TokenKind::Var => parse_variable_declaration(p)?,
            TokenKind::Final => parse_constant_declaration(p)?,
            TokenKind::Assert => parse_assert_statement(p)?,
            TokenKind::Break => parse_break_statement(p)?,
            TokenKind::Continue => parse_continue_statement(p)?,
            TokenKind::Return => parse_return_statement(p)?,
            TokenKind::Throw => parse_throw_statement(p)?,
            kind if EXPRESSION_START.contains(kind) => parse_expression_statement(p)?,
            _ => return Err(p.no_viable_alternative("statement", STATEMENT_START)),
        };
        p.expect(TokenKind::Semicolon)?;
        Ok(p.finish(start, Context::SimpleStatement(SimpleStatementContext { statement })))
    })
}

pub fn parse_expression_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        let expression = expr::parse_expression(p)?;
        Ok(p.finish(
            start,
            Context::ExpressionStatement(ExpressionStatementContext { expression }),
        ))
    })
}

pub fn parse_variable_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Var)?;
        let mut variable_declarators = vec![parse_variable_declarator(p)?];
        while p.eat(TokenKind::Comma) {
            variable_declarators.push(parse_variable_declarator(p)?);
        }
        Ok(p.finish(
            start,
            Context::VariableDeclaration(VariableDeclarationContext { variable_declarators }),
        ))
    })
}

pub fn parse_variable_declarator(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(DECLARATOR_FOLLOW, |p| {
        let start = p.start_span();
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        let expression = if p.eat(TokenKind::Equal) {
            Some(expr::parse_expression(p)?)
        } else {
            None
        };
        Ok(p.finish(
            start,
            Context::VariableDeclarator(VariableDeclaratorContext { identifier, expression }),
        ))
    })
}

pub fn parse_constant_declaration(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Final)?;
        let mut constant_declarators = vec![parse_constant_declarator(p)?];
        while p.eat(TokenKind::Comma) {
            constant_declarators.push(parse_constant_declarator(p)?);
        }
        Ok(p.finish(
            start,
            Context::ConstantDeclaration(ConstantDeclarationContext { constant_declarators }),
        ))
    })
}

pub fn parse_constant_declarator(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(DECLARATOR_FOLLOW, |p| {
        let start = p.start_span();
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        p.expect(TokenKind::Equal)?;
        let expression = expr::parse_expression(p)?;
        Ok(p.finish(
            start,
            Context::ConstantDeclarator(ConstantDeclaratorContext { identifier, expression }),
        ))
    })
}

pub fn parse_assert_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Assert)?;
        let condition = expr::parse_expression(p)?;
        let message = if p.eat(TokenKind::Colon) {
            Some(expr::parse_expression(p)?)
        } else {
            None
        };
        Ok(p.finish(
            start,
            Context::AssertStatement(AssertStatementContext { condition, message }),
        ))
    })
}

pub fn parse_break_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Break)?;
        let identifier = optional_label(p);
        Ok(p.finish(start, Context::BreakStatement(BreakStatementContext { identifier })))
    })
}

pub fn parse_continue_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Continue)?;
        let identifier = optional_label(p);
        Ok(p.finish(
            start,
            Context::ContinueStatement(ContinueStatementContext { identifier }),
        ))
    })
}

fn optional_label(p: &mut Parser) -> Option<NodeId> {
    p.check(TokenKind::Identifier).then(|| p.terminal())
}

pub fn parse_return_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Return)?;
        let expression = if p.check_set(EXPRESSION_START) {
            Some(expr::parse_expression(p)?)
        } else {
            None
        };
        Ok(p.finish(start, Context::ReturnStatement(ReturnStatementContext { expression })))
    })
}

pub fn parse_throw_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(SEMICOLON, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Throw)?;
        let expression = expr::parse_expression(p)?;
        Ok(p.finish(start, Context::ThrowStatement(ThrowStatementContext { expression })))
    })
}

// ============================================================================
// Compound statements
// ============================================================================

pub fn parse_compound_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(STATEMENT_FOLLOW, |p| {
        let start = p.start_span();
        let statement = match p.peek_kind(1) {
            TokenKind::If => parse_if_statement(p)?,
            TokenKind::Hash | TokenKind::While | TokenKind::For => parse_iterative_statement(p)?,
            TokenKind::Try => parse_try_statement(p)?,
            TokenKind::Synchronize => parse_synchronize_statement(p)?,
            TokenKind::With => parse_with_statement(p)?,
            TokenKind::Class => decl::parse_class_declaration(p)?,
            TokenKind::Function => decl::parse_function_declaration(p)?,
            TokenKind::Enum => decl::parse_enumeration_declaration(p)?,
            _ => return Err(p.no_viable_alternative("compound statement", COMPOUND_STATEMENT_START)),
        };
        Ok(p.finish(start, Context::CompoundStatement(CompoundStatementContext { statement })))
    })
}

pub fn parse_if_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        let if_clause = parse_if_clause(p)?;
        let mut else_if_clauses = Vec::new();
        while p.check(TokenKind::Else) && p.peek_kind(2) == TokenKind::If {
            else_if_clauses.push(parse_else_if_clause(p)?);
        }
        let else_clause = if p.check(TokenKind::Else) {
            Some(parse_else_clause(p)?)
        } else {
            None
        };
        Ok(p.finish(
            start,
            Context::IfStatement(IfStatementContext {
                if_clause,
                else_if_clauses,
                else_clause,
            }),
        ))
    })
}

/// `'(' expression ')'` shared by the conditional constructs.
fn parenthesized_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.expect(TokenKind::LeftParen)?;
    let expression = expr::parse_expression(p)?;
    p.expect(TokenKind::RightParen)?;
    Ok(expression)
}

pub fn parse_if_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::If)?;
        let expression = parenthesized_expression(p)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::IfClause(IfClauseContext {
                expression,
                statement_suite,
            }),
        ))
    })
}

pub fn parse_else_if_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Else)?;
        p.expect(TokenKind::If)?;
        let expression = parenthesized_expression(p)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::ElseIfClause(ElseIfClauseContext {
                expression,
                statement_suite,
            }),
        ))
    })
}

pub fn parse_else_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Else)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(start, Context::ElseClause(ElseClauseContext { statement_suite })))
    })
}

pub fn parse_iterative_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        let label_clause = if p.check(TokenKind::Hash) {
            Some(parse_label_clause(p)?)
        } else {
            None
        };
        let statement = match p.peek_kind(1) {
            TokenKind::While => parse_while_statement(p)?,
            TokenKind::For => parse_for_statement(p)?,
            _ => {
                return Err(p.no_viable_alternative(
                    "iterative statement",
                    TokenSet::of(&[TokenKind::While, TokenKind::For]),
                ))
            }
        };
        Ok(p.finish(
            start,
            Context::IterativeStatement(IterativeStatementContext {
                label_clause,
                statement,
            }),
        ))
    })
}

pub fn parse_label_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::While, TokenKind::For]), |p| {
        let start = p.start_span();
        p.expect(TokenKind::Hash)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        Ok(p.finish(start, Context::LabelClause(LabelClauseContext { identifier })))
    })
}

pub fn parse_while_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::While)?;
        let expression = parenthesized_expression(p)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::WhileStatement(WhileStatementContext {
                expression,
                statement_suite,
            }),
        ))
    })
}

pub fn parse_for_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::For)?;
        p.expect(TokenKind::LeftParen)?;
        p.expect(TokenKind::Var)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        p.expect(TokenKind::Colon)?;
        let expression = expr::parse_expression(p)?;
        p.expect(TokenKind::RightParen)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::ForStatement(ForStatementContext {
                identifier,
                expression,
                statement_suite,
            }),
        ))
    })
}

pub fn parse_try_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        let try_clause = parse_try_clause(p)?;
        let mut catch_clauses = Vec::new();
        while p.check(TokenKind::Catch) {
            catch_clauses.push(parse_catch_clause(p)?);
        }
        let finally_clause = if p.check(TokenKind::Finally) {
            Some(parse_finally_clause(p)?)
        } else {
            None
        };
        if catch_clauses.is_empty() && finally_clause.is_none() {
            return Err(p
                .unexpected(TokenSet::of(&[TokenKind::Catch, TokenKind::Finally]))
                .with_suggestion("a try statement needs at least one catch or finally clause"));
        }
        Ok(p.finish(
            start,
            Context::TryStatement(TryStatementContext {
                try_clause,
                catch_clauses,
                finally_clause,
            }),
        ))
    })
}

pub fn parse_try_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::Catch, TokenKind::Finally]), |p| {
        let start = p.start_span();
        p.expect(TokenKind::Try)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(start, Context::TryClause(TryClauseContext { statement_suite })))
    })
}

pub fn parse_catch_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Catch)?;
        p.expect(TokenKind::LeftParen)?;
        let catch_filter = parse_catch_filter(p)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        p.expect(TokenKind::RightParen)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::CatchClause(CatchClauseContext {
                catch_filter,
                identifier,
                statement_suite,
            }),
        ))
    })
}

pub fn parse_catch_filter(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::Identifier]), |p| {
        let start = p.start_span();
        let mut qualified_names = vec![decl::parse_qualified_name(p)?];
        while p.eat(TokenKind::Pipe) {
            qualified_names.push(decl::parse_qualified_name(p)?);
        }
        Ok(p.finish(start, Context::CatchFilter(CatchFilterContext { qualified_names })))
    })
}

pub fn parse_finally_clause(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Finally)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(start, Context::FinallyClause(FinallyClauseContext { statement_suite })))
    })
}

pub fn parse_synchronize_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Synchronize)?;
        let expression = parenthesized_expression(p)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::SynchronizeStatement(SynchronizeStatementContext {
                expression,
                statement_suite,
            }),
        ))
    })
}

pub fn parse_with_statement(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(BLOCK_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::With)?;
        p.expect(TokenKind::LeftParen)?;
        let expressions = expr::parse_expressions(p)?;
        p.expect(TokenKind::RightParen)?;
        let statement_suite = parse_statement_suite(p)?;
        Ok(p.finish(
            start,
            Context::WithStatement(WithStatementContext {
                expressions,
                statement_suite,
            }),
        ))
    })
}
