//! Expression parsing
//!
//! Precedence climbs through one function per level. A level only creates a
//! node when it actually sees its operator, so `x` parses to a single
//! `PrimaryExpression` rather than a chain of one-child wrappers.

use super::follow::*;
use super::{decl, ParseError, Parser};
use crate::ast::*;
use crate::token::{TokenKind, TokenSet};

type Operand = fn(&mut Parser) -> Result<NodeId, ParseError>;

/// `expression (',' expression)*`
pub fn parse_expressions(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(EXPRESSION_FOLLOW, |p| {
        let start = p.start_span();
        let mut expressions = vec![parse_expression(p)?];
        while p.eat(TokenKind::Comma) {
            expressions.push(parse_expression(p)?);
        }
        Ok(p.finish(start, Context::Expressions(ExpressionsContext { expressions })))
    })
}

pub fn parse_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(EXPRESSION_FOLLOW, parse_assignment_expression)
}

/// Right-associative: `a = b = c` is `a = (b = c)`.
pub fn parse_assignment_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(EXPRESSION_FOLLOW, |p| {
        let start = p.start_span();
        let target = parse_conditional_expression(p)?;
        if !p.check_set(ASSIGNMENT_OPERATORS) {
            return Ok(target);
        }
        let operator = p.terminal();
        let value = p.nested(parse_assignment_expression)?;
        Ok(p.finish(
            start,
            Context::AssignmentExpression(AssignmentExpressionContext {
                target,
                operator,
                value,
            }),
        ))
    })
}

pub fn parse_conditional_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(EXPRESSION_FOLLOW.union(ASSIGNMENT_OPERATORS), |p| {
        let start = p.start_span();
        let condition = parse_logical_or_expression(p)?;
        if !p.eat(TokenKind::Question) {
            return Ok(condition);
        }
        let then_expression = p.nested(parse_expression)?;
        p.expect(TokenKind::Colon)?;
        let else_expression = p.nested(parse_conditional_expression)?;
        Ok(p.finish(
            start,
            Context::ConditionalExpression(ConditionalExpressionContext {
                condition,
                then_expression,
                else_expression,
            }),
        ))
    })
}

/// Left-associative level: `operand (operator operand)*`, flattened into one
/// node whose children alternate operand and operator.
fn binary(
    p: &mut Parser,
    operators: TokenSet,
    tag: fn(BinaryExpressionContext) -> Context,
    operand: Operand,
) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        let start = p.start_span();
        let first = operand(p)?;
        if !p.check_set(operators) {
            return Ok(first);
        }
        let mut children = vec![first];
        while p.check_set(operators) {
            children.push(p.terminal());
            children.push(operand(p)?);
        }
        Ok(p.finish(start, tag(BinaryExpressionContext { children })))
    })
}

pub fn parse_logical_or_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        TokenSet::of(&[TokenKind::PipePipe]),
        Context::LogicalOrExpression,
        parse_logical_and_expression,
    )
}

pub fn parse_logical_and_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        TokenSet::of(&[TokenKind::AmpAmp]),
        Context::LogicalAndExpression,
        parse_inclusive_or_expression,
    )
}

pub fn parse_inclusive_or_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        TokenSet::of(&[TokenKind::Pipe]),
        Context::InclusiveOrExpression,
        parse_exclusive_or_expression,
    )
}

pub fn parse_exclusive_or_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        TokenSet::of(&[TokenKind::Caret]),
        Context::ExclusiveOrExpression,
        parse_and_expression,
    )
}

pub fn parse_and_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        TokenSet::of(&[TokenKind::Amp]),
        Context::AndExpression,
        parse_equality_expression,
    )
}

pub fn parse_equality_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        EQUALITY_OPERATORS,
        Context::EqualityExpression,
        parse_relational_expression,
    )
}

pub fn parse_relational_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        RELATIONAL_OPERATORS,
        Context::RelationalExpression,
        parse_shift_expression,
    )
}

pub fn parse_shift_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        SHIFT_OPERATORS,
        Context::ShiftExpression,
        parse_additive_expression,
    )
}

pub fn parse_additive_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        ADDITIVE_OPERATORS,
        Context::AdditiveExpression,
        parse_multiplicative_expression,
    )
}

pub fn parse_multiplicative_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    binary(
        p,
        MULTIPLICATIVE_OPERATORS,
        Context::MultiplicativeExpression,
        parse_unary_expression,
    )
}

pub fn parse_unary_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        if !p.check_set(UNARY_OPERATORS) {
            return parse_postfix_expression(p);
        }
        let start = p.start_span();
        let operator = p.terminal();
        let operand = p.nested(parse_unary_expression)?;
        Ok(p.finish(
            start,
            Context::UnaryExpression(UnaryExpressionContext { operator, operand }),
        ))
    })
}

pub fn parse_postfix_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        let start = p.start_span();
        let primary = parse_primary_expression(p)?;
        let mut postfix_parts = Vec::new();
        loop {
            let kind = p.current().kind;
            let part = match kind {
                TokenKind::LeftBracket => parse_subscript(p)?,
                TokenKind::LeftParen => parse_function_arguments(p)?,
                TokenKind::Dot => parse_member_access(p)?,
                TokenKind::PlusPlus | TokenKind::MinusMinus => p.terminal(),
                _ => break,
            };
            postfix_parts.push(part);
        }
        if postfix_parts.is_empty() {
            return Ok(primary);
        }
        Ok(p.finish(
            start,
            Context::PostfixExpression(PostfixExpressionContext {
                primary,
                postfix_parts,
            }),
        ))
    })
}

pub fn parse_subscript(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        p.nested(|p| {
            let start = p.start_span();
            p.expect(TokenKind::LeftBracket)?;
            let expression = parse_expression(p)?;
            p.expect(TokenKind::RightBracket)?;
            Ok(p.finish(start, Context::Subscript(SubscriptContext { expression })))
        })
    })
}

/// `'(' expressions? ')'`
pub fn parse_function_arguments(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        p.nested(|p| {
            let start = p.start_span();
            p.expect(TokenKind::LeftParen)?;
            let expressions = if p.check_set(EXPRESSION_START) {
                Some(parse_expressions(p)?)
            } else {
                None
            };
            p.expect(TokenKind::RightParen)?;
            Ok(p.finish(
                start,
                Context::FunctionArguments(FunctionArgumentsContext { expressions }),
            ))
        })
    })
}

pub fn parse_member_access(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::Dot)?;
        let identifier = p.expect_terminal(TokenKind::Identifier)?;
        Ok(p.finish(start, Context::MemberAccess(MemberAccessContext { identifier })))
    })
}

pub fn parse_primary_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        let start = p.start_span();
        let kind = p.current().kind;
        let expression = match kind {
            TokenKind::Identifier | TokenKind::This => p.terminal(),
            kind if LITERALS.contains(kind) => p.terminal(),
            TokenKind::LeftParen => p.nested(|p| {
                p.advance();
                let inner = parse_expression(p)?;
                p.expect(TokenKind::RightParen)?;
                Ok(inner)
            })?,
            TokenKind::LeftBrace => parse_map_expression(p)?,
            TokenKind::LeftBracket => parse_list_expression(p)?,
            TokenKind::New => parse_new_expression(p)?,
            _ => return Err(p.no_viable_alternative("expression", EXPRESSION_START)),
        };
        Ok(p.finish(
            start,
            Context::PrimaryExpression(PrimaryExpressionContext { expression }),
        ))
    })
}

/// `'{' mapEntries? '}'`
pub fn parse_map_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        p.nested(|p| {
            let start = p.start_span();
            p.expect(TokenKind::LeftBrace)?;
            let map_entries = if p.check(TokenKind::RightBrace) {
                None
            } else {
                Some(parse_map_entries(p)?)
            };
            p.expect(TokenKind::RightBrace)?;
            Ok(p.finish(start, Context::MapExpression(MapExpressionContext { map_entries })))
        })
    })
}

pub fn parse_map_entries(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::RightBrace]), |p| {
        let start = p.start_span();
        let mut map_entries = vec![parse_map_entry(p)?];
        while p.eat(TokenKind::Comma) {
            map_entries.push(parse_map_entry(p)?);
        }
        Ok(p.finish(start, Context::MapEntries(MapEntriesContext { map_entries })))
    })
}

pub fn parse_map_entry(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(TokenSet::of(&[TokenKind::Comma, TokenKind::RightBrace]), |p| {
        let start = p.start_span();
        let key = parse_expression(p)?;
        p.expect(TokenKind::Colon)?;
        let value = parse_expression(p)?;
        Ok(p.finish(start, Context::MapEntry(MapEntryContext { key, value })))
    })
}

/// `'[' expressions? ']'`
pub fn parse_list_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        p.nested(|p| {
            let start = p.start_span();
            p.expect(TokenKind::LeftBracket)?;
            let expressions = if p.check(TokenKind::RightBracket) {
                None
            } else {
                Some(parse_expressions(p)?)
            };
            p.expect(TokenKind::RightBracket)?;
            Ok(p.finish(start, Context::ListExpression(ListExpressionContext { expressions })))
        })
    })
}

pub fn parse_new_expression(p: &mut Parser) -> Result<NodeId, ParseError> {
    p.rule(OPERAND_FOLLOW, |p| {
        let start = p.start_span();
        p.expect(TokenKind::New)?;
        let qualified_name = decl::parse_qualified_name(p)?;
        let function_arguments = parse_function_arguments(p)?;
        Ok(p.finish(
            start,
            Context::NewExpression(NewExpressionContext {
                qualified_name,
                function_arguments,
            }),
        ))
    })
}
