//! FIRST and follow sets used for prediction and error recovery.

use crate::token::{TokenKind as K, TokenSet};

pub const LITERALS: TokenSet = TokenSet::of(&[
    K::Integer,
    K::FloatingPoint,
    K::String,
    K::True,
    K::False,
    K::Null,
]);

pub const MODIFIERS: TokenSet = TokenSet::of(&[
    K::Public,
    K::Private,
    K::Secret,
    K::Static,
    K::Native,
    K::Abstract,
]);

pub const ASSIGNMENT_OPERATORS: TokenSet = TokenSet::of(&[
    K::Equal,
    K::PlusEqual,
    K::MinusEqual,
    K::StarEqual,
    K::SlashEqual,
    K::PercentEqual,
    K::AmpEqual,
    K::PipeEqual,
    K::CaretEqual,
    K::LessLessEqual,
    K::GreaterGreaterEqual,
    K::GreaterGreaterGreaterEqual,
]);

pub const EQUALITY_OPERATORS: TokenSet = TokenSet::of(&[K::EqualEqual, K::BangEqual]);

pub const RELATIONAL_OPERATORS: TokenSet =
    TokenSet::of(&[K::Less, K::Greater, K::LessEqual, K::GreaterEqual, K::Is]);

pub const SHIFT_OPERATORS: TokenSet =
    TokenSet::of(&[K::LessLess, K::GreaterGreater, K::GreaterGreaterGreater]);

pub const ADDITIVE_OPERATORS: TokenSet = TokenSet::of(&[K::Plus, K::Minus]);

pub const MULTIPLICATIVE_OPERATORS: TokenSet = TokenSet::of(&[K::Star, K::Slash, K::Percent]);

pub const UNARY_OPERATORS: TokenSet = TokenSet::of(&[
    K::Plus,
    K::Minus,
    K::Tilde,
    K::Bang,
    K::PlusPlus,
    K::MinusMinus,
]);

pub const POSTFIX_START: TokenSet = TokenSet::of(&[
    K::LeftBracket,
    K::LeftParen,
    K::Dot,
    K::PlusPlus,
    K::MinusMinus,
]);

/// FIRST(primaryExpression)
pub const PRIMARY_START: TokenSet = LITERALS.union(TokenSet::of(&[
    K::Identifier,
    K::This,
    K::LeftParen,
    K::LeftBrace,
    K::LeftBracket,
    K::New,
]));

/// FIRST(expression)
pub const EXPRESSION_START: TokenSet = PRIMARY_START.union(UNARY_OPERATORS);

/// FIRST(compoundStatement)
pub const COMPOUND_STATEMENT_START: TokenSet = TokenSet::of(&[
    K::If,
    K::Hash,
    K::While,
    K::For,
    K::Try,
    K::Synchronize,
    K::With,
    K::Class,
    K::Function,
    K::Enum,
]);

/// FIRST(statement), including the empty statement.
pub const STATEMENT_START: TokenSet = COMPOUND_STATEMENT_START
    .union(EXPRESSION_START)
    .union(TokenSet::of(&[
        K::Semicolon,
        K::Var,
        K::Final,
        K::Assert,
        K::Break,
        K::Continue,
        K::Return,
        K::Throw,
    ]));

/// Where statement-level recovery may resume. A `{` there is more likely the
/// body of the broken statement than a map literal.
pub const STATEMENT_RESUME: TokenSet = STATEMENT_START.without(K::LeftBrace);

/// FIRST(annotatedComponentDeclaration)
pub const COMPONENT_START: TokenSet =
    TokenSet::of(&[K::At, K::Function, K::Class, K::Enum, K::Annotation]);

/// FIRST(classMember)
pub const CLASS_MEMBER_START: TokenSet = MODIFIERS.union(TokenSet::of(&[
    K::At,
    K::Var,
    K::Final,
    K::Function,
    K::New,
    K::Class,
    K::Enum,
]));

// Follow sets pushed by the rule functions.

pub const COMPILATION_UNIT_FOLLOW: TokenSet = TokenSet::of(&[K::EndOfStream]);

/// After a package, import or top-level component.
pub const TOP_LEVEL_FOLLOW: TokenSet = COMPONENT_START
    .union(TokenSet::of(&[K::Import, K::EndOfStream]));

pub const CLASS_MEMBER_FOLLOW: TokenSet = CLASS_MEMBER_START.with(K::RightBrace);

pub const STATEMENT_FOLLOW: TokenSet = STATEMENT_START.with(K::RightBrace);

/// After any block-bodied construct: whatever may follow a statement, a
/// member or a component.
pub const BLOCK_FOLLOW: TokenSet = STATEMENT_FOLLOW
    .union(CLASS_MEMBER_FOLLOW)
    .union(TOP_LEVEL_FOLLOW)
    .union(TokenSet::of(&[K::Else, K::Catch, K::Finally]));

pub const EXPRESSION_FOLLOW: TokenSet = TokenSet::of(&[
    K::Semicolon,
    K::Comma,
    K::Colon,
    K::RightParen,
    K::RightBracket,
    K::RightBrace,
]);

/// After an operand inside a binary expression.
pub const OPERAND_FOLLOW: TokenSet = EXPRESSION_FOLLOW
    .union(ASSIGNMENT_OPERATORS)
    .union(EQUALITY_OPERATORS)
    .union(RELATIONAL_OPERATORS)
    .union(SHIFT_OPERATORS)
    .union(ADDITIVE_OPERATORS)
    .union(MULTIPLICATIVE_OPERATORS)
    .union(POSTFIX_START)
    .union(TokenSet::of(&[
        K::Question,
        K::PipePipe,
        K::AmpAmp,
        K::Pipe,
        K::Caret,
        K::Amp,
    ]));

pub const QUALIFIED_NAME_FOLLOW: TokenSet = TokenSet::of(&[
    K::Semicolon,
    K::Dot,
    K::Comma,
    K::Pipe,
    K::Identifier,
    K::LeftParen,
    K::RightParen,
    K::LeftBrace,
    K::At,
])
.union(COMPONENT_START)
.union(CLASS_MEMBER_START);

pub const PARAMETERS_FOLLOW: TokenSet = TokenSet::of(&[K::LeftBrace, K::Semicolon]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_start_covers_expressions() {
        assert!(STATEMENT_START.contains(K::Identifier));
        assert!(STATEMENT_START.contains(K::Semicolon));
        assert!(STATEMENT_START.contains(K::Hash));
        assert!(!STATEMENT_START.contains(K::RightBrace));
        assert!(!STATEMENT_START.contains(K::Else));
        assert!(STATEMENT_START.contains(K::LeftBrace));
        assert!(!STATEMENT_RESUME.contains(K::LeftBrace));
    }

    #[test]
    fn test_member_and_component_starts() {
        assert!(CLASS_MEMBER_START.contains(K::Secret));
        assert!(CLASS_MEMBER_START.contains(K::New));
        assert!(!CLASS_MEMBER_START.contains(K::Annotation));
        assert!(COMPONENT_START.contains(K::Annotation));
    }
}
