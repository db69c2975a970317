//! Panic-mode error recovery.
//!
//! After an error the parser discards tokens until it reaches one from which
//! parsing can continue. The decision is a pure function of the token slice,
//! the position, the sets supplied by the recovery point and the follow sets
//! of the enclosing rules.

use crate::token::{Token, TokenKind, TokenSet};

/// Where to continue after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resync {
    /// Parse another item of the current list starting at this position.
    Resume(usize),
    /// End the current list at this position; the token belongs to the list
    /// terminator or to an enclosing rule.
    Stop(usize),
}

impl Resync {
    pub fn position(self) -> usize {
        match self {
            Resync::Resume(pos) | Resync::Stop(pos) => pos,
        }
    }
}

/// Compute the resynchronization point starting at `position`.
///
/// * a token in `resume` resumes the item loop there;
/// * a token in `terminators`, in any of `follow_stack`, or the end of the
///   stream stops the loop there;
/// * a `;` that cannot start an item is consumed and the loop resumes after it;
/// * a `{` that cannot start an item opens a block that is skipped up to its
///   matching `}`;
/// * anything else is skipped.
pub fn synchronize(
    tokens: &[Token],
    position: usize,
    resume: TokenSet,
    terminators: TokenSet,
    follow_stack: &[TokenSet],
) -> Resync {
    let stop = follow_stack
        .iter()
        .fold(terminators, |acc, follow| acc.union(*follow));

    let mut pos = position;
    while let Some(token) = tokens.get(pos) {
        let kind = token.kind;
        if kind == TokenKind::EndOfStream {
            return Resync::Stop(pos);
        }
        if resume.contains(kind) {
            return Resync::Resume(pos);
        }
        if kind == TokenKind::Semicolon {
            return Resync::Resume(pos + 1);
        }
        if kind == TokenKind::LeftBrace {
            pos = skip_block(tokens, pos);
            continue;
        }
        if stop.contains(kind) {
            return Resync::Stop(pos);
        }
        pos += 1;
    }

    Resync::Stop(tokens.len().saturating_sub(1))
}

/// Position just past the `}` matching the `{` at `open`, or of the end of
/// the stream when the block is never closed.
fn skip_block(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (pos, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LeftBrace => depth += 1,
            TokenKind::RightBrace => {
                depth -= 1;
                if depth == 0 {
                    return pos + 1;
                }
            }
            TokenKind::EndOfStream => return pos,
            _ => {}
        }
    }
    tokens.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::follow::{STATEMENT_RESUME, STATEMENT_START};

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source, "test.kush").tokenize().tokens.into_tokens()
    }

    const BRACE: TokenSet = TokenSet::of(&[TokenKind::RightBrace]);

    #[test]
    fn test_resume_at_statement_start() {
        // ") ) var x;" : skip the parens, resume at var
        let toks = tokens(") ) var x;");
        assert_eq!(synchronize(&toks, 0, STATEMENT_START, BRACE, &[]), Resync::Resume(2));
    }

    #[test]
    fn test_stop_at_terminator() {
        let toks = tokens(") }");
        assert_eq!(synchronize(&toks, 0, STATEMENT_START, BRACE, &[]), Resync::Stop(1));
    }

    #[test]
    fn test_semicolon_consumed_when_not_resumable() {
        let toks = tokens(") ; public");
        let resume = TokenSet::of(&[TokenKind::Public]);
        assert_eq!(synchronize(&toks, 0, resume, BRACE, &[]), Resync::Resume(2));
    }

    #[test]
    fn test_follow_stack_stops_scan() {
        let toks = tokens(") else");
        let outer = TokenSet::of(&[TokenKind::Else]);
        assert_eq!(synchronize(&toks, 0, STATEMENT_START, BRACE, &[outer]), Resync::Stop(1));
    }

    #[test]
    fn test_block_skipped_whole() {
        // "{ a; { b; } } c" : the inner ';' and '}' do not end the skip
        let toks = tokens("{ a; { b; } } c");
        assert_eq!(synchronize(&toks, 0, STATEMENT_RESUME, BRACE, &[]), Resync::Resume(8));
    }

    #[test]
    fn test_unclosed_block_runs_to_end() {
        let toks = tokens(") { a;");
        assert_eq!(synchronize(&toks, 0, STATEMENT_RESUME, BRACE, &[]), Resync::Stop(4));
    }

    #[test]
    fn test_end_of_stream_stops() {
        let toks = tokens(")");
        assert_eq!(synchronize(&toks, 0, STATEMENT_START, BRACE, &[]), Resync::Stop(1));
        assert_eq!(synchronize(&toks, 5, STATEMENT_START, BRACE, &[]), Resync::Stop(1));
    }
}
