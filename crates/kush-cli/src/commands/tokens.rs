//! `kush tokens`: dump the token stream.

use std::path::Path;

use kush_compiler::{CompileError, Lexer, Token};
use termcolor::WriteColor;

use crate::output::StyledOutput;

pub fn execute<W: WriteColor>(file: &Path, out: &mut StyledOutput<W>) -> anyhow::Result<usize> {
    let (name, source) = super::read_source(file)?;
    let lexed = Lexer::new(&source, name.as_str()).tokenize();

    for token in lexed.tokens.tokens() {
        print_token(token, out);
    }

    let errors: Vec<CompileError> = lexed.errors.into_iter().map(CompileError::from).collect();
    super::report(&name, &source, &errors, out)
}

fn print_token<W: WriteColor>(token: &Token, out: &mut StyledOutput<W>) {
    out.dim(&format!("{:>4}:{:<4}", token.line(), token.column()));
    out.plain(" ");
    out.info(&format!("{:<20}", format!("{:?}", token.kind)));
    if !token.text.is_empty() {
        out.plain(" ");
        out.plain(&token.text);
    }
    out.newline();
}
