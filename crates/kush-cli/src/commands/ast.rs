//! `kush ast`: print the syntax tree as an indented outline.

use std::path::Path;

use kush_compiler::ast::{AstListener, AstWalker, NodeId};
use kush_compiler::{CompileError, FrontendConfig, Lexer, Parser, Token};
use termcolor::WriteColor;

use crate::output::StyledOutput;

/// Prints one line per node while walking the tree.
struct AstPrinter<'o, W> {
    out: &'o mut StyledOutput<W>,
    depth: usize,
}

impl<W: WriteColor> AstListener for AstPrinter<'_, W> {
    fn on_enter_every_rule(&mut self, walker: &mut AstWalker<'_>, node: NodeId) {
        let ast = walker.ast();
        // Terminals are printed by `on_visit_terminal` and never exit.
        if ast.terminal(node).is_some() {
            return;
        }
        let span = ast.span(node);
        self.out.indent(self.depth);
        self.out.bold(&ast.kind(node).to_string());
        self.out.dim(&format!(" {}:{}", span.line, span.column));
        self.out.newline();
        self.depth += 1;
    }

    fn on_exit_every_rule(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId) {
        self.depth -= 1;
    }

    fn on_visit_terminal(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId, token: &Token) {
        self.out.indent(self.depth);
        self.out.info(&format!("{:?}", token.kind));
        self.out.plain(" ");
        self.out.plain(&token.text);
        self.out.newline();
    }
}

pub fn execute<W: WriteColor>(
    file: &Path,
    config: &FrontendConfig,
    out: &mut StyledOutput<W>,
) -> anyhow::Result<usize> {
    let (name, source) = super::read_source(file)?;
    let lexed = Lexer::new(&source, name.as_str()).tokenize();
    let result = Parser::new(lexed.tokens, config).parse();

    let mut printer = AstPrinter { out, depth: 0 };
    AstWalker::new(&result.ast).walk(&mut printer, result.root);

    let errors: Vec<CompileError> = lexed
        .errors
        .into_iter()
        .map(CompileError::from)
        .chain(result.errors.into_iter().map(CompileError::from))
        .collect();
    super::report(&name, &source, &errors, out)
}
