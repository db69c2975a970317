//! Subcommand implementations.

pub mod ast;
pub mod check;
pub mod files;
pub mod symbols;
pub mod tokens;

use std::path::Path;

use anyhow::Context;
use kush_compiler::diagnostic::create_files;
use kush_compiler::{CompileError, Diagnostic};
use termcolor::WriteColor;

use crate::output::StyledOutput;

/// Read a single input file, returning its display name and contents.
fn read_source(path: &Path) -> anyhow::Result<(String, String)> {
    let name = path.display().to_string();
    let source =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", name))?;
    Ok((name, source))
}

/// Render `errors` against the source they came from. Returns their count.
fn report<W: WriteColor>(
    name: &str,
    source: &str,
    errors: &[CompileError],
    out: &mut StyledOutput<W>,
) -> anyhow::Result<usize> {
    if errors.is_empty() {
        return Ok(0);
    }
    let (files, file_id) = create_files(name, source);
    out.newline();
    for error in errors {
        Diagnostic::from_compile_error(error, file_id).emit(out.writer(), &files)?;
    }
    Ok(errors.len())
}
