//! `kush symbols`: print the scope tree of an analyzed file.

use std::path::Path;

use kush_compiler::symbols::ResolutionState;
use kush_compiler::{Compiler, FrontendConfig, ScopeId, Symbol, SymbolKind, SymbolTable};
use termcolor::WriteColor;

use crate::output::StyledOutput;

pub fn execute<W: WriteColor>(
    file: &Path,
    config: &FrontendConfig,
    out: &mut StyledOutput<W>,
) -> anyhow::Result<usize> {
    let (name, source) = super::read_source(file)?;
    let unit = Compiler::new(config.clone()).compile(&name, &source);

    match &unit.analysis {
        Some(analysis) => {
            if let Some(package) = &analysis.package {
                out.bold("package ");
                out.plain(package);
                out.newline();
            }
            if let Some(main) = unit.main_component.name() {
                out.bold("main ");
                out.plain(main);
                out.newline();
            }
            print_scope(&analysis.symbols, analysis.root_scope, 0, out);
        }
        None => {
            out.warning("not analyzed");
            out.newline();
        }
    }

    super::report(&name, &source, &unit.errors, out)
}

fn print_scope<W: WriteColor>(
    table: &SymbolTable,
    id: ScopeId,
    depth: usize,
    out: &mut StyledOutput<W>,
) {
    let scope = table.scope(id);
    out.indent(depth);
    out.bold(&format!("{} scope", scope.kind));
    if let Some(owner) = scope.owner {
        out.plain(" ");
        out.plain(&table.symbol(owner).name);
    }
    if let Some(node) = scope.node {
        out.dim(&format!(" {}", node));
    }
    out.newline();

    for &symbol in scope.symbols() {
        print_symbol(table, table.symbol(symbol), depth + 1, out);
    }

    let children: Vec<ScopeId> = table.children(id).map(|child| child.id).collect();
    for child in children {
        print_scope(table, child, depth + 1, out);
    }
}

fn print_symbol<W: WriteColor>(
    table: &SymbolTable,
    symbol: &Symbol,
    depth: usize,
    out: &mut StyledOutput<W>,
) {
    out.indent(depth);
    if !symbol.modifiers.is_empty() {
        out.plain(&format!("{} ", symbol.modifiers));
    }
    out.info(&symbol.category().to_string());
    out.plain(" ");
    out.plain(&symbol.name);

    match &symbol.kind {
        SymbolKind::Class(class) => {
            let names: Vec<String> = class
                .superclasses
                .iter()
                .map(|id| table.symbol(*id).name.clone())
                .chain(class.imported_superclasses.iter().map(|id| {
                    match &table.symbol(*id).kind {
                        SymbolKind::External { qualified_name } => qualified_name.clone(),
                        _ => table.symbol(*id).name.clone(),
                    }
                }))
                .collect();
            if !names.is_empty() {
                out.plain(&format!(" extends {}", names.join(", ")));
            }
            if class.state == ResolutionState::Failed {
                out.error(" (unresolved)");
            }
        }
        SymbolKind::Function(function) => {
            let variadic = if function.variadic { ", ..." } else { "" };
            out.dim(&format!(" ({}{})", function.parameter_count, variadic));
        }
        SymbolKind::External { qualified_name } => {
            out.dim(&format!(" = {}", qualified_name));
        }
        _ => {}
    }
    out.newline();
}
