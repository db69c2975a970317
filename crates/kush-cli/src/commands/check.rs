//! `kush check`: compile source files and report diagnostics.

use anyhow::Context;
use kush_compiler::diagnostic::create_files;
use kush_compiler::{Compiler, DiagnosticRecord, ErrorCategory, FrontendConfig, MainComponent};
use serde::Serialize;
use termcolor::WriteColor;

use super::files::collect_kush_files;
use crate::output::StyledOutput;
use crate::Format;

/// Totals over all checked files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub files: usize,
    /// Files with at least one error
    pub failed: usize,
    pub errors: usize,
}

#[derive(Serialize)]
struct FileReport {
    path: String,
    main_component: MainComponent,
    safe_for_codegen: bool,
    diagnostics: Vec<DiagnosticRecord>,
}

#[derive(Serialize)]
struct JsonReport {
    files: Vec<FileReport>,
    summary: CheckSummary,
}

pub fn execute<W: WriteColor>(
    paths: &[String],
    format: Format,
    config: &FrontendConfig,
    out: &mut StyledOutput<W>,
) -> anyhow::Result<CheckSummary> {
    let files = collect_kush_files(paths)?;
    let compiler = Compiler::new(config.clone());

    let mut summary = CheckSummary::default();
    let mut reports = Vec::new();

    for path in &files {
        let name = path.display().to_string();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", name))?;

        let unit = compiler.compile(&name, &source);
        tracing::info!(
            path = %name,
            syntax = unit.count(ErrorCategory::Syntax),
            errors = unit.errors.len(),
            "checked"
        );

        summary.files += 1;
        summary.errors += unit.errors.len();
        if unit.has_errors() {
            summary.failed += 1;
        }

        let (sources, file_id) = create_files(name.clone(), source);
        let diagnostics = unit.diagnostics(file_id);
        match format {
            Format::Pretty => {
                for diagnostic in &diagnostics {
                    diagnostic.emit(out.writer(), &sources)?;
                }
            }
            Format::Json => reports.push(FileReport {
                path: name,
                main_component: unit.main_component.clone(),
                safe_for_codegen: unit.is_safe_for_codegen(),
                diagnostics: diagnostics.iter().map(|d| d.to_record(&sources)).collect(),
            }),
        }
    }

    match format {
        Format::Pretty => print_summary(&summary, out),
        Format::Json => {
            let report = JsonReport {
                files: reports,
                summary: summary.clone(),
            };
            out.plain(&serde_json::to_string_pretty(&report)?);
            out.newline();
        }
    }

    Ok(summary)
}

fn print_summary<W: WriteColor>(summary: &CheckSummary, out: &mut StyledOutput<W>) {
    let files = plural(summary.files, "file");
    if summary.errors == 0 {
        out.success("ok");
        out.plain(&format!(": checked {}", files));
    } else {
        out.error("failed");
        out.plain(&format!(
            ": {} in {} of {}",
            plural(summary.errors, "error"),
            summary.failed,
            files
        ));
    }
    out.newline();
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
