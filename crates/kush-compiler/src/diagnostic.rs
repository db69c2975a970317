//! Diagnostic infrastructure for error reporting
//!
//! Wraps `codespan-reporting` for terminal output and provides
//! [`DiagnosticRecord`], a serializable form for machine consumers.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use serde::Serialize;
use termcolor::WriteColor;

use crate::analyzer::BindError;
use crate::error::{CompileError, ErrorCategory, ErrorCode};
use crate::parser::ParseErrorKind;
use crate::token::Span;

/// Source files known to the renderer, keyed by the id `add` returns.
pub type SourceFiles = SimpleFiles<String, String>;

/// A diagnostic message with source code context
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
    category: Option<ErrorCategory>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
            category: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self.inner = self.inner.with_code(code.0);
        self
    }

    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::primary(file_id, span.start..span.end).with_message(message));
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        self.inner
            .labels
            .push(Label::secondary(file_id, span.start..span.end).with_message(message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Create a diagnostic from any front end error.
    pub fn from_compile_error(error: &CompileError, file_id: usize) -> Self {
        let diag = match error {
            CompileError::Lexical(lex) => {
                let diag = Diagnostic::error(lex.message()).with_primary_label(
                    file_id,
                    lex.span,
                    "invalid token",
                );
                match lex.hint() {
                    Some(hint) => diag.with_help(hint),
                    None => diag,
                }
            }

            CompileError::Syntax(parse) => {
                let label = match parse.kind {
                    ParseErrorKind::UnexpectedToken => "unexpected token",
                    ParseErrorKind::UnexpectedEndOfStream => "input ends here",
                    ParseErrorKind::NoViableAlternative { .. } => "not valid here",
                    ParseErrorKind::NestingTooDeep { .. } => "nesting limit reached here",
                };
                let mut diag = Diagnostic::error(parse.message.clone())
                    .with_primary_label(file_id, parse.span(), label);
                if parse.is_fatal() {
                    diag = diag.with_note("parsing stopped at this point");
                }
                match &parse.suggestion {
                    Some(suggestion) => diag.with_help(suggestion.clone()),
                    None => diag,
                }
            }

            CompileError::Semantic(bind) => Self::from_bind_error(bind, file_id),

            CompileError::Internal(internal) => Diagnostic::error(format!("internal error: {}", internal))
                .with_note("the unit was not analyzed"),
        };
        diag.with_code(error.code()).with_category(error.category())
    }

    fn from_bind_error(error: &BindError, file_id: usize) -> Self {
        match error {
            BindError::DuplicateSymbol { name, original, duplicate } => {
                Diagnostic::error(format!("duplicate symbol '{}'", name))
                    .with_primary_label(file_id, *duplicate, "already defined in this scope")
                    .with_secondary_label(file_id, *original, "first definition here")
            }

            BindError::UnresolvedSymbol { name, span } => {
                Diagnostic::error(format!("cannot find '{}'", name))
                    .with_primary_label(file_id, *span, "not found in this scope")
            }

            BindError::NotAClass { name, category, span } => {
                Diagnostic::error(format!("'{}' is a {}, not a class", name, category))
                    .with_primary_label(file_id, *span, "expected a class")
            }

            BindError::CyclicInheritance { name, cycle, span } => {
                Diagnostic::error(format!("class '{}' inherits from itself", name))
                    .with_primary_label(file_id, *span, "cycle starts here")
                    .with_note(format!("inheritance chain: {}", cycle.join(" -> ")))
            }
        }
    }

    /// Render the diagnostic to `writer`.
    pub fn emit(
        &self,
        writer: &mut dyn WriteColor,
        files: &SourceFiles,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    pub fn to_record(&self, files: &SourceFiles) -> DiagnosticRecord {
        DiagnosticRecord::from_diagnostic(self, files)
    }
}

/// Serializable form of a diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    pub code: Option<String>,
    pub category: Option<ErrorCategory>,
    pub severity: String,
    pub message: String,
    pub labels: Vec<LabelRecord>,
    pub notes: Vec<String>,
}

/// Serializable form of a diagnostic label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRecord {
    pub file: String,
    /// 1-indexed
    pub start_line: usize,
    /// 1-indexed
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
    /// "primary" or "secondary"
    pub style: String,
}

impl DiagnosticRecord {
    pub fn from_diagnostic(diag: &Diagnostic, files: &SourceFiles) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = files.location(label.file_id, label.range.start).ok()?;
                let end = files.location(label.file_id, label.range.end).ok()?;
                Some(LabelRecord {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: label.message.clone(),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        DiagnosticRecord {
            code: diag.code.map(|c| c.0.to_string()),
            category: diag.category,
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Helper to create a file set holding one source
pub fn create_files(path: impl Into<String>, source: impl Into<String>) -> (SourceFiles, usize) {
    let mut files = SimpleFiles::new();
    let id = files.add(path.into(), source.into());
    (files, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{LexError, LexErrorKind};
    use std::sync::Arc;
    use termcolor::NoColor;

    fn render(diag: &Diagnostic, files: &SourceFiles) -> String {
        let mut out = NoColor::new(Vec::new());
        diag.emit(&mut out, files).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_create_error_diagnostic() {
        let diag = Diagnostic::error("Test error message");
        assert_eq!(diag.inner.severity, Severity::Error);
        assert!(diag.code().is_none());
    }

    #[test]
    fn test_duplicate_symbol_labels() {
        let error = CompileError::from(BindError::DuplicateSymbol {
            name: "x".to_string(),
            original: Span::new(4, 5, 1, 5),
            duplicate: Span::new(11, 12, 1, 12),
        });
        let diag = Diagnostic::from_compile_error(&error, 0);
        assert_eq!(diag.code(), Some(ErrorCode("E2001")));
        assert_eq!(diag.inner().labels.len(), 2);
        assert_eq!(diag.inner().labels[0].style, LabelStyle::Primary);
    }

    #[test]
    fn test_render_lexical_error() {
        let (files, id) = create_files("test.kush", "var s = \"abc\n");
        let error = CompileError::from(LexError {
            kind: LexErrorKind::UnterminatedString,
            span: Span::new(8, 12, 1, 9),
            path: Arc::from("test.kush"),
        });
        let text = render(&Diagnostic::from_compile_error(&error, id), &files);
        assert!(text.contains("error[E0002]"));
        assert!(text.contains("test.kush:1:9"));
        assert!(text.contains("help: add a closing quote"));
    }

    #[test]
    fn test_record() {
        let (files, id) = create_files("test.kush", "class A extends B {}\n");
        let error = CompileError::from(BindError::UnresolvedSymbol {
            name: "B".to_string(),
            span: Span::new(16, 17, 1, 17),
        });
        let record = Diagnostic::from_compile_error(&error, id).to_record(&files);

        assert_eq!(record.code.as_deref(), Some("E2002"));
        assert_eq!(record.category, Some(ErrorCategory::UnresolvedSymbol));
        assert_eq!(record.labels.len(), 1);
        assert_eq!(record.labels[0].start_line, 1);
        assert_eq!(record.labels[0].start_column, 17);
        assert_eq!(record.labels[0].style, "primary");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"category\":\"unresolved_symbol\""));
    }
}
