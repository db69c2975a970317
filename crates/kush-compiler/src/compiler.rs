//! Front end pipeline: Lexer -> Parser -> Analyzer, one compilation unit at a
//! time.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analyzer::{Analysis, Analyzer};
use crate::ast::{Ast, NodeId};
use crate::component::MainComponent;
use crate::config::FrontendConfig;
use crate::diagnostic::Diagnostic;
use crate::error::{CompileError, ErrorCategory};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Everything the front end knows about one source file.
#[derive(Debug)]
pub struct CompilationUnit {
    pub path: Arc<str>,
    pub ast: Ast,
    /// The `CompilationUnit` node of `ast`
    pub root: NodeId,
    /// `None` when analysis was skipped or failed internally
    pub analysis: Option<Analysis>,
    /// Lexical, then syntax, then semantic errors
    pub errors: Vec<CompileError>,
    pub main_component: MainComponent,
}

impl CompilationUnit {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when the unit was fully analyzed without any error.
    pub fn is_safe_for_codegen(&self) -> bool {
        self.errors.is_empty() && self.analysis.is_some()
    }

    pub fn count(&self, category: ErrorCategory) -> usize {
        self.errors.iter().filter(|e| e.category() == category).count()
    }

    /// Diagnostics for all errors, labelled against `file_id`.
    pub fn diagnostics(&self, file_id: usize) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(|error| Diagnostic::from_compile_error(error, file_id))
            .collect()
    }
}

/// Runs the front end with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: FrontendConfig,
}

impl Compiler {
    pub fn new(config: FrontendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Compile one source file. Errors are collected in the unit, never
    /// returned.
    pub fn compile(&self, path: &str, source: &str) -> CompilationUnit {
        let _span = tracing::debug_span!("compile", path).entered();
        let path: Arc<str> = Arc::from(path);

        let lexed = Lexer::new(source, path.clone()).tokenize();
        let mut errors: Vec<CompileError> =
            lexed.errors.into_iter().map(CompileError::from).collect();

        let parsed = Parser::new(lexed.tokens, &self.config).parse();
        let syntax_errors = !parsed.errors.is_empty();
        errors.extend(parsed.errors.into_iter().map(CompileError::from));

        let analysis = if syntax_errors && !self.config.analyze_with_syntax_errors {
            tracing::debug!("skipping analysis after syntax errors");
            None
        } else {
            match Analyzer::new(&self.config).analyze(&parsed.ast, parsed.root) {
                Ok(analysis) => {
                    errors.extend(analysis.errors.iter().cloned().map(CompileError::from));
                    Some(analysis)
                }
                Err(internal) => {
                    tracing::error!(error = %internal, "analysis aborted");
                    errors.push(CompileError::from(internal));
                    None
                }
            }
        };

        tracing::debug!(errors = errors.len(), "compiled");

        CompilationUnit {
            path,
            ast: parsed.ast,
            root: parsed.root,
            analysis,
            errors,
            main_component: parsed.main_component,
        }
    }

    /// Compile independent units, in path order.
    pub fn compile_all(&self, sources: &BTreeMap<String, String>) -> Vec<CompilationUnit> {
        sources
            .iter()
            .map(|(path, source)| self.compile(path, source))
            .collect()
    }
}
