//! Kush command-line driver
//!
//! Runs the front end over source files and prints diagnostics, the token
//! stream, the syntax tree or the symbol table.

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use output::{ColorWhen, StyledOutput};

#[derive(Parser)]
#[command(name = "kush")]
#[command(about = "Kush language front end", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./kush.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// When to color output
    #[arg(long, global = true, value_name = "WHEN", value_enum, default_value_t = ColorWhen::Auto)]
    color: ColorWhen,

    /// Increase logging verbosity (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Maximum nesting depth before parsing stops
    #[arg(long, global = true, value_name = "DEPTH")]
    max_depth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check source files and report diagnostics
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<String>,
        /// Diagnostic output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },

    /// Print the token stream of a file
    Tokens {
        /// Input file
        file: PathBuf,
    },

    /// Print the syntax tree of a file
    Ast {
        /// Input file
        file: PathBuf,
    },

    /// Print the scopes and symbols of a file
    Symbols {
        /// Input file
        file: PathBuf,
    },
}

/// Output format of `kush check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Rendered source snippets
    Pretty,
    /// One JSON document on stdout
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether the command finished without reporting errors.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut frontend = config::load(cli.config.as_deref())?;
    if let Some(depth) = cli.max_depth {
        frontend = frontend.with_max_nesting_depth(depth);
    }
    tracing::debug!(?frontend, "configuration loaded");

    let choice = output::resolve_color_choice(cli.color);
    let mut out = StyledOutput::stdout(choice);

    let errors = match cli.command {
        Commands::Check { paths, format } => {
            commands::check::execute(&paths, format, &frontend, &mut out)?.errors
        }
        Commands::Tokens { file } => commands::tokens::execute(&file, &mut out)?,
        Commands::Ast { file } => commands::ast::execute(&file, &frontend, &mut out)?,
        Commands::Symbols { file } => commands::symbols::execute(&file, &frontend, &mut out)?,
    };
    out.flush();

    Ok(errors == 0)
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let directive = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
