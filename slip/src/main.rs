//! Slip CLI

use clap::{Parser, Subcommand};
use slip::error::report_error;
use slip::repl::{Repl, ReplConfig};
use slip::Interpreter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Environment variable holding a `tracing` filter directive
const LOG_ENV: &str = "SLIP_LOG";

#[derive(Parser)]
#[command(name = "slip", version, about = "Slip - a small Lisp interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive REPL (default)
    Repl {
        /// Do not load or save ~/.slip_history
        #[arg(long)]
        no_history: bool,
    },
    /// Evaluate every form in a source file
    Run {
        /// Source file to run
        file: PathBuf,
    },
    /// Evaluate an expression and print the last result
    Eval {
        /// Source text, e.g. '(+ 1 2)'
        expr: String,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let ok = match cli.command.unwrap_or(Command::Repl { no_history: false }) {
        Command::Repl { no_history } => run_repl(no_history),
        Command::Run { file } => run_file(&file),
        Command::Eval { expr } => eval_expr(&expr),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Install a stderr subscriber, only when `SLIP_LOG` is set
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var_os(LOG_ENV).is_some() {
        let filter = EnvFilter::from_env(LOG_ENV);
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    }
}

fn run_repl(no_history: bool) -> bool {
    let config = if no_history {
        ReplConfig::default().without_history()
    } else {
        ReplConfig::default()
    };
    match Repl::new(config).and_then(|mut repl| repl.run()) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("Error: {err}");
            false
        }
    }
}

/// Read a source file; failures come back as `Error::Io`
fn read_source(path: &Path) -> slip::Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

fn run_file(path: &Path) -> bool {
    let filename = path.display().to_string();
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            report_error(&filename, "", &err);
            return false;
        }
    };

    tracing::info!(file = %filename, "running");
    match Interpreter::new().eval_source(&source) {
        Ok(_) => true,
        Err(err) => {
            report_error(&filename, &source, &err);
            false
        }
    }
}

fn eval_expr(expr: &str) -> bool {
    match Interpreter::new().eval_source(expr) {
        Ok(value) => {
            println!("{value}");
            true
        }
        Err(err) => {
            report_error("<eval>", expr, &err);
            false
        }
    }
}

fn tokenize_file(path: &Path) -> bool {
    let filename = path.display().to_string();
    let source = match read_source(path) {
        Ok(source) => source,
        Err(err) => {
            report_error(&filename, "", &err);
            return false;
        }
    };

    match slip::lexer::tokenize(&source) {
        Ok(tokens) => {
            for (tok, span) in &tokens {
                println!("{tok:?} @ {span}");
            }
            true
        }
        Err(err) => {
            report_error(&filename, &source, &err);
            false
        }
    }
}
