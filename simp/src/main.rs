//! SIMP interpreter CLI

use clap::{Parser, Subcommand};
use simp::error::{report_error, report_runtime_error};
use simp::interp::Interpreter;
use simp::{CompileError, Config, ErrorPolicy};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

#[derive(Parser)]
#[command(name = "simp", version, about = "SIMP interpreter with access-counting variables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a SIMP source file
    Run {
        /// Source file to run
        file: PathBuf,
        /// Stop at the first runtime error
        #[arg(long)]
        fail_fast: bool,
        /// Override the error policy from the config file
        #[arg(long, value_enum, conflicts_with = "fail_fast")]
        policy: Option<ErrorPolicy>,
        /// Maximum nested call depth
        #[arg(long)]
        max_depth: Option<usize>,
        /// Config file (defaults to ./simp.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Start an interactive session
    Repl {
        /// Config file (defaults to ./simp.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Install a log subscriber when `RUST_LOG` is set
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            file,
            fail_fast,
            policy,
            max_depth,
            config,
        } => run_file(&file, fail_fast, policy, max_depth, config.as_deref()),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Repl { config } => start_repl(config.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: &Path) -> Result<(String, String), CompileError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| CompileError::io_error(format!("{}: {e}", path.display())))?;
    Ok((source, path.display().to_string()))
}

fn run_file(
    path: &Path,
    fail_fast: bool,
    policy: Option<ErrorPolicy>,
    max_depth: Option<usize>,
    config_path: Option<&Path>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = Config::load(config_path)?;
    if fail_fast {
        config.error_policy = ErrorPolicy::FailFast;
    }
    if let Some(policy) = policy {
        config.error_policy = policy;
    }
    if let Some(depth) = max_depth {
        config.max_call_depth = depth.max(1);
    }
    tracing::debug!(?config, "configuration");

    let (source, filename) = read_source(path)?;
    let program = match simp::parse_source(&filename, &source) {
        Ok(program) => program,
        Err(err) => {
            report_error(&filename, &source, &err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut interpreter = Interpreter::from_config(&config);
    match interpreter.run(&program) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            report_runtime_error(&filename, &source, &err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn parse_file(path: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let (source, filename) = read_source(path)?;
    match simp::parse_source(&filename, &source) {
        Ok(ast) => {
            println!("{}", serde_json::to_string_pretty(&ast)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error(&filename, &source, &err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn tokenize_file(path: &Path) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let (source, filename) = read_source(path)?;
    match simp::lexer::tokenize(&source) {
        Ok(tokens) => {
            for (tok, span) in &tokens {
                println!("{tok:?} @ {span}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error(&filename, &source, &err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn start_repl(config_path: Option<&Path>) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::load(config_path)?;
    let mut repl = simp::repl::Repl::new(&config)?;
    repl.run()?;
    Ok(ExitCode::SUCCESS)
}
