//! Webster interpreter CLI

use clap::Parser;
use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;
use webster::InterpretError;
use webster_value::{EnvRef, Environment};

#[derive(Parser)]
#[command(name = "webster", version, about = "Webster scripting language interpreter")]
struct Cli {
    /// Source file to run (must end in `.wb`). Starts a REPL when omitted.
    file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("{} is not a Webster source file (expected the .wb extension)", .0.display())]
    NotWebsterFile(PathBuf),
    #[error(transparent)]
    Interpret(#[from] InterpretError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.file {
        Some(file) => run_file(&file),
        None => run_repl(),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}

/// Installs a `tracing` subscriber, only if `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_file(path: &Path) -> Result<(), CliError> {
    if path.extension().and_then(OsStr::to_str) != Some("wb") {
        return Err(CliError::NotWebsterFile(path.to_path_buf()));
    }
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "running file");

    let env = Environment::new().into_ref();
    let value = webster::interpret_in(&source, &env)?;
    if !value.is_null() {
        println!("{}", value.inspect());
    }
    Ok(())
}

/// Reads and evaluates one line at a time. Bindings persist across lines.
fn run_repl() -> Result<(), CliError> {
    let env = Environment::new().into_ref();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            return Ok(());
        }
        eval_line(&input, &env);
    }
}

fn eval_line(input: &str, env: &EnvRef) {
    match webster::interpret_in(input, env) {
        Ok(value) if value.is_null() => {}
        Ok(value) => println!("{}", value.inspect()),
        Err(err) => eprintln!("{err}"),
    }
}
