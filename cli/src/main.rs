use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{Diagnostic, Result};
use quill::{Bytecode, Engine, EngineOptions, Error, ErrorReport, ExecutionOptions, Value};
use quill_core::vm::STACK_SIZE;

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Inspect and run Quill bytecode artifacts", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the constant pool and instruction listing of an artifact
    Disasm {
        /// Artifact path, or `-` for stdin
        file: PathBuf,
    },

    /// Execute an artifact and print its result
    Run {
        /// Artifact path, or `-` for stdin
        file: PathBuf,

        /// Operand stack capacity
        #[arg(long, default_value_t = STACK_SIZE)]
        stack_size: usize,
    },
}

#[derive(Debug, thiserror::Error, Diagnostic)]
enum CliError {
    #[error("cannot read {}", path.display())]
    #[diagnostic(code(quill::cli::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn report(error: Error) -> miette::Report {
    miette::Report::new(ErrorReport::from(error))
}

fn read_artifact(path: &Path) -> Result<Bytecode> {
    read_artifact_from(path, std::io::stdin().lock())
}

/// Decode an artifact from `path`, or from `stdin` when the path is `-`.
fn read_artifact_from(path: &Path, mut stdin: impl Read) -> Result<Bytecode> {
    let read_error = |source| CliError::Read {
        path: path.to_path_buf(),
        source,
    };

    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        stdin.read_to_end(&mut buf).map_err(read_error)?;
        buf
    } else {
        std::fs::read(path).map_err(read_error)?
    };
    tracing::debug!(path = %path.display(), len = bytes.len(), "Read artifact");

    Bytecode::from_bytes(&bytes).map_err(|e| report(e.into()))
}

/// Execute an artifact; where the result is read from is recorded in the
/// artifact itself.
fn run(bytecode: &Bytecode, stack_size: usize) -> Result<Option<Value>> {
    let engine = Engine::new(EngineOptions {
        default_execution_options: ExecutionOptions { stack_size },
        ..Default::default()
    });
    engine.execute(bytecode).map_err(report)
}

fn main() -> Result<()> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_env("QUILL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match args.command {
        Command::Disasm { file } => {
            let bytecode = read_artifact(&file)?;
            print!("{}", bytecode);
        }
        Command::Run { file, stack_size } => {
            let bytecode = read_artifact(&file)?;
            match run(&bytecode, stack_size)? {
                Some(value) => println!("{}", value),
                None => tracing::info!("Program produced no value"),
            }
        }
    }

    Ok(())
}
