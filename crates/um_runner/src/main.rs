use clap::Parser;
use colored::Colorize;
use std::io;
use std::process;
use tracing::Level;
use um_vm::ExecError;

mod run;

/// Standardized exit codes for the runner.
/// 0 = halted, 2 = input error, 3 = machine fault, 4 = step limit, 1 = other.
const EXIT_OK: i32 = 0;
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_FAULT: i32 = 3;
const EXIT_STEP_LIMIT: i32 = 4;

const DEFAULT_PROGRAM: &str = "sandmark.umz";

#[derive(Parser)]
#[command(name = "um", version, about = "Run a UM program image on the console")]
pub struct Cli {
    /// Program image: big-endian 32-bit words
    #[arg(default_value = DEFAULT_PROGRAM)]
    pub program: String,

    /// Machine config JSON file
    #[arg(long, env = "UM_CONFIG")]
    pub config: Option<String>,

    /// Stop after this many instructions
    #[arg(long, env = "UM_MAX_STEPS")]
    pub max_steps: Option<u64>,

    /// Fault on output values above 255 instead of truncating
    #[arg(long)]
    pub strict_output: bool,

    /// Print a JSON run summary to stderr when the machine stops
    #[arg(long)]
    pub stats: bool,
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ExecError>() {
        Some(ExecError::Fault { .. }) => EXIT_FAULT,
        Some(ExecError::StepLimitExhausted(_)) => EXIT_STEP_LIMIT,
        Some(ExecError::Io(_)) => EXIT_OTHER,
        None if err.is::<run::InputError>() => EXIT_INPUT,
        None => EXIT_OTHER,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    match run::run(&cli) {
        Ok(()) => process::exit(EXIT_OK),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            process::exit(exit_code_for(&e));
        }
    }
}
