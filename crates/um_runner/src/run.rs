use crate::Cli;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io;
use thiserror::Error;
use tracing::info;
use um_vm::{
    ImageError, Machine, MachineConfig, MachineState, OutputPolicy, ProgramImage, StreamSink,
    StreamSource,
};

/// The program image or config could not be read.
#[derive(Error, Debug)]
pub enum InputError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("read config {path}: {source}")]
    ConfigRead { path: String, source: io::Error },
    #[error("parse config {path}: {source}")]
    ConfigParse { path: String, source: serde_json::Error },
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    program: &'a str,
    cid: &'a str,
    words: usize,
    steps: u64,
    state: MachineState,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Config file first, then command-line overrides.
pub fn machine_config(cli: &Cli) -> Result<MachineConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            let bytes = fs::read(path)
                .map_err(|source| InputError::ConfigRead { path: path.clone(), source })?;
            MachineConfig::from_json(&bytes)
                .map_err(|source| InputError::ConfigParse { path: path.clone(), source })?
        }
        None => MachineConfig::default(),
    };
    if cli.max_steps.is_some() {
        cfg.step_limit = cli.max_steps;
    }
    if cli.strict_output {
        cfg.output_policy = OutputPolicy::Fault;
    }
    Ok(cfg)
}

pub fn run(cli: &Cli) -> Result<()> {
    let cfg = machine_config(cli).context("machine config")?;
    let image = ProgramImage::load(&cli.program)
        .map_err(InputError::from)
        .context("load program")?;
    let cid = image.cid().to_owned();
    let words = image.words().len();
    info!(program = %cli.program, %cid, words, "loaded program");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut machine = Machine::new(
        cfg,
        image.into_words(),
        StreamSource::new(stdin.lock()),
        StreamSink::new(stdout.lock()),
    );
    let result = machine.run();

    if cli.stats {
        let summary = RunSummary {
            program: &cli.program,
            cid: &cid,
            words,
            steps: machine.steps(),
            state: machine.state(),
            error: result.as_ref().err().map(|e| e.to_string()),
        };
        eprintln!("{}", serde_json::to_string(&summary)?);
    }
    result?;
    Ok(())
}
