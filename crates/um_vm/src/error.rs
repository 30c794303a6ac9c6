use crate::decode::decode;
use crate::Platter;
use std::path::PathBuf;
use thiserror::Error;

/// A fatal machine condition. Raised before the faulting instruction mutates anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    #[error("invalid opcode {0}")]
    InvalidOpcode(u32),
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid handle {0}")]
    InvalidHandle(Platter),
    #[error("offset {offset} out of bounds for array {handle} (len {len})")]
    OutOfBounds { handle: Platter, offset: Platter, len: usize },
    #[error("double free of handle {0}")]
    DoubleFree(Platter),
    #[error("arena exhausted: no handle left to assign")]
    ArenaExhausted,
    #[error("cannot allocate an array of {len} platters")]
    AllocationFailed { len: Platter },
    #[error("output value {0:#x} does not fit in one byte")]
    OutputOutOfRange(Platter),
}

#[derive(Error, Debug)]
pub enum ExecError {
    /// `word` is `None` when the fault happened fetching the instruction itself.
    #[error("fault at pc={pc} [{}]: {fault}", describe(.word))]
    Fault { pc: Platter, word: Option<Platter>, fault: Fault },
    #[error("step limit exhausted after {0} steps")]
    StepLimitExhausted(u64),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ExecError::Fault { fault, .. } => Some(fault),
            _ => None,
        }
    }
}

fn describe(word: &Option<Platter>) -> String {
    match *word {
        None => "fetch".into(),
        Some(word) => match decode(word) {
            Ok(ins) => format!("{word:#010x} {ins}"),
            Err(_) => format!("{word:#010x}"),
        },
    }
}

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, ExecError>;
