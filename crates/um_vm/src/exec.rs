use crate::{
    arena::Arena,
    config::{MachineConfig, OutputPolicy},
    decode::{decode, Instr},
    error::{ExecError, Fault, Result},
    providers::{ByteSink, ByteSource},
    registers::Registers,
    Platter,
};
use serde::Serialize;
use std::io;
use tracing::debug;

/// Register value produced by Input once the source is exhausted.
pub const END_OF_INPUT: Platter = 0xFFFF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    Running,
    Halted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub steps: u64,
    pub state: MachineState,
}

/// What the program counter does after an instruction completes.
enum Flow {
    Next,
    Jump(Platter),
    Halt,
}

/// Internal failure of a single instruction, before pc/word context is attached.
enum Trap {
    Fault(Fault),
    Io(io::Error),
}

impl From<Fault> for Trap {
    fn from(f: Fault) -> Self {
        Trap::Fault(f)
    }
}

impl From<io::Error> for Trap {
    fn from(e: io::Error) -> Self {
        Trap::Io(e)
    }
}

pub struct Machine<I: ByteSource, O: ByteSink> {
    cfg: MachineConfig,
    regs: Registers,
    pc: Platter,
    arena: Arena,
    input: I,
    output: O,
    steps: u64,
    state: MachineState,
}

impl<I: ByteSource, O: ByteSink> Machine<I, O> {
    pub fn new(cfg: MachineConfig, program: Vec<Platter>, input: I, output: O) -> Self {
        Self {
            cfg,
            regs: Registers::new(),
            pc: 0,
            arena: Arena::new(program),
            input,
            output,
            steps: 0,
            state: MachineState::Running,
        }
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn pc(&self) -> Platter {
        self.pc
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_streams(self) -> (I, O) {
        (self.input, self.output)
    }

    /// Run until Halt or the first error.
    pub fn run(&mut self) -> Result<RunOutcome> {
        debug!(
            program_len = self.arena.program().len(),
            step_limit = ?self.cfg.step_limit,
            "machine start"
        );
        while self.step()? == MachineState::Running {}
        debug!(steps = self.steps, live_arrays = self.arena.live_count(), "machine halted");
        Ok(RunOutcome { steps: self.steps, state: self.state })
    }

    /// Fetch, decode and execute one instruction.
    pub fn step(&mut self) -> Result<MachineState> {
        if self.state == MachineState::Halted {
            return Ok(MachineState::Halted);
        }
        if let Some(limit) = self.cfg.step_limit {
            if self.steps >= limit {
                return Err(ExecError::StepLimitExhausted(self.steps));
            }
        }

        let pc = self.pc;
        let word = self
            .arena
            .read(0, pc)
            .map_err(|fault| ExecError::Fault { pc, word: None, fault })?;
        let ins = decode(word).map_err(|fault| ExecError::Fault { pc, word: Some(word), fault })?;

        let flow = self.execute(ins).map_err(|trap| match trap {
            Trap::Fault(fault) => ExecError::Fault { pc, word: Some(word), fault },
            Trap::Io(e) => ExecError::Io(e),
        })?;
        self.steps += 1;

        match flow {
            Flow::Next => self.pc = pc.wrapping_add(1),
            // Lands where "pc = target - 1, then advance" would.
            Flow::Jump(target) => self.pc = target,
            Flow::Halt => self.state = MachineState::Halted,
        }
        Ok(self.state)
    }

    fn execute(&mut self, ins: Instr) -> std::result::Result<Flow, Trap> {
        let r = &mut self.regs;
        match ins {
            Instr::CondMove { a, b, c } => {
                if r[c] != 0 {
                    r[a] = r[b];
                }
            }
            Instr::Index { a, b, c } => {
                r[a] = self.arena.read(r[b], r[c])?;
            }
            Instr::Amend { a, b, c } => {
                self.arena.write(r[a], r[b], r[c])?;
            }
            Instr::Add { a, b, c } => r[a] = r[b].wrapping_add(r[c]),
            Instr::Mul { a, b, c } => r[a] = r[b].wrapping_mul(r[c]),
            Instr::Div { a, b, c } => {
                r[a] = r[b].checked_div(r[c]).ok_or(Fault::DivisionByZero)?;
            }
            Instr::Nand { a, b, c } => r[a] = !(r[b] & r[c]),
            Instr::Halt => return Ok(Flow::Halt),
            Instr::Alloc { b, c } => {
                r[b] = self.arena.allocate(r[c])?;
            }
            Instr::Abandon { c } => {
                self.arena.abandon(r[c])?;
            }
            Instr::Output { c } => {
                let value = r[c];
                let byte = match u8::try_from(value) {
                    Ok(byte) => byte,
                    Err(_) if self.cfg.output_policy == OutputPolicy::Truncate => value as u8,
                    Err(_) => return Err(Fault::OutputOutOfRange(value).into()),
                };
                self.output.write_byte(byte)?;
                self.output.flush()?;
            }
            Instr::Input { c } => {
                self.output.flush()?;
                r[c] = match self.input.read_byte()? {
                    Some(byte) => byte as Platter,
                    None => END_OF_INPUT,
                };
            }
            Instr::LoadProgram { b, c } => {
                self.arena.replace_zero(r[b])?;
                return Ok(Flow::Jump(r[c]));
            }
            Instr::Orthography { a, value } => r[a] = value,
        }
        Ok(Flow::Next)
    }
}
