//! Instruction word layout.
//!
//! Standard operators keep the operator number in bits 31..28 and three
//! register fields at the bottom of the word: A = 8..6, B = 5..3, C = 2..0.
//! Orthography keeps its target register in bits 27..25 and a 25-bit
//! immediate in bits 24..0.

use crate::{error::Fault, opcode::Opcode, Platter};
use std::fmt;

pub const IMMEDIATE_MASK: Platter = 0x01FF_FFFF;

/// Register index, always 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reg(u8);

impl Reg {
    pub const fn new(index: u8) -> Self {
        Self(index & 7)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    fn field(word: Platter, shift: u32) -> Self {
        Self(((word >> shift) & 7) as u8)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    CondMove { a: Reg, b: Reg, c: Reg },
    Index { a: Reg, b: Reg, c: Reg },
    Amend { a: Reg, b: Reg, c: Reg },
    Add { a: Reg, b: Reg, c: Reg },
    Mul { a: Reg, b: Reg, c: Reg },
    Div { a: Reg, b: Reg, c: Reg },
    Nand { a: Reg, b: Reg, c: Reg },
    Halt,
    Alloc { b: Reg, c: Reg },
    Abandon { c: Reg },
    Output { c: Reg },
    Input { c: Reg },
    LoadProgram { b: Reg, c: Reg },
    Orthography { a: Reg, value: Platter },
}

/// Decode one platter. Fails only on operator numbers 14 and 15.
pub fn decode(word: Platter) -> Result<Instr, Fault> {
    let op = Opcode::try_from(word >> 28)?;
    let (a, b, c) = (Reg::field(word, 6), Reg::field(word, 3), Reg::field(word, 0));
    Ok(match op {
        Opcode::CondMove => Instr::CondMove { a, b, c },
        Opcode::Index => Instr::Index { a, b, c },
        Opcode::Amend => Instr::Amend { a, b, c },
        Opcode::Add => Instr::Add { a, b, c },
        Opcode::Mul => Instr::Mul { a, b, c },
        Opcode::Div => Instr::Div { a, b, c },
        Opcode::Nand => Instr::Nand { a, b, c },
        Opcode::Halt => Instr::Halt,
        Opcode::Alloc => Instr::Alloc { b, c },
        Opcode::Abandon => Instr::Abandon { c },
        Opcode::Output => Instr::Output { c },
        Opcode::Input => Instr::Input { c },
        Opcode::LoadProgram => Instr::LoadProgram { b, c },
        Opcode::Orthography => Instr::Orthography {
            a: Reg::field(word, 25),
            value: word & IMMEDIATE_MASK,
        },
    })
}

impl Instr {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instr::CondMove { .. } => Opcode::CondMove,
            Instr::Index { .. } => Opcode::Index,
            Instr::Amend { .. } => Opcode::Amend,
            Instr::Add { .. } => Opcode::Add,
            Instr::Mul { .. } => Opcode::Mul,
            Instr::Div { .. } => Opcode::Div,
            Instr::Nand { .. } => Opcode::Nand,
            Instr::Halt => Opcode::Halt,
            Instr::Alloc { .. } => Opcode::Alloc,
            Instr::Abandon { .. } => Opcode::Abandon,
            Instr::Output { .. } => Opcode::Output,
            Instr::Input { .. } => Opcode::Input,
            Instr::LoadProgram { .. } => Opcode::LoadProgram,
            Instr::Orthography { .. } => Opcode::Orthography,
        }
    }

    /// Build the instruction word. Unused register fields encode as zero and
    /// orthography immediates are cut to 25 bits.
    pub fn encode(&self) -> Platter {
        let op = (self.opcode() as Platter) << 28;
        let abc = |a: Reg, b: Reg, c: Reg| {
            ((a.0 as Platter) << 6) | ((b.0 as Platter) << 3) | c.0 as Platter
        };
        let r0 = Reg(0);
        op | match *self {
            Instr::CondMove { a, b, c }
            | Instr::Index { a, b, c }
            | Instr::Amend { a, b, c }
            | Instr::Add { a, b, c }
            | Instr::Mul { a, b, c }
            | Instr::Div { a, b, c }
            | Instr::Nand { a, b, c } => abc(a, b, c),
            Instr::Halt => 0,
            Instr::Alloc { b, c } | Instr::LoadProgram { b, c } => abc(r0, b, c),
            Instr::Abandon { c } | Instr::Output { c } | Instr::Input { c } => abc(r0, r0, c),
            Instr::Orthography { a, value } => ((a.0 as Platter) << 25) | (value & IMMEDIATE_MASK),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.opcode().mnemonic();
        match *self {
            Instr::CondMove { a, b, c }
            | Instr::Index { a, b, c }
            | Instr::Amend { a, b, c }
            | Instr::Add { a, b, c }
            | Instr::Mul { a, b, c }
            | Instr::Div { a, b, c }
            | Instr::Nand { a, b, c } => write!(f, "{m} {a}, {b}, {c}"),
            Instr::Halt => f.write_str(m),
            Instr::Alloc { b, c } | Instr::LoadProgram { b, c } => write!(f, "{m} {b}, {c}"),
            Instr::Abandon { c } | Instr::Output { c } | Instr::Input { c } => write!(f, "{m} {c}"),
            Instr::Orthography { a, value } => write!(f, "{m} {a}, {value}"),
        }
    }
}
