use crate::error::Fault;

/// Operator number, bits 31..28 of every instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    CondMove = 0,
    Index = 1,
    Amend = 2,
    Add = 3,
    Mul = 4,
    Div = 5,
    Nand = 6,
    Halt = 7,
    Alloc = 8,
    Abandon = 9,
    Output = 10,
    Input = 11,
    LoadProgram = 12,
    Orthography = 13,
}

impl Opcode {
    pub const ALL: [Opcode; 14] = [
        Opcode::CondMove,
        Opcode::Index,
        Opcode::Amend,
        Opcode::Add,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Nand,
        Opcode::Halt,
        Opcode::Alloc,
        Opcode::Abandon,
        Opcode::Output,
        Opcode::Input,
        Opcode::LoadProgram,
        Opcode::Orthography,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::CondMove => "cmov",
            Opcode::Index => "index",
            Opcode::Amend => "amend",
            Opcode::Add => "add",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Nand => "nand",
            Opcode::Halt => "halt",
            Opcode::Alloc => "alloc",
            Opcode::Abandon => "abandon",
            Opcode::Output => "out",
            Opcode::Input => "in",
            Opcode::LoadProgram => "load",
            Opcode::Orthography => "ortho",
        }
    }
}

impl TryFrom<u32> for Opcode {
    type Error = Fault;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Opcode::ALL
            .get(n as usize)
            .copied()
            .ok_or(Fault::InvalidOpcode(n))
    }
}
