use std::convert::TryFrom;

use crate::value::Value;

/// Constant operands are one byte wide.
pub const MAX_CONSTANTS: usize = u8::MAX as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum Opcode {
    Constant,
    Negate,
    Print,
    Pop,
    Nil,
    True,
    False,
    Add,
    Sub,
    Mul,
    Div,
    Not,
    Equal,
    Greater,
    Less,
    Return,
    // Reserved for globals. The compiler never emits these.
    DefineGlobal,
    GetGlobal,
}

impl Opcode {
    pub fn to_str(self) -> &'static str {
        match self {
            Opcode::Constant => "Constant",
            Opcode::Negate => "Negate",
            Opcode::Print => "Print",
            Opcode::Pop => "Pop",
            Opcode::Nil => "Nil",
            Opcode::True => "True",
            Opcode::False => "False",
            Opcode::Add => "Add",
            Opcode::Sub => "Sub",
            Opcode::Mul => "Mul",
            Opcode::Div => "Div",
            Opcode::Not => "Not",
            Opcode::Equal => "Equal",
            Opcode::Greater => "Greater",
            Opcode::Less => "Less",
            Opcode::Return => "Return",
            Opcode::DefineGlobal => "DefineGlobal",
            Opcode::GetGlobal => "GetGlobal",
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as _
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Constant),
            1 => Ok(Opcode::Negate),
            2 => Ok(Opcode::Print),
            3 => Ok(Opcode::Pop),
            4 => Ok(Opcode::Nil),
            5 => Ok(Opcode::True),
            6 => Ok(Opcode::False),
            7 => Ok(Opcode::Add),
            8 => Ok(Opcode::Sub),
            9 => Ok(Opcode::Mul),
            10 => Ok(Opcode::Div),
            11 => Ok(Opcode::Not),
            12 => Ok(Opcode::Equal),
            13 => Ok(Opcode::Greater),
            14 => Ok(Opcode::Less),
            15 => Ok(Opcode::Return),
            16 => Ok(Opcode::DefineGlobal),
            17 => Ok(Opcode::GetGlobal),
            n => Err(n),
        }
    }
}

/// A unit of bytecode. `lines` has one entry per byte of `code`.
#[derive(Debug, Default)]
pub struct Chunk {
    pub code: Vec<u8>,
    pub lines: Vec<usize>,
    pub constants: Vec<Value>,
}

impl Chunk {
    pub fn new() -> Chunk {
        Chunk::default()
    }

    pub fn write(&mut self, byte: impl Into<u8>, line: usize) {
        self.code.push(byte.into());
        self.lines.push(line);
    }

    /// Appends `value` to the constant pool and returns its index. The index
    /// may not fit in an operand; checking that is the compiler's job.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
