//! Error types for compiling and running scripts.

use std::{
    fmt::{self, Display, Formatter},
    io,
};

use thiserror::Error;

use crate::chunk::Opcode;

/// The result of a failed [`VM::interpret`][crate::vm::VM::interpret].
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

/// Every error reported while compiling one source. Only the first error of
/// each cascade is recorded.
#[derive(Debug, Error)]
pub struct CompileError {
    pub diagnostics: Vec<Diagnostic>,
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

/// Where on the line a compile error happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// At a token, by its lexeme.
    At(String),
    End,
    /// Scanner errors have no lexeme worth showing.
    Unknown,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error", self.line)?;

        match &self.location {
            Location::At(lexeme) => write!(f, " at '{}'", lexeme)?,
            Location::End => write!(f, " at end")?,
            Location::Unknown => {}
        }

        write!(f, ": {}", self.message)
    }
}

#[derive(Debug, Error)]
#[error("{kind}\n[line {line}] in script")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: usize,
}

#[derive(Debug, Error)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    OperandNotNumber,

    #[error("Operands must be numbers.")]
    OperandsNotNumbers,

    #[error("Operands must be two numbers or two strings.")]
    AddMismatch,

    #[error("Stack overflow.")]
    StackOverflow,

    #[error("Stack underflow.")]
    StackUnderflow,

    #[error("Unsupported instruction.")]
    Unsupported(Opcode),

    #[error("Unknown opcode {0}.")]
    UnknownOpcode(u8),

    #[error("Constant {0} is out of range.")]
    BadConstant(usize),

    #[error("Ran off the end of the bytecode.")]
    UnexpectedEnd,

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}
