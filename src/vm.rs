use std::{
    convert::TryFrom,
    io::{self, Stderr, Stdout, Write},
};

use log::{debug, log_enabled, trace, Level};

use crate::{
    chunk::{Chunk, Opcode},
    compiler::compile,
    error::{InterpretError, RuntimeError, RuntimeErrorKind},
    heap::Heap,
    value::{TypeError, Value},
};

/// Default operand stack capacity.
pub const STACK_MAX: usize = 256;

/// Runtime settings for a [`VM`].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Operand stack capacity. Pushing past it is a runtime error.
    pub stack_max: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            stack_max: STACK_MAX,
        }
    }
}

impl From<TypeError> for RuntimeErrorKind {
    fn from(e: TypeError) -> Self {
        match e {
            TypeError::Number => RuntimeErrorKind::OperandNotNumber,
            TypeError::Numbers => RuntimeErrorKind::OperandsNotNumbers,
            TypeError::AddMismatch => RuntimeErrorKind::AddMismatch,
        }
    }
}

/// A stack machine that compiles and runs scripts.
///
/// Each VM owns its own heap and intern table, so strings are only canonical
/// within one VM. Everything it allocated is freed when it's dropped.
///
/// Printed values go to `out` and error reports to `err`.
pub struct VM<W = Stdout, E = Stderr> {
    stack: Vec<Value>,
    stack_max: usize,
    /// Offset of the next byte to read in the chunk being run.
    ip: usize,
    heap: Heap,
    out: W,
    err: E,
}

impl VM {
    pub fn new() -> VM {
        VM::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> VM {
        VM::with_output(io::stdout(), io::stderr(), config)
    }
}

impl Default for VM {
    fn default() -> VM {
        VM::new()
    }
}

impl<W: Write, E: Write> VM<W, E> {
    pub fn with_output(out: W, err: E, config: Config) -> VM<W, E> {
        VM {
            stack: Vec::with_capacity(config.stack_max),
            stack_max: config.stack_max,
            ip: 0,
            heap: Heap::new(),
            out,
            err,
        }
    }

    /// Compiles `source` into a fresh chunk and, if that worked, runs it.
    ///
    /// Errors are written to the error stream and also returned.
    pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
        let mut chunk = Chunk::new();

        if let Err(e) = compile(source, &mut chunk, &mut self.heap) {
            // nowhere left to report a failure to report
            let _ = writeln!(self.err, "{}", e);
            return Err(e.into());
        }

        let result = self.run(&chunk);

        match &result {
            Ok(()) => debug!("interpret ok"),
            Err(e) => {
                debug!("interpret failed at line {}: {}", e.line, e.kind);
                let _ = writeln!(self.err, "{}", e);
            }
        }

        result.map_err(InterpretError::from)
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn errors(&self) -> &E {
        &self.err
    }

    /// Runs `chunk` from the start. On error the stack is emptied.
    ///
    /// The chunk must have been compiled against this VM's heap.
    pub(crate) fn run(&mut self, chunk: &Chunk) -> Result<(), RuntimeError> {
        self.ip = 0;

        self.execute(chunk).map_err(|kind| {
            // `ip` is already past the byte that failed.
            let offset = self.ip.saturating_sub(1);
            let line = chunk.lines.get(offset).copied().unwrap_or(0);
            self.reset_stack();
            RuntimeError { kind, line }
        })
    }

    fn execute(&mut self, chunk: &Chunk) -> Result<(), RuntimeErrorKind> {
        loop {
            if cfg!(feature = "debug_trace") && log_enabled!(Level::Trace) {
                self.trace_instruction(chunk);
            }

            let byte = self.read_byte(chunk)?;
            let instruction = Opcode::try_from(byte)
                .map_err(RuntimeErrorKind::UnknownOpcode)?;

            match instruction {
                Opcode::Constant => {
                    let constant = self.read_constant(chunk)?;
                    self.push(constant)?;
                }

                Opcode::Nil => self.push(Value::Nil)?,
                Opcode::True => self.push(Value::from(true))?,
                Opcode::False => self.push(Value::from(false))?,

                Opcode::Pop => {
                    self.pop()?;
                }

                Opcode::Not => {
                    let value = self.pop()?;
                    self.push(value.is_falsey().into())?;
                }

                Opcode::Negate => {
                    let value = self.pop()?.negate()?;
                    self.push(value)?;
                }

                Opcode::Add => {
                    let r = self.pop()?;
                    let l = self.pop()?;
                    let sum = l.add(r, &mut self.heap)?;
                    self.push(sum)?;
                }

                Opcode::Sub => self.binary_op(|l, r| l - r)?,
                Opcode::Mul => self.binary_op(|l, r| l * r)?,
                Opcode::Div => self.binary_op(|l, r| l / r)?,
                Opcode::Greater => self.binary_op(|l, r| l > r)?,
                Opcode::Less => self.binary_op(|l, r| l < r)?,

                Opcode::Equal => {
                    let r = self.pop()?;
                    let l = self.pop()?;
                    self.push(Value::from(l == r))?;
                }

                Opcode::Print => {
                    let value = self.pop()?;
                    self.print(value)?;
                }

                Opcode::Return => {
                    let value = self.pop()?;
                    self.print(value)?;
                    return Ok(());
                }

                op @ (Opcode::DefineGlobal | Opcode::GetGlobal) => {
                    return Err(RuntimeErrorKind::Unsupported(op));
                }
            }
        }
    }

    /// Pops two numbers, applies `op`, and pushes the result.
    fn binary_op<T: Into<Value>>(
        &mut self,
        op: impl FnOnce(f64, f64) -> T,
    ) -> Result<(), RuntimeErrorKind> {
        let r = self.pop()?;
        let l = self.pop()?;
        let value = l.numeric(r, op)?;
        self.push(value)
    }

    fn print(&mut self, value: Value) -> Result<(), RuntimeErrorKind> {
        writeln!(self.out, "{}", value.display(&self.heap))?;
        Ok(())
    }

    fn reset_stack(&mut self) {
        self.stack.clear();
    }

    fn push(&mut self, value: Value) -> Result<(), RuntimeErrorKind> {
        if self.stack.len() >= self.stack_max {
            return Err(RuntimeErrorKind::StackOverflow);
        }

        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, RuntimeErrorKind> {
        self.stack.pop().ok_or(RuntimeErrorKind::StackUnderflow)
    }

    fn read_byte(&mut self, chunk: &Chunk) -> Result<u8, RuntimeErrorKind> {
        let byte = chunk
            .code
            .get(self.ip)
            .copied()
            .ok_or(RuntimeErrorKind::UnexpectedEnd)?;
        self.ip += 1;
        Ok(byte)
    }

    fn read_constant(
        &mut self,
        chunk: &Chunk,
    ) -> Result<Value, RuntimeErrorKind> {
        let index = self.read_byte(chunk)? as usize;
        chunk
            .constants
            .get(index)
            .copied()
            .ok_or(RuntimeErrorKind::BadConstant(index))
    }

    fn trace_instruction(&self, chunk: &Chunk) {
        let op = chunk
            .code
            .get(self.ip)
            .and_then(|byte| Opcode::try_from(*byte).ok())
            .map(Opcode::to_str)
            .unwrap_or("<invalid>");

        let stack = self
            .stack
            .iter()
            .map(|v| v.display(&self.heap).to_string())
            .collect::<Vec<_>>()
            .join(", ");

        trace!("ip {:4} {:<16} stack: [{}]", self.ip, op, stack);
    }
}
