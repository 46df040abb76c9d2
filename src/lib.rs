//! A bytecode interpreter for Lox expressions.
//!
//! Source is scanned and compiled in a single pass into a [`Chunk`], which
//! the [`VM`] then runs on its operand stack.
//!
//! ```
//! use rlox::{Config, VM};
//!
//! let mut vm = VM::with_output(Vec::new(), Vec::new(), Config::default());
//! vm.interpret("(1 + 2) * 3").unwrap();
//! assert_eq!(vm.output(), b"9\n");
//! ```

pub mod chunk;
mod compiler;
pub mod error;
pub mod heap;
pub mod object;
mod parser;
pub mod scanner;
pub mod string;
pub mod table;
pub mod value;
pub mod vm;

pub use chunk::{Chunk, Opcode};
pub use error::{CompileError, InterpretError, RuntimeError, RuntimeErrorKind};
pub use heap::Heap;
pub use value::Value;
pub use vm::{Config, VM};
