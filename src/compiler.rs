use log::debug;

use crate::{
    chunk::{Chunk, Opcode, MAX_CONSTANTS},
    error::CompileError,
    heap::Heap,
    parser::{Parser, Precedence, Rule},
    scanner::{Kind, Scanner},
    value::Value,
};

/// How deeply prefix expressions and groups may nest before compilation
/// gives up. Each level costs native stack in the recursive descent.
pub const MAX_NESTING: usize = 256;

/// Compiles `source`, a single expression, into `chunk`.
///
/// String literals are interned into `heap` as they're found. On failure the
/// chunk holds whatever was emitted before compilation finished, and must not
/// be run.
///
/// Handles in the chunk only mean something to `heap`, so this stays private
/// to the crate: `VM::interpret` always compiles against the VM's own heap.
pub(crate) fn compile(
    source: &str,
    chunk: &mut Chunk,
    heap: &mut Heap,
) -> Result<(), CompileError> {
    debug!("compiling {} bytes", source.len());

    let mut compiler = Compiler {
        parser: Parser::new(Scanner::new(source)),
        chunk,
        heap,
        depth: 0,
    };

    compiler.parser.advance(); // prime the pump
    compiler.expression();
    compiler.end_compiler();
    compiler
        .parser
        .consume(Kind::Eof, "Expect end of expression.");

    let emitted = compiler.chunk.len();
    let result = compiler.parser.finish();

    match &result {
        Ok(()) => debug!("compiled {} bytes of code", emitted),
        Err(e) => debug!("compile failed with {} error(s)", e.diagnostics.len()),
    }

    result
}

pub struct Compiler<'s, 'c> {
    parser: Parser<'s>,
    chunk: &'c mut Chunk,
    heap: &'c mut Heap,
    depth: usize,
}

impl<'s, 'c> Compiler<'s, 'c> {
    fn end_compiler(&mut self) {
        self.emit_byte(Opcode::Return);
    }

    fn emit_byte(&mut self, byte: impl Into<u8>) {
        let line = self.parser.previous.line;
        self.chunk.write(byte, line);
    }

    fn emit_bytes(&mut self, byte1: impl Into<u8>, byte2: impl Into<u8>) {
        self.emit_byte(byte1);
        self.emit_byte(byte2);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_bytes(Opcode::Constant, index)
    }

    fn make_constant(&mut self, value: impl Into<Value>) -> u8 {
        if self.chunk.constants.len() >= MAX_CONSTANTS {
            self.parser.error("Too many constants in one chunk.");
            return 0;
        }

        // fits, checked above
        self.chunk.add_constant(value.into()) as u8
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        if self.depth >= MAX_NESTING {
            self.parser.error_at_current("Expression nested too deeply.");
            return;
        }

        self.depth += 1;
        self.parse_nested(precedence);
        self.depth -= 1;
    }

    fn parse_nested(&mut self, precedence: Precedence) {
        self.parser.advance();

        let prefix_rule = match Rule::get(self.parser.previous.kind).prefix() {
            Some(rule) => rule,
            None => {
                self.parser.error("Expect expression.");
                return;
            }
        };

        prefix_rule(self);

        while precedence <= Rule::get(self.parser.current.kind).precedence() {
            self.parser.advance();

            // Anything with a precedence has an infix rule.
            if let Some(infix_rule) =
                Rule::get(self.parser.previous.kind).infix()
            {
                infix_rule(self);
            }
        }
    }

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }
}

// Parse rules, referenced from the table in `Rule::get`.
impl<'s, 'c> Compiler<'s, 'c> {
    pub fn number(&mut self) {
        match self.parser.previous.lexeme.parse::<f64>() {
            Ok(number) => self.emit_constant(Value::from(number)),
            Err(_) => self.parser.error("Invalid number literal."),
        }
    }

    pub fn string(&mut self) {
        let lexeme = self.parser.previous.lexeme;
        // trim the quotes
        let body = &lexeme[1..lexeme.len() - 1];

        let string = self.heap.copy_string(body);
        self.emit_constant(Value::from(string))
    }

    pub fn literal(&mut self) {
        match self.parser.previous.kind {
            Kind::False => self.emit_byte(Opcode::False),
            Kind::Nil => self.emit_byte(Opcode::Nil),
            Kind::True => self.emit_byte(Opcode::True),
            _ => {}
        }
    }

    pub fn grouping(&mut self) {
        self.expression();
        self.parser
            .consume(Kind::RightParen, "Expect ')' after expression.");
    }

    pub fn unary(&mut self) {
        let operator_kind = self.parser.previous.kind;

        self.parse_precedence(Precedence::Unary);

        match operator_kind {
            Kind::Bang => self.emit_byte(Opcode::Not),
            Kind::Minus => self.emit_byte(Opcode::Negate),
            _ => {}
        }
    }

    pub fn binary(&mut self) {
        let operator_kind = self.parser.previous.kind;
        let rule = Rule::get(operator_kind);

        self.parse_precedence(rule.precedence().next());

        {
            use Kind as K;
            use Opcode::*;
            match operator_kind {
                K::BangEqual => self.emit_bytes(Equal, Not),
                K::EqualEqual => self.emit_byte(Equal),
                K::Greater => self.emit_byte(Greater),
                K::GreaterEqual => self.emit_bytes(Less, Not),
                K::Less => self.emit_byte(Less),
                K::LessEqual => self.emit_bytes(Greater, Not),
                K::Plus => self.emit_byte(Add),
                K::Minus => self.emit_byte(Sub),
                K::Star => self.emit_byte(Mul),
                K::Slash => self.emit_byte(Div),
                _ => {}
            }
        }
    }
}
