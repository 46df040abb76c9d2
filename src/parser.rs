use crate::{
    compiler::Compiler,
    error::{CompileError, Diagnostic, Location},
    scanner::{Kind, Scanner, Token},
};

#[derive(Debug)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    pub current: Token<'a>,
    pub previous: Token<'a>,
    pub had_error: bool,
    pub panic_mode: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(scanner: Scanner<'a>) -> Parser<'a> {
        Parser {
            scanner,
            current: Token::fake(),
            previous: Token::fake(),
            had_error: false,
            panic_mode: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn advance(&mut self) {
        self.previous = self.current;

        loop {
            self.current = self.scanner.token();

            if self.current.kind != Kind::Error {
                break;
            }

            self.error_at_current(self.current.lexeme);
        }
    }

    pub fn consume(&mut self, kind: Kind, message: &str) {
        if self.current.kind == kind {
            self.advance();
        } else {
            self.error_at_current(message)
        }
    }

    pub fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message)
    }

    pub fn error(&mut self, message: &str) {
        self.error_at(self.previous, message)
    }

    fn error_at(&mut self, token: Token<'a>, message: &str) {
        if self.panic_mode {
            return;
        }

        self.panic_mode = true;
        self.had_error = true;

        let location = match token.kind {
            Kind::Eof => Location::End,
            Kind::Error => Location::Unknown,
            _ => Location::At(token.lexeme.to_owned()),
        };

        self.diagnostics.push(Diagnostic {
            line: token.line,
            location,
            message: message.to_owned(),
        });
    }

    /// Ends parsing, failing if anything was reported along the way.
    pub fn finish(self) -> Result<(), CompileError> {
        if self.had_error {
            Err(CompileError {
                diagnostics: self.diagnostics,
            })
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum Precedence {
    None = 0,
    Assignment = 1,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    pub fn next(self) -> Precedence {
        use Precedence::*;
        match self {
            None => Assignment,
            Assignment => Or,
            Or => And,
            And => Equality,
            Equality => Comparison,
            Comparison => Term,
            Term => Factor,
            Factor => Unary,
            Unary => Call,
            Call => Primary,
            Primary => Primary,
        }
    }
}

pub type ParseFn<'s, 'c> = Option<fn(&mut Compiler<'s, 'c>)>;

#[derive(Clone, Copy)]
pub struct Rule<'s, 'c>(
    pub ParseFn<'s, 'c>,
    pub ParseFn<'s, 'c>,
    pub Precedence,
);

impl<'s, 'c> Rule<'s, 'c> {
    pub fn prefix(&self) -> ParseFn<'s, 'c> {
        self.0
    }

    pub fn infix(&self) -> ParseFn<'s, 'c> {
        self.1
    }

    pub fn precedence(&self) -> Precedence {
        self.2
    }

    pub fn get(kind: Kind) -> Self {
        use crate::compiler::Compiler as C;
        use crate::parser::Precedence::*;
        use crate::scanner::Kind as K;
        use std::option::Option::{None as N, Some as S};

        #[rustfmt::skip]
        let rule = match kind {
            // Single-character tokens.
            K::LeftParen    => Rule(S(C::grouping), N,            None),
            K::RightParen   => Rule(N,              N,            None),
            K::LeftBrace    => Rule(N,              N,            None),
            K::RightBrace   => Rule(N,              N,            None),
            K::Comma        => Rule(N,              N,            None),
            K::Dot          => Rule(N,              N,            None),
            K::Minus        => Rule(S(C::unary),    S(C::binary), Term),
            K::Plus         => Rule(N,              S(C::binary), Term),
            K::Semicolon    => Rule(N,              N,            None),
            K::Slash        => Rule(N,              S(C::binary), Factor),
            K::Star         => Rule(N,              S(C::binary), Factor),

            // One or two character tokens.
            K::Bang         => Rule(S(C::unary),    N,            None),
            K::BangEqual    => Rule(N,              S(C::binary), Equality),
            K::Equal        => Rule(N,              N,            None),
            K::EqualEqual   => Rule(N,              S(C::binary), Equality),
            K::Greater      => Rule(N,              S(C::binary), Comparison),
            K::GreaterEqual => Rule(N,              S(C::binary), Comparison),
            K::Less         => Rule(N,              S(C::binary), Comparison),
            K::LessEqual    => Rule(N,              S(C::binary), Comparison),

            // Literals.
            K::Identifier   => Rule(N,              N,            None),
            K::String       => Rule(S(C::string),   N,            None),
            K::Number       => Rule(S(C::number),   N,            None),

            // Keywords.
            K::False        => Rule(S(C::literal),  N,            None),
            K::Nil          => Rule(S(C::literal),  N,            None),
            K::True         => Rule(S(C::literal),  N,            None),
            K::And | K::Class | K::Else | K::For | K::Fun | K::If | K::Or
            | K::Print | K::Return | K::Super | K::This | K::Var | K::While
                            => Rule(N,              N,            None),

            K::Error        => Rule(N,              N,            None),
            K::Eof          => Rule(N,              N,            None),
        };

        rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_climbs() {
        assert!(Precedence::Term.next() == Precedence::Factor);
        assert!(Precedence::Factor > Precedence::Term);
        assert!(Precedence::Primary.next() == Precedence::Primary);
    }

    #[test]
    fn panic_mode_suppresses_cascades() {
        let mut parser = Parser::new(Scanner::new("@ # 1"));
        parser.advance();
        parser.advance();
        parser.error("Something else.");

        let error = parser.finish().unwrap_err();
        assert_eq!(error.diagnostics.len(), 1);
        assert_eq!(error.diagnostics[0].message, "Unexpected character.");
    }

    #[test]
    fn clean_parse_succeeds() {
        let mut parser = Parser::new(Scanner::new("1"));
        parser.advance();
        parser.consume(Kind::Number, "Expect number.");
        parser.consume(Kind::Eof, "Expect end.");
        assert!(parser.finish().is_ok());
    }
}
