#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    start: &'a str,
    current: &'a str,
    line: usize,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            start: input,
            current: input,
            line: 1,
            done: false,
        }
    }

    /// Scans the next token. Once the input runs out this keeps returning
    /// `Eof` tokens.
    pub fn token(&mut self) -> Token<'a> {
        use Kind::*;

        self.skip_whitespace();
        self.start = self.current;

        if self.is_empty() {
            return self.make(Eof);
        }

        let c = self.advance();

        match c {
            // Single-character tokens
            Some('(') => self.make(LeftParen),
            Some(')') => self.make(RightParen),
            Some('{') => self.make(LeftBrace),
            Some('}') => self.make(RightBrace),
            Some(';') => self.make(Semicolon),
            Some(',') => self.make(Comma),
            Some('.') => self.make(Dot),
            Some('-') => self.make(Minus),
            Some('+') => self.make(Plus),
            Some('/') => self.make(Slash), // comments in skip_whitespace above
            Some('*') => self.make(Star),

            // One or two character tokens.
            Some('!') if self.matches('=') => self.make(BangEqual),
            Some('!') => self.make(Bang),

            Some('=') if self.matches('=') => self.make(EqualEqual),
            Some('=') => self.make(Equal),

            Some('<') if self.matches('=') => self.make(LessEqual),
            Some('<') => self.make(Less),

            Some('>') if self.matches('=') => self.make(GreaterEqual),
            Some('>') => self.make(Greater),

            // Literals
            Some('"') => self.string(),
            Some(c) if is_alpha(c) => self.identifier(),
            Some(c) if c.is_ascii_digit() => self.number(),

            // Anything else is unexpected.
            _ => self.error("Unexpected character."),
        }
    }

    fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    fn peek(&self) -> Option<char> {
        // A null byte can show up mid-input, so the end is `None` rather than
        // a sentinel character.
        self.current.chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        self.current.chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let mut chars = self.current.chars();
        let c = chars.next();
        self.current = chars.as_str();
        c
    }

    /// If the next character is `wanted`, advances past it and returns
    /// `true`.
    fn matches(&mut self, wanted: char) -> bool {
        match self.peek() {
            Some(c) if c == wanted => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_empty() {
            match self.peek() {
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                }

                Some('/') if self.peek_next() == Some('/') => {
                    // The newline itself is left for the outer loop, which
                    // counts it.
                    while self.peek() != Some('\n') && self.peek() != None {
                        self.advance();
                    }
                }

                Some(c) if c.is_whitespace() => {
                    self.advance();
                }

                _ => return,
            }
        }
    }

    fn string(&mut self) -> Token<'a> {
        while self.peek() != Some('"') && self.peek() != None {
            if self.peek() == Some('\n') {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_empty() {
            self.error("Unterminated string.")
        } else {
            self.advance(); // closing quote
            self.make(Kind::String)
        }
    }

    fn identifier(&mut self) -> Token<'a> {
        while let Some(c) = self.peek() {
            if is_alpha(c) || c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        self.make(self.identifier_kind())
    }

    fn peek_digit(&self) -> bool {
        matches!(self.peek(), Some(c) if c.is_ascii_digit())
    }

    fn number(&mut self) -> Token<'a> {
        while self.peek_digit() {
            self.advance();
        }

        let next_is_dot = self.peek() == Some('.');
        let more_digits = matches!(self.peek_next(), Some(c) if c.is_ascii_digit());

        if next_is_dot && more_digits {
            // consume the '.'
            self.advance();

            while self.peek_digit() {
                self.advance();
            }
        }

        self.make(Kind::Number)
    }

    fn lexeme(&self) -> &'a str {
        let length = self.start.len() - self.current.len();
        &self.start[..length]
    }

    /// Keywords are found by switching on the first letter (and the second,
    /// for `f` and `t`) and then comparing the rest, instead of hashing.
    fn identifier_kind(&self) -> Kind {
        let lexeme = self.lexeme().as_bytes();

        match lexeme {
            [b'a', rest @ ..] => keyword(rest, b"nd", Kind::And),
            [b'c', rest @ ..] => keyword(rest, b"lass", Kind::Class),
            [b'e', rest @ ..] => keyword(rest, b"lse", Kind::Else),
            [b'f', b'a', rest @ ..] => keyword(rest, b"lse", Kind::False),
            [b'f', b'o', rest @ ..] => keyword(rest, b"r", Kind::For),
            [b'f', b'u', rest @ ..] => keyword(rest, b"n", Kind::Fun),
            [b'i', rest @ ..] => keyword(rest, b"f", Kind::If),
            [b'n', rest @ ..] => keyword(rest, b"il", Kind::Nil),
            [b'o', rest @ ..] => keyword(rest, b"r", Kind::Or),
            [b'p', rest @ ..] => keyword(rest, b"rint", Kind::Print),
            [b'r', rest @ ..] => keyword(rest, b"eturn", Kind::Return),
            [b's', rest @ ..] => keyword(rest, b"uper", Kind::Super),
            [b't', b'h', rest @ ..] => keyword(rest, b"is", Kind::This),
            [b't', b'r', rest @ ..] => keyword(rest, b"ue", Kind::True),
            [b'v', rest @ ..] => keyword(rest, b"ar", Kind::Var),
            [b'w', rest @ ..] => keyword(rest, b"hile", Kind::While),
            _ => Kind::Identifier,
        }
    }

    fn error(&self, message: &'static str) -> Token<'a> {
        Token {
            kind: Kind::Error,
            lexeme: message,
            line: self.line,
        }
    }

    fn make(&self, kind: Kind) -> Token<'a> {
        Token {
            kind,
            lexeme: self.lexeme(),
            line: self.line,
        }
    }
}

/// Yields every token up to and including the first `Eof`.
impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }

        let token = self.token();
        self.done = token.kind == Kind::Eof;
        Some(token)
    }
}

fn keyword(rest: &[u8], expected: &[u8], kind: Kind) -> Kind {
    if rest == expected {
        kind
    } else {
        Kind::Identifier
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    // 'type' is a reserved word.
    pub kind: Kind,
    /// The token's text, borrowed from the source. For `Kind::Error` tokens
    /// this is the error message instead.
    pub lexeme: &'a str,
    pub line: usize,
}

impl<'a> Token<'a> {
    pub const fn fake() -> Token<'a> {
        Token {
            kind: Kind::Error,
            lexeme: "<error>",
            line: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum Kind {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Error,
    Eof,
}

// Not the same as `is_ascii_alphabetic`, since we want '_' too.
fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
