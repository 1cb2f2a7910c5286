//! Tokenizer for template text.
//!
//! Text outside the delimiters is passed through as [`Token::Text`]. Inside
//! an action the input is split into identifiers, field chains, literals
//! and punctuation until the right delimiter is reached.

use crate::error::{ParseError, ParseErrorKind};

/// Left delimiter used when none is configured.
pub const DEFAULT_LEFT_DELIM: &str = "{{";

/// Right delimiter used when none is configured.
pub const DEFAULT_RIGHT_DELIM: &str = "}}";

/// The pair of markers that open and close an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub left: String,
    pub right: String,
}

impl Delimiters {
    pub fn new<L: Into<String>, R: Into<String>>(left: L, right: R) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new(DEFAULT_LEFT_DELIM, DEFAULT_RIGHT_DELIM)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    LeftDelim,
    RightDelim,
    Ident(&'a str),
    /// `.a.b` relative to dot.
    Field(Vec<&'a str>),
    /// A lone `.`.
    Dot,
    /// `$name` followed by an optional field chain.
    Variable(&'a str, Vec<&'a str>),
    Str(String),
    Number(&'a str),
    Bool(bool),
    Nil,
    LeftParen,
    RightParen,
    Pipe,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned<'a> {
    pub token: Token<'a>,
    pub line: usize,
}

pub(crate) struct Lexer<'a, 'd> {
    name: &'d str,
    input: &'a str,
    delims: &'d Delimiters,
    pos: usize,
    line: usize,
    tokens: Vec<Spanned<'a>>,
}

impl<'a, 'd> Lexer<'a, 'd> {
    pub fn new(name: &'d str, input: &'a str, delims: &'d Delimiters) -> Self {
        Self {
            name,
            input,
            delims,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned<'a>>, ParseError> {
        if self.delims.left.is_empty() || self.delims.right.is_empty() {
            return Err(self.error(ParseErrorKind::EmptyDelimiter));
        }

        let input = self.input;
        while self.pos < input.len() {
            let rest = &input[self.pos..];
            match rest.find(self.delims.left.as_str()) {
                None => {
                    self.push(Token::Text(rest));
                    self.advance(rest.len());
                }
                Some(offset) => {
                    if offset > 0 {
                        self.push(Token::Text(&rest[..offset]));
                        self.advance(offset);
                    }
                    self.advance(self.delims.left.len());
                    if input[self.pos..].starts_with("/*") {
                        self.lex_comment()?;
                    } else {
                        self.push(Token::LeftDelim);
                        self.lex_action()?;
                    }
                }
            }
        }

        Ok(self.tokens)
    }

    fn lex_comment(&mut self) -> Result<(), ParseError> {
        let close = format!("*/{}", self.delims.right);
        match self.input[self.pos..].find(&close) {
            Some(end) => {
                self.advance(end + close.len());
                Ok(())
            }
            None => Err(self.error(ParseErrorKind::UnclosedComment)),
        }
    }

    fn lex_action(&mut self) -> Result<(), ParseError> {
        let input = self.input;
        loop {
            let rest = &input[self.pos..];
            if rest.starts_with(self.delims.right.as_str()) {
                self.push(Token::RightDelim);
                self.advance(self.delims.right.len());
                return Ok(());
            }

            let mut chars = rest.chars();
            let Some(c) = chars.next() else {
                return Err(self.error(ParseErrorKind::UnclosedAction));
            };
            let next = chars.next();

            match c {
                c if c.is_whitespace() => self.advance(c.len_utf8()),
                '"' => self.lex_quoted()?,
                '`' => self.lex_raw()?,
                '(' => self.single(Token::LeftParen),
                ')' => self.single(Token::RightParen),
                '|' => self.single(Token::Pipe),
                '.' => {
                    if next.is_some_and(is_ident_start) {
                        let fields = self.read_fields();
                        self.push(Token::Field(fields));
                    } else {
                        self.single(Token::Dot);
                    }
                }
                '$' => {
                    let start = self.pos;
                    self.advance(1);
                    self.read_ident();
                    let name = &input[start..self.pos];
                    let fields = self.read_fields();
                    self.push(Token::Variable(name, fields));
                }
                '0'..='9' => self.lex_number()?,
                '-' | '+' if next.is_some_and(|n| n.is_ascii_digit()) => self.lex_number()?,
                c if is_ident_start(c) => {
                    let ident = self.read_ident();
                    let token = match ident {
                        "true" => Token::Bool(true),
                        "false" => Token::Bool(false),
                        "nil" => Token::Nil,
                        _ => Token::Ident(ident),
                    };
                    self.push(token);
                }
                other => return Err(self.error(ParseErrorKind::UnexpectedChar(other))),
            }
        }
    }

    fn lex_quoted(&mut self) -> Result<(), ParseError> {
        let input = self.input;
        let rest = &input[self.pos..];
        let mut value = String::new();
        let mut chars = rest.char_indices().skip(1);

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.push(Token::Str(value));
                    self.advance(i + 1);
                    return Ok(());
                }
                '\n' => break,
                '\\' => {
                    let escaped = match chars.next() {
                        Some((_, 'n')) => '\n',
                        Some((_, 't')) => '\t',
                        Some((_, 'r')) => '\r',
                        Some((_, '\\')) => '\\',
                        Some((_, '"')) => '"',
                        Some((_, '\'')) => '\'',
                        Some((_, other)) => {
                            return Err(self.error(ParseErrorKind::BadEscape(other)))
                        }
                        None => break,
                    };
                    value.push(escaped);
                }
                c => value.push(c),
            }
        }

        Err(self.error(ParseErrorKind::UnterminatedString))
    }

    fn lex_raw(&mut self) -> Result<(), ParseError> {
        let input = self.input;
        let body = &input[self.pos + 1..];
        match body.find('`') {
            Some(end) => {
                self.push(Token::Str(body[..end].to_string()));
                self.advance(end + 2);
                Ok(())
            }
            None => Err(self.error(ParseErrorKind::UnterminatedString)),
        }
    }

    fn lex_number(&mut self) -> Result<(), ParseError> {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;
        let mut end = start;

        if matches!(bytes[end], b'-' | b'+') {
            end += 1;
        }

        // Radix-prefixed integers; the digits are checked by the parser.
        if bytes[end] == b'0'
            && matches!(bytes.get(end + 1), Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B'))
        {
            end += 2;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            self.push(Token::Number(&input[start..end]));
            self.advance(end - start);
            return Ok(());
        }

        end = skip_digits(bytes, end);
        if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
            end = skip_digits(bytes, end + 1);
        }
        if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut exp = end + 1;
            if exp < bytes.len() && matches!(bytes[exp], b'-' | b'+') {
                exp += 1;
            }
            if exp < bytes.len() && bytes[exp].is_ascii_digit() {
                end = skip_digits(bytes, exp);
            }
        }

        // `12abc` is one malformed token, not a number followed by a name.
        let mut bad_end = end;
        while bad_end < bytes.len()
            && (bytes[bad_end].is_ascii_alphanumeric() || matches!(bytes[bad_end], b'_' | b'.'))
        {
            bad_end += 1;
        }
        if bad_end > end {
            return Err(self.error(ParseErrorKind::BadNumber(input[start..bad_end].to_string())));
        }

        self.push(Token::Number(&input[start..end]));
        self.advance(end - start);
        Ok(())
    }

    fn read_ident(&mut self) -> &'a str {
        let input = self.input;
        let rest = &input[self.pos..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_char(c))
            .map_or(rest.len(), |(i, _)| i);
        self.advance(len);
        &rest[..len]
    }

    fn read_fields(&mut self) -> Vec<&'a str> {
        let mut fields = Vec::new();
        loop {
            let input = self.input;
            let mut chars = input[self.pos..].chars();
            if chars.next() != Some('.') || !chars.next().is_some_and(is_ident_start) {
                return fields;
            }
            self.advance(1);
            fields.push(self.read_ident());
        }
    }

    fn single(&mut self, token: Token<'a>) {
        self.push(token);
        self.advance(1);
    }

    fn push(&mut self, token: Token<'a>) {
        self.tokens.push(Spanned {
            token,
            line: self.line,
        });
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.input[self.pos..self.pos + len];
        self.line += consumed.matches('\n').count();
        self.pos += len;
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.name, self.line, kind)
    }
}

fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
