//! Parser turning tokens into a node tree.

use std::iter::Peekable;
use std::vec::IntoIter;

use serde_json::{Number, Value};

use crate::error::{ParseError, ParseErrorKind};
use crate::func::FuncMap;
use crate::lex::{Delimiters, Spanned, Token};

const KEYWORDS: [&str; 5] = ["if", "else", "end", "range", "with"];

/// Deepest nesting of control blocks, `else if` arms and parenthesized
/// pipelines a template may use.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
    If(Branch),
    With(Branch),
    Range(Branch),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Branch {
    pub pipeline: Pipeline,
    pub body: Vec<Node>,
    pub otherwise: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pipeline {
    pub line: usize,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Command {
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Function(String),
    Field(Vec<String>),
    Dot,
    Root(Vec<String>),
    Literal(Value),
    Sub(Pipeline),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    If,
    With,
    Range,
}

impl Control {
    fn keyword(self) -> &'static str {
        match self {
            Control::If => "if",
            Control::With => "with",
            Control::Range => "range",
        }
    }
}

/// How a list of nodes ended.
enum Terminator {
    End,
    Else,
    ElseIf(Pipeline),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Close {
    Delim,
    Paren,
}

pub(crate) struct Parser<'a, 'p, C> {
    name: &'p str,
    tokens: Peekable<IntoIter<Spanned<'a>>>,
    line: usize,
    funcs: &'p FuncMap<C>,
    delims: &'p Delimiters,
    depth: usize,
}

impl<'a, 'p, C> Parser<'a, 'p, C> {
    pub fn new(
        name: &'p str,
        tokens: Vec<Spanned<'a>>,
        funcs: &'p FuncMap<C>,
        delims: &'p Delimiters,
    ) -> Self {
        Self {
            name,
            tokens: tokens.into_iter().peekable(),
            line: 1,
            funcs,
            delims,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<Vec<Node>, ParseError> {
        let (nodes, terminator) = self.parse_list()?;
        match terminator {
            Terminator::Eof => Ok(nodes),
            Terminator::End => Err(self.unexpected_keyword("end")),
            Terminator::Else | Terminator::ElseIf(_) => Err(self.unexpected_keyword("else")),
        }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), ParseError> {
        let mut nodes = Vec::new();
        loop {
            let Some(spanned) = self.next() else {
                return Ok((nodes, Terminator::Eof));
            };
            match spanned.token {
                Token::Text(text) => nodes.push(Node::Text(text.to_string())),
                Token::LeftDelim => match self.peek() {
                    Some(Token::Ident("end")) => {
                        self.next();
                        self.expect_right_delim()?;
                        return Ok((nodes, Terminator::End));
                    }
                    Some(Token::Ident("else")) => {
                        self.next();
                        if matches!(self.peek(), Some(Token::Ident("if"))) {
                            self.next();
                            let pipeline = self.parse_pipeline(Close::Delim)?;
                            return Ok((nodes, Terminator::ElseIf(pipeline)));
                        }
                        self.expect_right_delim()?;
                        return Ok((nodes, Terminator::Else));
                    }
                    Some(Token::Ident("if")) => {
                        self.next();
                        nodes.push(Node::If(self.parse_branch(Control::If)?));
                    }
                    Some(Token::Ident("with")) => {
                        self.next();
                        nodes.push(Node::With(self.parse_branch(Control::With)?));
                    }
                    Some(Token::Ident("range")) => {
                        self.next();
                        nodes.push(Node::Range(self.parse_branch(Control::Range)?));
                    }
                    _ => nodes.push(Node::Action(self.parse_pipeline(Close::Delim)?)),
                },
                other => return Err(self.error(ParseErrorKind::UnexpectedToken(self.describe(&other)))),
            }
        }
    }

    fn parse_branch(&mut self, control: Control) -> Result<Branch, ParseError> {
        let pipeline = self.parse_pipeline(Close::Delim)?;
        self.parse_branch_body(control, pipeline)
    }

    fn parse_branch_body(&mut self, control: Control, pipeline: Pipeline) -> Result<Branch, ParseError> {
        self.descend()?;
        let (body, terminator) = self.parse_list()?;
        let otherwise = match terminator {
            Terminator::End => Vec::new(),
            Terminator::Else => {
                let (list, terminator) = self.parse_list()?;
                match terminator {
                    Terminator::End => list,
                    Terminator::Eof => {
                        return Err(self.error(ParseErrorKind::UnexpectedEof(control.keyword())))
                    }
                    Terminator::Else | Terminator::ElseIf(_) => {
                        return Err(self.unexpected_keyword("else"))
                    }
                }
            }
            // `else if` nests a new `if` that shares this block's `end`.
            Terminator::ElseIf(next) if control == Control::If => {
                vec![Node::If(self.parse_branch_body(Control::If, next)?)]
            }
            Terminator::ElseIf(_) => return Err(self.unexpected_keyword("else if")),
            Terminator::Eof => {
                return Err(self.error(ParseErrorKind::UnexpectedEof(control.keyword())))
            }
        };

        self.depth -= 1;
        Ok(Branch {
            pipeline,
            body,
            otherwise,
        })
    }

    fn parse_pipeline(&mut self, close: Close) -> Result<Pipeline, ParseError> {
        let line = self.peek_line();
        let mut commands = Vec::new();

        loop {
            commands.push(self.parse_command()?);
            match self.next().map(|s| s.token) {
                Some(Token::Pipe) => continue,
                Some(Token::RightDelim) if close == Close::Delim => break,
                Some(Token::RightParen) if close == Close::Paren => break,
                Some(Token::RightDelim) => return Err(self.error(ParseErrorKind::UnclosedParen)),
                Some(other) => {
                    return Err(self.error(ParseErrorKind::UnexpectedToken(self.describe(&other))))
                }
                None => return Err(self.error(ParseErrorKind::UnclosedAction)),
            }
        }

        Ok(Pipeline { line, commands })
    }

    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let mut operands = Vec::new();
        while !matches!(
            self.peek(),
            None | Some(Token::Pipe | Token::RightDelim | Token::RightParen)
        ) {
            operands.push(self.parse_operand()?);
        }

        if operands.is_empty() {
            return Err(self.error(ParseErrorKind::MissingValue));
        }
        Ok(Command { operands })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let Some(spanned) = self.next() else {
            return Err(self.error(ParseErrorKind::UnclosedAction));
        };

        let operand = match spanned.token {
            Token::Ident(name) if KEYWORDS.contains(&name) => {
                return Err(self.unexpected_keyword(name));
            }
            Token::Ident(name) => {
                if !self.funcs.contains(name) {
                    return Err(self.error(ParseErrorKind::UndefinedFunction(name.to_string())));
                }
                Operand::Function(name.to_string())
            }
            Token::Field(path) => Operand::Field(owned(&path)),
            Token::Dot => Operand::Dot,
            Token::Variable("$", path) => Operand::Root(owned(&path)),
            Token::Variable(name, _) => {
                return Err(self.error(ParseErrorKind::UndefinedVariable(name.to_string())));
            }
            Token::Str(s) => Operand::Literal(Value::String(s)),
            Token::Number(text) => Operand::Literal(self.number(text)?),
            Token::Bool(b) => Operand::Literal(Value::Bool(b)),
            Token::Nil => Operand::Literal(Value::Null),
            Token::LeftParen => {
                self.descend()?;
                let pipeline = self.parse_pipeline(Close::Paren)?;
                self.depth -= 1;
                Operand::Sub(pipeline)
            }
            other => {
                return Err(self.error(ParseErrorKind::UnexpectedToken(self.describe(&other))));
            }
        };
        Ok(operand)
    }

    fn number(&self, text: &str) -> Result<Value, ParseError> {
        if let Some(n) = prefixed_integer(text) {
            return Ok(Value::from(n));
        }
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::from(n));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(Value::from(n));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error(ParseErrorKind::BadNumber(text.to_string())))
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(ParseErrorKind::TooDeep(MAX_DEPTH)));
        }
        self.depth += 1;
        Ok(())
    }

    fn expect_right_delim(&mut self) -> Result<(), ParseError> {
        match self.next().map(|s| s.token) {
            Some(Token::RightDelim) => Ok(()),
            Some(other) => Err(self.error(ParseErrorKind::UnexpectedToken(self.describe(&other)))),
            None => Err(self.error(ParseErrorKind::UnclosedAction)),
        }
    }

    fn next(&mut self) -> Option<Spanned<'a>> {
        let spanned = self.tokens.next()?;
        self.line = spanned.line;
        Some(spanned)
    }

    fn peek(&mut self) -> Option<&Token<'a>> {
        self.tokens.peek().map(|s| &s.token)
    }

    fn peek_line(&mut self) -> usize {
        let line = self.line;
        self.tokens.peek().map_or(line, |s| s.line)
    }

    fn describe(&self, token: &Token<'_>) -> String {
        match token {
            Token::Text(_) => "text".to_string(),
            Token::LeftDelim => format!("left delimiter {:?}", self.delims.left),
            Token::RightDelim => format!("right delimiter {:?}", self.delims.right),
            Token::Ident(name) => format!("identifier {:?}", name),
            Token::Field(path) => format!("field .{}", path.join(".")),
            Token::Dot => "\".\"".to_string(),
            Token::Variable(name, _) => format!("variable {}", name),
            Token::Str(s) => format!("quoted string {:?}", s),
            Token::Number(n) => format!("number {}", n),
            Token::Bool(b) => format!("bool {}", b),
            Token::Nil => "nil".to_string(),
            Token::LeftParen => "\"(\"".to_string(),
            Token::RightParen => "\")\"".to_string(),
            Token::Pipe => "\"|\"".to_string(),
        }
    }

    fn unexpected_keyword(&self, keyword: &str) -> ParseError {
        self.error(ParseErrorKind::UnexpectedToken(format!(
            "{}{}{}",
            self.delims.left, keyword, self.delims.right
        )))
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.name, self.line, kind)
    }
}

fn owned(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

/// `0x1f`, `0o17` and `0b101`, optionally signed.
fn prefixed_integer(text: &str) -> Option<i64> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let radix = match unsigned.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let magnitude = i64::from_str_radix(&unsigned[2..], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
