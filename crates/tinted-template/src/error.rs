//! Error types for template parsing and execution.

use thiserror::Error;

use crate::func::Arity;

/// Error returned when template text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template: {name}:{line}: {kind}")]
pub struct ParseError {
    /// Name the template was parsed under.
    pub name: String,
    /// 1-based line where the problem was found.
    pub line: usize,
    /// What went wrong.
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(name: &str, line: usize, kind: ParseErrorKind) -> Self {
        Self {
            name: name.to_string(),
            line,
            kind,
        }
    }
}

/// The specific parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("delimiters must not be empty")]
    EmptyDelimiter,

    #[error("unclosed action")]
    UnclosedAction,

    #[error("unclosed comment")]
    UnclosedComment,

    #[error("unterminated quoted string")]
    UnterminatedString,

    #[error("bad escape sequence in string: \\{0}")]
    BadEscape(char),

    #[error("unexpected {0:?} in action")]
    UnexpectedChar(char),

    #[error("bad number syntax: {0:?}")]
    BadNumber(String),

    #[error("function {0:?} not defined")]
    UndefinedFunction(String),

    #[error("undefined variable {0:?}")]
    UndefinedVariable(String),

    #[error("unclosed left paren")]
    UnclosedParen,

    #[error("missing value for command")]
    MissingValue,

    #[error("unexpected {0}")]
    UnexpectedToken(String),

    #[error("unexpected EOF in {0}")]
    UnexpectedEof(&'static str),

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// Error raised by a template function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuncError {
    /// An argument had the wrong JSON type.
    #[error("argument {index}: expected {expected}, got {found}")]
    ArgType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// An argument had the right type but an unusable value.
    #[error("argument {index}: {message}")]
    ArgValue { index: usize, message: String },

    /// Any other failure reported by the function.
    #[error("{0}")]
    Custom(String),
}

/// Error returned when a parsed template fails while running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    #[error("template: {name}:{line}: wrong number of args for {function}: want {expected} got {got}")]
    Arity {
        name: String,
        line: usize,
        function: String,
        expected: Arity,
        got: usize,
    },

    #[error("template: {name}:{line}: error calling {function}: {source}")]
    Call {
        name: String,
        line: usize,
        function: String,
        source: FuncError,
    },

    #[error("template: {name}:{line}: can't give argument to non-function")]
    NotAFunction { name: String, line: usize },

    #[error("template: {name}:{line}: can't evaluate field {field} in type {kind}")]
    Field {
        name: String,
        line: usize,
        field: String,
        kind: &'static str,
    },

    #[error("template: {name}:{line}: range can't iterate over {kind}")]
    Range {
        name: String,
        line: usize,
        kind: &'static str,
    },

    #[error("template: {name}:{line}: nesting deeper than {limit} levels")]
    TooDeep {
        name: String,
        line: usize,
        limit: usize,
    },

    #[error("template: {name}:{line}: function {function:?} not defined")]
    UndefinedFunction {
        name: String,
        line: usize,
        function: String,
    },
}
