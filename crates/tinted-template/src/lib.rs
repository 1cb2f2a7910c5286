//! A small text template engine with configurable delimiters.
//!
//! Templates mix literal text with actions. Actions call functions, read
//! fields from JSON data and drive control flow:
//!
//! ```text
//! {{if .warning}}{{print "warn: " .message}}{{else}}ok{{end}}
//! ```
//!
//! # Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `{{name arg1 arg2}}` | Call function `name` |
//! | `{{.a.b}}` | Field lookup relative to dot |
//! | `{{.}}` | Dot itself |
//! | `{{$.a}}` | Field lookup from the root data |
//! | `{{x \| f y}}` | Pipeline: the value of `x` becomes the last argument of `f` |
//! | `{{f (g 1)}}` | Parenthesized sub-expression |
//! | `{{if p}}..{{else if q}}..{{else}}..{{end}}` | Conditional |
//! | `{{range p}}..{{else}}..{{end}}` | Loop over an array or map values |
//! | `{{with p}}..{{else}}..{{end}}` | Rebind dot when `p` is truthy |
//! | `{{/* text */}}` | Comment |
//!
//! Literals are double-quoted strings, back-quoted raw strings, numbers,
//! `true`, `false` and `nil`. Integers may be written in decimal or with a
//! `0x`, `0o` or `0b` prefix. A leading zero is still decimal, and there
//! are no character constants such as `'a'`.
//!
//! `and` and `or` stop evaluating arguments once the result is decided, so
//! functions in later arguments are not called.
//!
//! A field missing from the data evaluates to `nil`, which prints as
//! nothing rather than `<no value>`.
//!
//! Control blocks and parenthesized pipelines nest at most [`MAX_DEPTH`] levels deep;
//! deeper templates fail to parse.
//!
//! # Functions and Context
//!
//! Functions live in a [`FuncMap`] and implement [`Function`]. Each call
//! receives a `&mut C` host context that the caller passes to
//! [`Template::render`], so function state is owned by the caller instead of
//! being captured inside closures.
//!
//! ```rust
//! use serde_json::json;
//! use tinted_template::{Arity, Delimiters, FuncMap, Template, Value};
//!
//! let funcs = FuncMap::with_builtins().add("shout", Arity::Exact(1), |calls: &mut usize, args: &[Value]| {
//!     *calls += 1;
//!     Ok(Value::from(args[0].as_str().unwrap_or_default().to_uppercase()))
//! });
//!
//! let template = Template::parse("demo", "<shout .name>!", funcs, &Delimiters::new("<", ">")).unwrap();
//!
//! let mut calls = 0;
//! let out = template.render(&mut calls, &json!({"name": "finn"})).unwrap();
//! assert_eq!(out, "FINN!");
//! assert_eq!(calls, 1);
//! ```

mod error;
mod exec;
mod func;
mod lex;
mod parse;
mod value;

pub use error::{ExecError, FuncError, ParseError, ParseErrorKind};
pub use exec::Template;
pub use func::{from_fn, int_arg, str_arg, Arity, FnFunction, FuncMap, Function, ShortCircuit};
pub use lex::{Delimiters, DEFAULT_LEFT_DELIM, DEFAULT_RIGHT_DELIM};
pub use parse::MAX_DEPTH;
pub use serde_json::Value;
pub use value::{is_truthy, kind_of};
