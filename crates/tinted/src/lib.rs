//! # Tinted - color styles for terminal output
//!
//! `tinted` compiles a small style language into escape sequences for
//! 256-color terminals. Styles describe colored output declaratively
//! instead of gluing escape codes together by hand:
//!
//! ```rust
//! use serde_json::json;
//! use tinted::{compile, Extensions};
//!
//! let mut style = compile("{fg 6}{bg 2}finn{from \"\" 4}jake", &Extensions::new()).unwrap();
//! let out = style.execute_to_string(&json!({})).unwrap();
//!
//! assert_eq!(
//!     out,
//!     "\x1b[38;5;6m\x1b[48;5;2mfinn\x1b[38;5;2m\x1b[48;5;4m\x1b[38;5;6mjake"
//! );
//! assert_eq!(tinted::trim_styles(&out), "finnjake");
//! ```
//!
//! ## Directives
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `{fg c}` / `{bg c}` | Set foreground / background to palette index `c` (0-255) |
//! | `{nofg}` / `{nobg}` | Restore the terminal default foreground / background |
//! | `{bold}` / `{nobold}` | Bold on / off |
//! | `{reverse}` / `{noreverse}` | Reverse video on / off |
//! | `{reset}` | Clear every attribute |
//! | `{from "text" c}` | Draw `text` in the current background over `c`, then continue on `c` |
//! | `{to c "text"}` | Draw `text` in `c` over the current background, then continue on `c` |
//!
//! The transition directives remember the foreground in effect and restore
//! it afterwards, which is what powerline-style separators need.
//!
//! Styles also support the template engine's control flow and data lookup
//! (`{if .x}..{else}..{end}`, `{range .items}..{end}`, `{.field}`). See
//! [`tinted_template`] for the full syntax.
//!
//! ## State
//!
//! Each [`Style`] tracks the current colors. The state survives between
//! executions and is never shared between styles. Palette index `0`
//! doubles as "default", so `{bg 0}` and `{nobg}` leave the same state.
//!
//! ## Crate Features
//!
//! - `tracing`: emit `tracing` spans and events around compile and execute.

pub mod compiler;
pub mod directives;
mod error;
pub mod options;
pub mod sgr;
mod state;
mod style;
mod trim;

pub use compiler::{compile, compile_with_reset, Compiler, Extensions};
pub use error::{Error, Result};
pub use options::CompileOptions;
pub use state::{ColorState, DEFAULT_COLOR};
pub use style::Style;
pub use trim::trim_styles;

pub use tinted_template::{
    from_fn, Arity, ExecError, FuncError, Function, ParseError, ParseErrorKind, Value,
};
