//! Turning style text into a [`Style`].
//!
//! The function table a style is parsed against is built in three layers,
//! later layers replacing earlier names:
//!
//! 1. engine builtins (`and`, `or`, `not`, `eq`, `ne`, `len`, `print`)
//! 2. the color directives from [`crate::directives`]
//! 3. caller extensions
//!
//! # Example
//!
//! ```rust
//! use tinted::{Arity, Compiler, Extensions, Value};
//!
//! let extensions = Extensions::new().add("sep", Arity::Exact(0), |_, _: &[Value]| {
//!     Ok(Value::from(" | "))
//! });
//!
//! let mut style = Compiler::new()
//!     .extensions(extensions)
//!     .compile_with_reset("{fg 1}a{sep}b")
//!     .unwrap();
//!
//! assert_eq!(style.execute_to_string(&()).unwrap(), "\x1b[38;5;1ma | b\x1b[0m");
//! ```

use tinted_template::{Delimiters, FuncMap, Template};

use crate::directives::{self, RESET};
use crate::error::Result;
use crate::state::ColorState;
use crate::style::Style;

/// Opening action delimiter used unless configured otherwise.
pub const DEFAULT_LEFT_DELIM: &str = "{";

/// Closing action delimiter used unless configured otherwise.
pub const DEFAULT_RIGHT_DELIM: &str = "}";

/// Name every compiled template is parsed under. Shows up in error messages.
pub const STYLE_NAME: &str = "style";

/// Caller-supplied functions available to a style in addition to the
/// built-in directives. Entries replace built-ins of the same name.
pub type Extensions = FuncMap<ColorState>;

/// Configures and compiles styles.
#[derive(Debug, Clone)]
pub struct Compiler {
    left_delim: String,
    right_delim: String,
    no_colors: bool,
    extensions: Extensions,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            left_delim: DEFAULT_LEFT_DELIM.to_string(),
            right_delim: DEFAULT_RIGHT_DELIM.to_string(),
            no_colors: false,
            extensions: Extensions::new(),
        }
    }

    pub fn left_delim(mut self, delim: impl Into<String>) -> Self {
        self.left_delim = delim.into();
        self
    }

    pub fn right_delim(mut self, delim: impl Into<String>) -> Self {
        self.right_delim = delim.into();
        self
    }

    /// Compiled styles start with escape output suppressed.
    pub fn no_colors(mut self, no_colors: bool) -> Self {
        self.no_colors = no_colors;
        self
    }

    /// Replaces the extension table.
    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Compiles `text` into a style with fresh color state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compile`](crate::Error::Compile) when the text is
    /// malformed or calls a function that is not registered.
    pub fn compile(&self, text: &str) -> Result<Style> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("compile", len = text.len()).entered();

        let delims = Delimiters::new(self.left_delim.as_str(), self.right_delim.as_str());
        let template = match Template::parse(STYLE_NAME, text, self.funcs(), &delims) {
            Ok(template) => template,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %err, "style failed to compile");
                return Err(err.into());
            }
        };

        let mut state = ColorState::new();
        state.set_no_colors(self.no_colors);

        #[cfg(feature = "tracing")]
        tracing::trace!(functions = template.funcs().len(), "style compiled");

        Ok(Style::new(template, state))
    }

    /// Like [`compile`](Self::compile), but the style ends with a `reset`.
    pub fn compile_with_reset(&self, text: &str) -> Result<Style> {
        let text = format!("{}{}{}{}", text, self.left_delim, RESET, self.right_delim);
        self.compile(&text)
    }

    fn funcs(&self) -> FuncMap<ColorState> {
        let mut funcs = FuncMap::with_builtins();
        directives::register(&mut funcs);
        funcs.extend(&self.extensions);
        funcs
    }
}

/// Compiles `text` with default delimiters.
pub fn compile(text: &str, extensions: &Extensions) -> Result<Style> {
    Compiler::new().extensions(extensions.clone()).compile(text)
}

/// Compiles `text` with default delimiters and a trailing `reset`.
pub fn compile_with_reset(text: &str, extensions: &Extensions) -> Result<Style> {
    Compiler::new()
        .extensions(extensions.clone())
        .compile_with_reset(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tinted_template::{Arity, ParseErrorKind, Value};

    #[test]
    fn table_layers_in_order() {
        let extensions = Extensions::new()
            .add("fg", Arity::Exact(1), |_, _: &[Value]| Ok(Value::from("custom")))
            .add("extra", Arity::Exact(0), |_, _: &[Value]| Ok(Value::Null));
        let funcs = Compiler::new().extensions(extensions).funcs();

        assert!(funcs.contains("eq"));
        assert!(funcs.contains("from"));
        assert!(funcs.contains("extra"));

        let fg = funcs.get("fg").unwrap();
        let mut state = ColorState::new();
        assert_eq!(fg.call(&mut state, &[Value::from(3)]).unwrap(), Value::from("custom"));
        assert_eq!(state.foreground(), 0);
    }

    #[test]
    fn unknown_function_fails_to_compile() {
        let err = compile("{sparkle}", &Extensions::new()).unwrap_err();
        match err {
            Error::Compile(parse) => {
                assert_eq!(parse.kind, ParseErrorKind::UndefinedFunction("sparkle".into()));
                assert_eq!(parse.name, STYLE_NAME);
            }
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn unclosed_action_fails_to_compile() {
        assert!(compile("{fg 1", &Extensions::new()).unwrap_err().is_compile());
    }

    #[test]
    fn empty_delimiter_fails_to_compile() {
        let err = Compiler::new().left_delim("").compile("x").unwrap_err();
        assert!(matches!(
            err,
            Error::Compile(ref parse) if parse.kind == ParseErrorKind::EmptyDelimiter
        ));
    }

    #[test]
    fn reset_suffix_uses_configured_delimiters() {
        let mut style = Compiler::new()
            .left_delim("[[")
            .right_delim("]]")
            .compile_with_reset("{x}")
            .unwrap();
        assert_eq!(style.execute_to_string(&()).unwrap(), "{x}\x1b[0m");
    }

    #[test]
    fn no_colors_carries_into_style() {
        let style = Compiler::new().no_colors(true).compile("").unwrap();
        assert!(style.no_colors());
    }
}
