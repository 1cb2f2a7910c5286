//! Compiled styles.

use std::io::Write;

use serde::Serialize;
use tinted_template::{Template, Value};

use crate::error::{Error, Result};
use crate::state::ColorState;

/// A compiled, reusable style.
///
/// A style owns its color state. Colors set by one execution are still in
/// effect at the start of the next, so a style can be run piecewise:
///
/// ```rust
/// use tinted::{compile, Extensions};
///
/// let mut style = compile("{if .open}{bg 2}{end}{from \">\" 4}", &Extensions::new()).unwrap();
///
/// style.execute_to_string(&serde_json::json!({"open": true})).unwrap();
/// assert_eq!(style.background(), 4);
///
/// // The connector now starts from background 4.
/// let out = style.execute_to_string(&serde_json::json!({"open": false})).unwrap();
/// assert!(out.starts_with("\x1b[38;5;4m"));
/// ```
///
/// Executing needs `&mut self`. Share a style between threads behind a
/// lock, or compile one per thread.
#[derive(Debug, Clone)]
pub struct Style {
    template: Template<ColorState>,
    state: ColorState,
}

impl Style {
    pub(crate) fn new(template: Template<ColorState>, state: ColorState) -> Self {
        Self { template, state }
    }

    /// Runs the style against `data` and returns the styled text.
    ///
    /// `data` is converted to JSON first. Fields the style reads that are
    /// missing from `data` evaluate to nothing.
    ///
    /// # Errors
    ///
    /// [`Error::Data`] if `data` cannot be serialized, [`Error::Execution`]
    /// if a directive gets bad arguments or a field is read from a value
    /// that has none.
    pub fn execute_to_string<T: Serialize + ?Sized>(&mut self, data: &T) -> Result<String> {
        let value = serde_json::to_value(data).map_err(Error::Data)?;
        self.render_value(&value)
    }

    /// Runs the style against an already converted value.
    pub fn render_value(&mut self, data: &Value) -> Result<String> {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "execute",
            fg = self.state.foreground(),
            bg = self.state.background()
        )
        .entered();

        let out = self.template.render(&mut self.state, data)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            fg = self.state.foreground(),
            bg = self.state.background(),
            len = out.len(),
            "style executed"
        );

        Ok(out)
    }

    /// Runs the style and writes the result to `writer`.
    ///
    /// Nothing is written if execution fails.
    pub fn execute<W, T>(&mut self, mut writer: W, data: &T) -> Result<()>
    where
        W: Write,
        T: Serialize + ?Sized,
    {
        let out = self.execute_to_string(data)?;
        writer.write_all(out.as_bytes())?;
        Ok(())
    }

    /// Current foreground palette index.
    pub fn foreground(&self) -> u8 {
        self.state.foreground()
    }

    /// Current background palette index.
    pub fn background(&self) -> u8 {
        self.state.background()
    }

    pub fn no_colors(&self) -> bool {
        self.state.no_colors()
    }

    /// Turns escape output off or on for later executions. Colors are
    /// tracked either way.
    pub fn set_no_colors(&mut self, no_colors: bool) {
        self.state.set_no_colors(no_colors);
    }

    pub fn state(&self) -> &ColorState {
        &self.state
    }

    /// Forgets the remembered colors without emitting anything.
    pub fn reset_state(&mut self) {
        let no_colors = self.state.no_colors();
        self.state = ColorState::new();
        self.state.set_no_colors(no_colors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, Extensions};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn style(text: &str) -> Style {
        compile(text, &Extensions::new()).unwrap()
    }

    #[test]
    fn style_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Style>();
    }

    #[test]
    fn state_persists_between_runs() {
        let mut style = style("{if .first}{fg 3}{bg 5}{else}{to 7 \"\"}{end}");
        style.execute_to_string(&json!({"first": true})).unwrap();
        assert_eq!((style.foreground(), style.background()), (3, 5));

        let out = style.execute_to_string(&json!({"first": false})).unwrap();
        assert_eq!(out, "\x1b[38;5;7m\x1b[48;5;7m\x1b[38;5;3m");
        assert_eq!((style.foreground(), style.background()), (3, 7));
    }

    #[test]
    fn reset_state_keeps_no_colors() {
        let mut style = style("{fg 9}");
        style.set_no_colors(true);
        style.execute_to_string(&()).unwrap();
        assert_eq!(style.foreground(), 9);

        style.reset_state();
        assert_eq!(style.foreground(), 0);
        assert!(style.no_colors());
    }

    #[test]
    fn serializable_data() {
        #[derive(Serialize)]
        struct Prompt<'a> {
            user: &'a str,
            root: bool,
        }

        let mut style = style("{if .root}{fg 1}{end}{.user}");
        let out = style
            .execute_to_string(&Prompt {
                user: "finn",
                root: true,
            })
            .unwrap();
        assert_eq!(out, "\x1b[38;5;1mfinn");
    }

    #[test]
    fn unserializable_data_is_data_error() {
        // JSON object keys must be strings
        let mut data = BTreeMap::new();
        data.insert(vec![1u8], 1);
        let err = style("x").execute_to_string(&data).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
    }

    #[test]
    fn execute_writes_output() {
        let mut buf = Vec::new();
        style("{bold}hi").execute(&mut buf, &()).unwrap();
        assert_eq!(buf, b"\x1b[1mhi");
    }

    #[test]
    fn execute_writes_nothing_on_error() {
        let mut buf = Vec::new();
        let err = style("hi{fg .x}").execute(&mut buf, &json!({"x": "red"})).unwrap_err();
        assert!(err.is_execution());
        assert!(buf.is_empty());
    }

    #[test]
    fn failed_run_leaves_style_usable() {
        let mut style = style("{fg .c}");
        assert!(style.execute_to_string(&json!({"c": 300})).is_err());
        assert_eq!(style.execute_to_string(&json!({"c": 4})).unwrap(), "\x1b[38;5;4m");
    }
}
