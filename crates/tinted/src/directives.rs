//! Built-in style directives.
//!
//! Every directive reads or updates the [`ColorState`] passed in by the
//! running style and returns the escape text to splice into the output.

use tinted_template::{from_fn, int_arg, str_arg, Arity, FuncError, FuncMap, Value};

use crate::state::ColorState;

pub const BG: &str = "bg";
pub const FG: &str = "fg";
pub const NO_BG: &str = "nobg";
pub const NO_FG: &str = "nofg";
pub const BOLD: &str = "bold";
pub const NO_BOLD: &str = "nobold";
pub const REVERSE: &str = "reverse";
pub const NO_REVERSE: &str = "noreverse";
pub const RESET: &str = "reset";
pub const FROM: &str = "from";
pub const TO: &str = "to";

/// Names of every built-in directive.
pub const NAMES: [&str; 11] = [
    BG, FG, NO_BG, NO_FG, BOLD, NO_BOLD, REVERSE, NO_REVERSE, RESET, FROM, TO,
];

/// Table holding every built-in directive.
pub fn directives() -> FuncMap<ColorState> {
    let mut map = FuncMap::new();
    register(&mut map);
    map
}

/// Registers every built-in directive into `map`, replacing same-named entries.
pub fn register(map: &mut FuncMap<ColorState>) {
    map.insert(
        BG,
        from_fn(Arity::Exact(1), |state: &mut ColorState, args: &[Value]| {
            let color = color_arg(args, 0)?;
            Ok(Value::String(state.set_bg(color)))
        }),
    );
    map.insert(
        FG,
        from_fn(Arity::Exact(1), |state: &mut ColorState, args: &[Value]| {
            let color = color_arg(args, 0)?;
            Ok(Value::String(state.set_fg(color)))
        }),
    );
    map.insert(
        NO_BG,
        from_fn(Arity::Exact(0), |state: &mut ColorState, _: &[Value]| {
            Ok(Value::String(state.default_bg()))
        }),
    );
    map.insert(
        NO_FG,
        from_fn(Arity::Exact(0), |state: &mut ColorState, _: &[Value]| {
            Ok(Value::String(state.default_fg()))
        }),
    );
    map.insert(
        BOLD,
        from_fn(Arity::Exact(0), |state: &mut ColorState, _: &[Value]| {
            Ok(Value::String(state.bold(true)))
        }),
    );
    map.insert(
        NO_BOLD,
        from_fn(Arity::Exact(0), |state: &mut ColorState, _: &[Value]| {
            Ok(Value::String(state.bold(false)))
        }),
    );
    map.insert(
        REVERSE,
        from_fn(Arity::Exact(0), |state: &mut ColorState, _: &[Value]| {
            Ok(Value::String(state.reverse(true)))
        }),
    );
    map.insert(
        NO_REVERSE,
        from_fn(Arity::Exact(0), |state: &mut ColorState, _: &[Value]| {
            Ok(Value::String(state.reverse(false)))
        }),
    );
    map.insert(
        RESET,
        from_fn(Arity::Exact(0), |state: &mut ColorState, _: &[Value]| {
            Ok(Value::String(state.reset()))
        }),
    );
    map.insert(
        FROM,
        from_fn(Arity::Exact(2), |state: &mut ColorState, args: &[Value]| {
            let text = text_arg(args, 0)?;
            let next_bg = color_arg(args, 1)?;
            Ok(Value::String(state.transition_from(text, next_bg)))
        }),
    );
    map.insert(
        TO,
        from_fn(Arity::Exact(2), |state: &mut ColorState, args: &[Value]| {
            let next_bg = color_arg(args, 0)?;
            let text = text_arg(args, 1)?;
            Ok(Value::String(state.transition_to(next_bg, text)))
        }),
    );
}

/// Palette index argument. Must be an integer in `0..=255`.
pub fn color_arg(args: &[Value], index: usize) -> Result<u8, FuncError> {
    let raw = int_arg(args, index)?;
    u8::try_from(raw).map_err(|_| FuncError::ArgValue {
        index,
        message: format!("color {} out of range 0..=255", raw),
    })
}

/// Text argument. Must be a string; numbers are not coerced.
pub fn text_arg(args: &[Value], index: usize) -> Result<&str, FuncError> {
    str_arg(args, index)
}
