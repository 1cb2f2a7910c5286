//! SGR (Select Graphic Rendition) escape sequence encoding.
//!
//! | Sequence | Meaning |
//! |----------|---------|
//! | `ESC[0m` | Reset all attributes |
//! | `ESC[1m` / `ESC[22m` | Bold on / off |
//! | `ESC[7m` / `ESC[27m` | Reverse video on / off |
//! | `ESC[39m` / `ESC[49m` | Default foreground / background |
//! | `ESC[38;5;Nm` / `ESC[48;5;Nm` | Indexed foreground / background |

/// Starts every escape sequence.
pub const CODE_START: &str = "\x1b";

/// Terminates an SGR sequence.
pub const CODE_END: &str = "m";

/// Foreground color group (`3x`).
pub const ATTR_FOREGROUND: &str = "3";

/// Background color group (`4x`).
pub const ATTR_BACKGROUND: &str = "4";

/// Combined with a color group to select the terminal default (`39`, `49`).
pub const ATTR_DEFAULT: &str = "9";

pub const ATTR_RESET: &str = "0";

pub const ATTR_BOLD: &str = "1";
pub const ATTR_NO_BOLD: &str = "22";

pub const ATTR_REVERSE: &str = "7";
pub const ATTR_NO_REVERSE: &str = "27";

/// 256-color foreground selector, followed by the palette index.
pub const ATTR_FOREGROUND_256: &str = "38;5";

/// 256-color background selector, followed by the palette index.
pub const ATTR_BACKGROUND_256: &str = "48;5";

/// An attribute with separate enable and disable codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SgrToggle {
    pub on: &'static str,
    pub off: &'static str,
}

/// Bold (on=1, off=22).
pub const SGR_BOLD: SgrToggle = SgrToggle {
    on: ATTR_BOLD,
    off: ATTR_NO_BOLD,
};

/// Reverse video (on=7, off=27).
pub const SGR_REVERSE: SgrToggle = SgrToggle {
    on: ATTR_REVERSE,
    off: ATTR_NO_REVERSE,
};

/// Builds `ESC[<params>m` with `params` joined by `;`.
///
/// ```rust
/// use tinted::sgr::{sequence, ATTR_FOREGROUND_256};
///
/// assert_eq!(sequence(&[ATTR_FOREGROUND_256, "6"]), "\x1b[38;5;6m");
/// ```
pub fn sequence(params: &[&str]) -> String {
    format!("{}[{}{}", CODE_START, params.join(";"), CODE_END)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_param() {
        assert_eq!(sequence(&[ATTR_RESET]), "\x1b[0m");
        assert_eq!(sequence(&[SGR_BOLD.on]), "\x1b[1m");
        assert_eq!(sequence(&[SGR_REVERSE.off]), "\x1b[27m");
    }

    #[test]
    fn default_color_codes_are_concatenated() {
        let code = format!("{}{}", ATTR_BACKGROUND, ATTR_DEFAULT);
        assert_eq!(sequence(&[&code]), "\x1b[49m");
    }

    #[test]
    fn indexed_colors() {
        assert_eq!(sequence(&[ATTR_BACKGROUND_256, "255"]), "\x1b[48;5;255m");
    }
}
