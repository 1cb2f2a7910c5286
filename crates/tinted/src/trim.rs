use once_cell::sync::Lazy;
use regex::Regex;

static ESCAPE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\x1b[^m]*m").expect("escape pattern is valid"));

/// Removes every `ESC ... m` sequence from `input`.
///
/// Any byte run starting with ESC and ending at the next `m` is dropped,
/// whether or not it is a well-formed SGR sequence. An ESC with no
/// following `m` is kept.
///
/// ```rust
/// use tinted::trim_styles;
///
/// assert_eq!(trim_styles("\x1b[48;5;2mfinn\x1b[0m"), "finn");
/// ```
pub fn trim_styles(input: &str) -> String {
    ESCAPE_CODE.replace_all(input, "").into_owned()
}
