//! Color state tracked while a style runs.
//!
//! Each method mirrors one directive: it updates the remembered
//! foreground/background and returns the escape text for the new state.
//! When colors are disabled the returned text is empty but the state is
//! still updated, so transitions stay correct if colors come back on.

use crate::sgr::{self, SgrToggle};

/// Palette index used for "terminal default". Also a real palette entry;
/// the two are not distinguished.
pub const DEFAULT_COLOR: u8 = 0;

/// Foreground and background remembered between directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorState {
    foreground: u8,
    background: u8,
    no_colors: bool,
}

impl ColorState {
    /// Creates a state with both colors at [`DEFAULT_COLOR`] and colors enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn foreground(&self) -> u8 {
        self.foreground
    }

    pub fn background(&self) -> u8 {
        self.background
    }

    /// Whether escape output is suppressed.
    pub fn no_colors(&self) -> bool {
        self.no_colors
    }

    pub fn set_no_colors(&mut self, no_colors: bool) {
        self.no_colors = no_colors;
    }

    /// `fg c`
    pub fn set_fg(&mut self, color: u8) -> String {
        self.foreground = color;
        self.codes(&[sgr::ATTR_FOREGROUND_256, &color.to_string()])
    }

    /// `bg c`
    pub fn set_bg(&mut self, color: u8) -> String {
        self.background = color;
        self.codes(&[sgr::ATTR_BACKGROUND_256, &color.to_string()])
    }

    /// `nofg`
    pub fn default_fg(&mut self) -> String {
        self.foreground = DEFAULT_COLOR;
        self.codes(&[&format!("{}{}", sgr::ATTR_FOREGROUND, sgr::ATTR_DEFAULT)])
    }

    /// `nobg`
    pub fn default_bg(&mut self) -> String {
        self.background = DEFAULT_COLOR;
        self.codes(&[&format!("{}{}", sgr::ATTR_BACKGROUND, sgr::ATTR_DEFAULT)])
    }

    /// `bold` / `nobold`
    pub fn bold(&self, on: bool) -> String {
        self.toggle(sgr::SGR_BOLD, on)
    }

    /// `reverse` / `noreverse`
    pub fn reverse(&self, on: bool) -> String {
        self.toggle(sgr::SGR_REVERSE, on)
    }

    /// `reset`: clears every attribute and forgets both colors.
    pub fn reset(&mut self) -> String {
        self.foreground = DEFAULT_COLOR;
        self.background = DEFAULT_COLOR;
        self.codes(&[sgr::ATTR_RESET])
    }

    /// `from text next_bg`: draws `text` as a connector out of the current
    /// background block into `next_bg`.
    ///
    /// The connector's foreground is the old background and its background
    /// is `next_bg`. The foreground in effect before the call is restored
    /// afterwards; the background stays at `next_bg`.
    pub fn transition_from(&mut self, text: &str, next_bg: u8) -> String {
        let previous_bg = self.background;
        let previous_fg = self.foreground;

        let mut out = self.set_fg(previous_bg);
        out.push_str(&self.set_bg(next_bg));
        out.push_str(text);
        out.push_str(&self.set_fg(previous_fg));
        out
    }

    /// `to next_bg text`: draws `text` in `next_bg` on the current
    /// background, then switches the background to `next_bg`.
    ///
    /// The foreground in effect before the call is restored afterwards.
    pub fn transition_to(&mut self, next_bg: u8, text: &str) -> String {
        let previous_fg = self.foreground;

        let mut out = self.set_fg(next_bg);
        out.push_str(text);
        out.push_str(&self.set_bg(next_bg));
        out.push_str(&self.set_fg(previous_fg));
        out
    }

    fn toggle(&self, toggle: SgrToggle, on: bool) -> String {
        self.codes(&[if on { toggle.on } else { toggle.off }])
    }

    fn codes(&self, params: &[&str]) -> String {
        if self.no_colors {
            return String::new();
        }
        sgr::sequence(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_default() {
        let state = ColorState::new();
        assert_eq!(state.foreground(), DEFAULT_COLOR);
        assert_eq!(state.background(), DEFAULT_COLOR);
        assert!(!state.no_colors());
    }

    #[test]
    fn fg_and_bg_are_independent() {
        let mut state = ColorState::new();
        assert_eq!(state.set_fg(6), "\x1b[38;5;6m");
        assert_eq!(state.set_bg(2), "\x1b[48;5;2m");
        assert_eq!((state.foreground(), state.background()), (6, 2));

        assert_eq!(state.default_fg(), "\x1b[39m");
        assert_eq!((state.foreground(), state.background()), (0, 2));

        assert_eq!(state.default_bg(), "\x1b[49m");
        assert_eq!((state.foreground(), state.background()), (0, 0));
    }

    #[test]
    fn reset_clears_both() {
        let mut state = ColorState::new();
        state.set_fg(200);
        state.set_bg(100);
        assert_eq!(state.reset(), "\x1b[0m");
        assert_eq!((state.foreground(), state.background()), (0, 0));
    }

    #[test]
    fn toggles_leave_colors_alone() {
        let mut state = ColorState::new();
        state.set_fg(3);
        assert_eq!(state.bold(true), "\x1b[1m");
        assert_eq!(state.bold(false), "\x1b[22m");
        assert_eq!(state.reverse(true), "\x1b[7m");
        assert_eq!(state.reverse(false), "\x1b[27m");
        assert_eq!(state.foreground(), 3);
    }

    #[test]
    fn transition_from_bridges_backgrounds() {
        let mut state = ColorState::new();
        state.set_fg(6);
        state.set_bg(2);

        let out = state.transition_from(">", 4);
        assert_eq!(out, "\x1b[38;5;2m\x1b[48;5;4m>\x1b[38;5;6m");
        assert_eq!((state.foreground(), state.background()), (6, 4));
    }

    #[test]
    fn transition_to_bridges_backgrounds() {
        let mut state = ColorState::new();
        state.set_fg(6);
        state.set_bg(2);

        let out = state.transition_to(4, "<");
        assert_eq!(out, "\x1b[38;5;4m<\x1b[48;5;4m\x1b[38;5;6m");
        assert_eq!((state.foreground(), state.background()), (6, 4));
    }

    #[test]
    fn transition_from_default_background_uses_color_zero() {
        let mut state = ColorState::new();
        let out = state.transition_from("", 1);
        assert_eq!(out, "\x1b[38;5;0m\x1b[48;5;1m\x1b[38;5;0m");
    }

    #[test]
    fn no_colors_suppresses_output_but_tracks_state() {
        let mut state = ColorState::new();
        state.set_no_colors(true);

        assert_eq!(state.set_fg(6), "");
        assert_eq!(state.set_bg(2), "");
        assert_eq!(state.transition_from("|", 4), "|");
        assert_eq!(state.transition_to(5, "|"), "|");
        assert_eq!(state.reset(), "");
        assert_eq!(state.bold(true), "");

        state.set_fg(9);
        state.set_bg(8);
        assert_eq!((state.foreground(), state.background()), (9, 8));

        state.set_no_colors(false);
        assert_eq!(state.transition_from("", 1), "\x1b[38;5;8m\x1b[48;5;1m\x1b[38;5;9m");
    }
}
