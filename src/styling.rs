//! Consolidated styling module for terminal output.
//!
//! This module uses the anstyle ecosystem:
//! - anstream for auto-detecting color support
//! - anstyle for composable styling
//! - Semantic style constants for the report fields

use anstyle::{AnsiColor, Color, Style};
use unicode_width::UnicodeWidthStr;

/// Auto-detecting stdout that respects NO_COLOR, CLICOLOR_FORCE, and terminal
/// capabilities
pub use anstream::stdout;

// ============================================================================
// Semantic Style Constants
// ============================================================================
//
// One style per long-report field. Each span renders with its own reset so
// color never leaks into a neighbouring field.

/// Abbreviated commit hash (yellow, like git's own one-line log)
pub const HASH: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

/// Commit date (green)
pub const DATE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));

/// Commit subject (bold)
pub const SUBJECT: Style = Style::new().bold();

/// Commit author (blue)
pub const AUTHOR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue)));

/// Refs pointing at the current commit (cyan)
pub const REFS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

/// Change-summary clause for dirty trees (red)
pub const CHANGES: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Placeholder for repositories with no commits yet (dimmed)
pub const EMPTY: Style = Style::new().dimmed();

// ============================================================================
// Styled Output Types
// ============================================================================

/// A piece of text with an optional style
#[derive(Clone, Debug)]
pub struct StyledString {
    pub text: String,
    pub style: Option<Style>,
}

impl StyledString {
    pub fn new(text: impl Into<String>, style: Option<Style>) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(text, None)
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new(text, Some(style))
    }

    /// Returns the visual width (unicode-aware, no ANSI codes)
    pub fn width(&self) -> usize {
        self.text.width()
    }

    /// Renders to a string with ANSI escape codes
    pub fn render(&self) -> String {
        if let Some(style) = &self.style {
            format!("{}{}{}", style.render(), self.text, style.render_reset())
        } else {
            self.text.clone()
        }
    }
}

/// A line composed of multiple styled strings
#[derive(Clone, Debug, Default)]
pub struct StyledLine {
    pub segments: Vec<StyledString>,
}

impl StyledLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw (unstyled) segment
    pub fn push_raw(&mut self, text: impl Into<String>) {
        self.segments.push(StyledString::raw(text));
    }

    /// Add a styled segment
    pub fn push_styled(&mut self, text: impl Into<String>, style: Style) {
        self.segments.push(StyledString::styled(text, style));
    }

    /// Returns the total visual width
    pub fn width(&self) -> usize {
        self.segments.iter().map(|s| s.width()).sum()
    }

    /// Renders the entire line with ANSI escape codes
    pub fn render(&self) -> String {
        self.segments.iter().map(|s| s.render()).collect()
    }
}
