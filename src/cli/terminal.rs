//! Terminal capability detection and utilities

use owo_colors::{colors::css, AnsiColors, OwoColorize};
use roster::domain::Theme;

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

const fn ansi(theme: Theme) -> AnsiColors {
    match theme {
        Theme::Cyan => AnsiColors::Cyan,
        Theme::Blue => AnsiColors::Blue,
        Theme::Green => AnsiColors::Green,
        Theme::Magenta => AnsiColors::Magenta,
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as error (red)
    fn error(&self) -> String;
    /// Color as highlight (yellow)
    fn highlight(&self) -> String;
    /// Bold, in the theme color
    fn themed(&self, theme: Theme) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn error(&self) -> String {
        if supports_color() {
            self.fg::<css::Red>().to_string()
        } else {
            self.to_string()
        }
    }

    fn highlight(&self) -> String {
        if supports_color() {
            self.fg::<css::Gold>().to_string()
        } else {
            self.to_string()
        }
    }

    fn themed(&self, theme: Theme) -> String {
        if supports_color() {
            self.color(ansi(theme)).bold().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn error(&self) -> String {
        self.as_str().error()
    }

    fn highlight(&self) -> String {
        self.as_str().highlight()
    }

    fn themed(&self, theme: Theme) -> String {
        self.as_str().themed(theme)
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}
