//! ANSI color codes for line-oriented log viewers
//! Only the standard foreground colors (30-37) are used since the viewer has no 8-bit palette

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m"; // Color 1
pub const GREEN: &str = "\x1b[32m"; // Color 2
pub const YELLOW: &str = "\x1b[33m"; // Color 3
pub const BLUE: &str = "\x1b[34m"; // Color 4
pub const MAGENTA: &str = "\x1b[35m"; // Color 5
pub const CYAN: &str = "\x1b[36m"; // Color 6

/// Foreground colors the log viewer can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorName {
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    Yellow,
}

impl ColorName {
    pub const ALL: [Self; 6] = [
        Self::Blue,
        Self::Cyan,
        Self::Green,
        Self::Magenta,
        Self::Red,
        Self::Yellow,
    ];

    /// Full escape sequence that switches the foreground to this color
    #[must_use]
    pub const fn escape(self) -> &'static str {
        match self {
            Self::Blue => BLUE,
            Self::Cyan => CYAN,
            Self::Green => GREEN,
            Self::Magenta => MAGENTA,
            Self::Red => RED,
            Self::Yellow => YELLOW,
        }
    }

    /// Escape sequence without the leading ESC byte, e.g. `[31m`
    ///
    /// Palette tables are written in this form so they match text whether or
    /// not the ESC byte survived the trip through the log pipeline.
    #[must_use]
    pub fn fragment(self) -> &'static str {
        &self.escape()[1..]
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Cyan => "cyan",
            Self::Green => "green",
            Self::Magenta => "magenta",
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }

    /// Color whose fragment is exactly `fragment`, if any
    #[must_use]
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.fragment() == fragment)
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

/// Wrap `text` in `color`, re-applying the color after every line break
///
/// The viewer drops escape state at the end of each line, so every line gets
/// its own escape-on. A single reset closes the whole block.
pub fn colorize(color: ColorName, text: &str) -> Result<String> {
    if text.is_empty() {
        return Err(Error::EmptyText);
    }

    let on = color.escape();
    let lines = text.matches('\n').count() + 1;
    let mut out = String::with_capacity(text.len() + on.len() * lines + RESET.len());

    out.push_str(on);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(on);
        }
        out.push_str(line);
    }
    out.push_str(RESET);

    log::debug!("colorized {lines} line(s) {color}");
    Ok(out)
}
