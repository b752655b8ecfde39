// src/color.rs

//! Defines color-related enums (`NamedColor`, `Color`) and their rendering as
//! tmux style values.

use std::fmt;

/// Standard ANSI named colors (indices 0-15).
/// These are the 8 normal and 8 bright colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

const NAMED_COLORS: [NamedColor; 16] = [
    NamedColor::Black,
    NamedColor::Red,
    NamedColor::Green,
    NamedColor::Yellow,
    NamedColor::Blue,
    NamedColor::Magenta,
    NamedColor::Cyan,
    NamedColor::White,
    NamedColor::BrightBlack,
    NamedColor::BrightRed,
    NamedColor::BrightGreen,
    NamedColor::BrightYellow,
    NamedColor::BrightBlue,
    NamedColor::BrightMagenta,
    NamedColor::BrightCyan,
    NamedColor::BrightWhite,
];

/// Base names of the eight ANSI colors, in SGR order.
const BASE_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

impl NamedColor {
    /// Converts a u8 index (0-15) to a `NamedColor`.
    /// Returns `None` when the index is outside the 16-color palette.
    pub fn from_index(idx: u8) -> Option<Self> {
        NAMED_COLORS.get(idx as usize).copied()
    }

    /// True for the bright half of the palette (indices 8-15).
    pub fn is_bright(self) -> bool {
        (self as u8) >= 8
    }

    /// The tmux color name, e.g. `red` or `brightred`.
    pub fn tmux_name(self) -> String {
        let base = BASE_NAMES[(self as u8 % 8) as usize];
        if self.is_bright() {
            format!("bright{base}")
        } else {
            base.to_string()
        }
    }
}

/// Represents a color value carried by an SGR sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default foreground or background.
    #[default]
    Default,
    /// One of the 16 standard ANSI colors.
    Named(NamedColor),
    /// A 256-color palette index, kept as written in the sequence.
    Indexed(u32),
    /// A 24-bit true color.
    Rgb(u8, u8, u8),
}

impl fmt::Display for Color {
    /// Formats the color the way tmux expects it inside `fg=`/`bg=`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Default => write!(f, "default"),
            Color::Named(named) => write!(f, "{}", named.tmux_name()),
            Color::Indexed(idx) => write!(f, "colour{idx}"),
            Color::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}
