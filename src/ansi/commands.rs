// src/ansi/commands.rs

//! Defines the `AnsiCommand` enum produced by the translator, the SGR
//! `Attribute` set it understands, and the rendering of attributes as tmux
//! style directives.

use crate::color::{Color, NamedColor};
use log::debug;
use std::fmt;

// --- SGR Parameter Constants ---

// Basic Attributes
pub const SGR_RESET: u32 = 0;
pub const SGR_BOLD: u32 = 1;
pub const SGR_FAINT: u32 = 2; // Also known as dim
pub const SGR_ITALIC: u32 = 3;
pub const SGR_UNDERLINE: u32 = 4;
pub const SGR_REVERSE: u32 = 7; // Inverse video
pub const SGR_STRIKETHROUGH: u32 = 9; // Crossed-out

// Reset Specific Attributes
pub const SGR_NORMAL_INTENSITY: u32 = 22; // Neither bold nor faint
pub const SGR_NO_ITALIC: u32 = 23;
pub const SGR_NO_UNDERLINE: u32 = 24;
pub const SGR_NO_REVERSE: u32 = 27;
pub const SGR_NO_STRIKETHROUGH: u32 = 29;

// Foreground Colors (30-37)
pub const SGR_FG_BLACK: u32 = 30;
pub const SGR_FG_WHITE: u32 = 37;
pub const SGR_FG_DEFAULT: u32 = 39;

// Background Colors (40-47)
pub const SGR_BG_BLACK: u32 = 40;
pub const SGR_BG_WHITE: u32 = 47;
pub const SGR_BG_DEFAULT: u32 = 49;

// Bright Foreground Colors (90-97)
pub const SGR_FG_BRIGHT_BLACK: u32 = 90;
pub const SGR_FG_BRIGHT_WHITE: u32 = 97;

// Bright Background Colors (100-107)
pub const SGR_BG_BRIGHT_BLACK: u32 = 100;
pub const SGR_BG_BRIGHT_WHITE: u32 = 107;

// Extended Colors (introduced by '38' for FG, '48' for BG)
pub const SGR_EXTENDED_COLOR_FG: u32 = 38;
pub const SGR_EXTENDED_COLOR_BG: u32 = 48;
/// SGR sub-parameter: Indicates the next parameter is a 256-color palette index.
pub const SGR_EXT_MODE_256_INDEX: u32 = 5;
/// SGR sub-parameter: Indicates the next three parameters are R, G, B true color values.
pub const SGR_EXT_MODE_RGB_TRUECOLOR: u32 = 2;

/// Represents the intensity of a basic ANSI color (normal or bright).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorIntensity {
    Normal,
    Bright,
}

// --- SGR Attributes ---
/// A single tmux style attribute produced from an SGR parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    /// Reset all attributes to default.
    Reset,
    Bold,
    Dim,
    Italics,
    Underscore,
    Reverse,
    Strikethrough,
    NoBold,
    NoDim,
    NoItalics,
    NoUnderscore,
    NoReverse,
    NoStrikethrough,
    /// Set foreground color.
    Foreground(Color),
    /// Set background color.
    Background(Color),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Reset => write!(f, "default"),
            Attribute::Bold => write!(f, "bold"),
            Attribute::Dim => write!(f, "dim"),
            Attribute::Italics => write!(f, "italics"),
            Attribute::Underscore => write!(f, "underscore"),
            Attribute::Reverse => write!(f, "reverse"),
            Attribute::Strikethrough => write!(f, "strikethrough"),
            Attribute::NoBold => write!(f, "nobold"),
            Attribute::NoDim => write!(f, "nodim"),
            Attribute::NoItalics => write!(f, "noitalics"),
            Attribute::NoUnderscore => write!(f, "nounderscore"),
            Attribute::NoReverse => write!(f, "noreverse"),
            Attribute::NoStrikethrough => write!(f, "nostrikethrough"),
            Attribute::Foreground(color) => write!(f, "fg={color}"),
            Attribute::Background(color) => write!(f, "bg={color}"),
        }
    }
}

/// Which color layer an extended color sequence targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Foreground,
    Background,
}

impl Layer {
    fn attribute(self, color: Color) -> Attribute {
        match self {
            Layer::Foreground => Attribute::Foreground(color),
            Layer::Background => Attribute::Background(color),
        }
    }
}

/// Represents one translated unit of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnsiCommand {
    /// A character that passes through unchanged.
    Print(char),
    /// A Select Graphic Rendition sequence with its recognized attributes.
    /// The list may be empty when every parameter was unrecognized.
    SetGraphicsRendition(Vec<Attribute>),
}

impl AnsiCommand {
    /// Builds the command for a complete `ESC [ params m` sequence.
    pub(crate) fn from_sgr(params: &[u32]) -> Self {
        AnsiCommand::SetGraphicsRendition(parse_sgr(params))
    }

    /// Renders the command as annotated text, appending to `out`.
    ///
    /// An SGR with no attributes renders as nothing at all.
    pub fn write_to(&self, out: &mut String) {
        match self {
            AnsiCommand::Print(c) => out.push(*c),
            AnsiCommand::SetGraphicsRendition(attrs) => {
                if let Some(directive) = style_directive(attrs) {
                    out.push_str(&directive);
                }
            }
        }
    }
}

/// Joins attributes into one `#[a,b,...]` directive, or `None` if empty.
pub fn style_directive(attrs: &[Attribute]) -> Option<String> {
    if attrs.is_empty() {
        return None;
    }
    let body = attrs
        .iter()
        .map(|attr| attr.to_string())
        .collect::<Vec<_>>()
        .join(",");
    Some(format!("#[{body}]"))
}

/// Parses SGR parameters into a list of `Attribute`s.
///
/// An empty parameter list is equivalent to a single `0`.
pub fn parse_sgr(params: &[u32]) -> Vec<Attribute> {
    if params.is_empty() {
        return vec![Attribute::Reset];
    }
    let mut attrs = Vec::new();
    let mut cursor = 0;
    while cursor < params.len() {
        let param = params[cursor];
        cursor += 1;
        match param {
            SGR_RESET => attrs.push(Attribute::Reset),
            SGR_BOLD => attrs.push(Attribute::Bold),
            SGR_FAINT => attrs.push(Attribute::Dim),
            SGR_ITALIC => attrs.push(Attribute::Italics),
            SGR_UNDERLINE => attrs.push(Attribute::Underscore),
            SGR_REVERSE => attrs.push(Attribute::Reverse),
            SGR_STRIKETHROUGH => attrs.push(Attribute::Strikethrough),
            SGR_NORMAL_INTENSITY => {
                attrs.push(Attribute::NoBold);
                attrs.push(Attribute::NoDim);
            }
            SGR_NO_ITALIC => attrs.push(Attribute::NoItalics),
            SGR_NO_UNDERLINE => attrs.push(Attribute::NoUnderscore),
            SGR_NO_REVERSE => attrs.push(Attribute::NoReverse),
            SGR_NO_STRIKETHROUGH => attrs.push(Attribute::NoStrikethrough),
            SGR_FG_BLACK..=SGR_FG_WHITE => attrs.push(Attribute::Foreground(
                map_basic_code_to_color(param - SGR_FG_BLACK, ColorIntensity::Normal),
            )),
            SGR_FG_DEFAULT => attrs.push(Attribute::Foreground(Color::Default)),
            SGR_BG_BLACK..=SGR_BG_WHITE => attrs.push(Attribute::Background(
                map_basic_code_to_color(param - SGR_BG_BLACK, ColorIntensity::Normal),
            )),
            SGR_BG_DEFAULT => attrs.push(Attribute::Background(Color::Default)),
            SGR_FG_BRIGHT_BLACK..=SGR_FG_BRIGHT_WHITE => {
                attrs.push(Attribute::Foreground(map_basic_code_to_color(
                    param - SGR_FG_BRIGHT_BLACK,
                    ColorIntensity::Bright,
                )))
            }
            SGR_BG_BRIGHT_BLACK..=SGR_BG_BRIGHT_WHITE => {
                attrs.push(Attribute::Background(map_basic_code_to_color(
                    param - SGR_BG_BRIGHT_BLACK,
                    ColorIntensity::Bright,
                )))
            }
            SGR_EXTENDED_COLOR_FG | SGR_EXTENDED_COLOR_BG => {
                let layer = if param == SGR_EXTENDED_COLOR_FG {
                    Layer::Foreground
                } else {
                    Layer::Background
                };
                let (color, next) = parse_extended_color(params, cursor);
                cursor = next;
                if let Some(color) = color {
                    attrs.push(layer.attribute(color));
                }
            }
            _ => {
                debug!("Ignoring unknown SGR parameter: {}", param);
            }
        }
    }
    attrs
}

/// Maps a basic color code (0-7) and intensity to a `Color`.
fn map_basic_code_to_color(code: u32, intensity: ColorIntensity) -> Color {
    let offset = match intensity {
        ColorIntensity::Normal => 0,
        ColorIntensity::Bright => 8,
    };
    u8::try_from(code)
        .ok()
        .and_then(|code| NamedColor::from_index(code + offset))
        .map_or(Color::Default, Color::Named)
}

/// Parses an extended color (256-color or RGB) starting at `cursor`, the index
/// of the mode parameter that follows a `38`/`48` marker.
///
/// Returns the color, if complete, and the cursor positioned after every
/// parameter the extended color consumed. A short sequence consumes whatever
/// is left; an unknown mode consumes only the mode itself.
fn parse_extended_color(params: &[u32], cursor: usize) -> (Option<Color>, usize) {
    let rest = &params[cursor.min(params.len())..];
    let Some(&mode) = rest.first() else {
        debug!("Missing mode for extended color");
        return (None, cursor);
    };
    match mode {
        SGR_EXT_MODE_256_INDEX => match rest.get(1) {
            Some(&idx) => (Some(Color::Indexed(idx)), cursor + 2),
            None => {
                debug!("Incomplete 256-color sequence");
                (None, cursor + rest.len())
            }
        },
        SGR_EXT_MODE_RGB_TRUECOLOR => match rest.get(1..4) {
            Some(&[r, g, b]) => (
                Some(Color::Rgb(channel(r), channel(g), channel(b))),
                cursor + 4,
            ),
            _ => {
                debug!("Incomplete RGB color sequence");
                (None, cursor + rest.len())
            }
        },
        other => {
            debug!("Unsupported extended color mode specifier: {}", other);
            (None, cursor + 1)
        }
    }
}

/// Clamps an RGB parameter into a single channel byte.
fn channel(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_reset() {
        assert_eq!(parse_sgr(&[]), vec![Attribute::Reset]);
        assert_eq!(parse_sgr(&[0]), vec![Attribute::Reset]);
    }

    #[test]
    fn normal_intensity_expands_to_two_attributes() {
        assert_eq!(parse_sgr(&[22]), vec![Attribute::NoBold, Attribute::NoDim]);
    }

    #[test]
    fn extended_color_cursor_advances_past_consumed_params() {
        assert_eq!(
            parse_extended_color(&[38, 5, 200, 1], 1),
            (Some(Color::Indexed(200)), 3)
        );
        assert_eq!(
            parse_extended_color(&[48, 2, 1, 2, 3, 4], 1),
            (Some(Color::Rgb(1, 2, 3)), 5)
        );
    }

    #[test]
    fn short_extended_color_consumes_remaining_params() {
        assert_eq!(parse_extended_color(&[38, 2, 10, 20], 1), (None, 4));
        assert_eq!(parse_extended_color(&[38, 5], 1), (None, 2));
        assert_eq!(parse_extended_color(&[38], 1), (None, 1));
    }

    #[test]
    fn unknown_extended_mode_consumes_only_the_mode() {
        // 38;7;1 -> mode 7 is unknown, the trailing 1 is still bold.
        assert_eq!(parse_sgr(&[38, 7, 1]), vec![Attribute::Bold]);
    }

    #[test]
    fn rgb_channels_clamp_to_a_byte() {
        assert_eq!(
            parse_sgr(&[38, 2, 300, 0, 255]),
            vec![Attribute::Foreground(Color::Rgb(255, 0, 255))]
        );
    }

    #[test]
    fn directive_joins_attributes() {
        let attrs = parse_sgr(&[1, 38, 5, 200]);
        assert_eq!(
            style_directive(&attrs).as_deref(),
            Some("#[bold,fg=colour200]")
        );
        assert_eq!(style_directive(&parse_sgr(&[5, 6, 8])), None);
    }
}
