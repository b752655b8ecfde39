// src/text/window.rs

//! Column-accurate windowing over a token stream.
//!
//! The scroll unit is the display column, not the token index, so wide
//! glyphs are never split and style state active at the cut point is carried
//! into the window.

use super::token::Token;

/// Upper bound on passes over the token stream while filling one window.
const MAX_LAPS: usize = 3;

/// A token and the column at which it starts.
#[derive(Debug, Clone, Copy)]
struct PositionedToken<'a> {
    token: &'a Token,
    col: usize,
}

fn position_tokens(tokens: &[Token]) -> Vec<PositionedToken<'_>> {
    let mut col = 0;
    tokens
        .iter()
        .map(|token| {
            let positioned = PositionedToken { token, col };
            col += token.width();
            positioned
        })
        .collect()
}

/// Extracts `width` columns of `tokens` starting at column `offset`,
/// wrapping around to the start of the stream as needed.
///
/// `total_cols` must be the display width of `tokens`. Offsets at or past the
/// end are reduced modulo `total_cols`. The result opens with every style
/// directive that precedes the offset, so the window renders in the style
/// active at the cut point. A wide glyph that would cross the right edge is
/// replaced by a single space.
pub fn slice_columns(tokens: &[Token], total_cols: usize, offset: usize, width: usize) -> String {
    if total_cols == 0 {
        return String::new();
    }
    let offset = offset % total_cols;
    let positioned = position_tokens(tokens);
    let mut out = String::new();

    // Style preamble.
    for p in &positioned {
        if p.token.is_style() {
            if p.col <= offset {
                p.token.push_to(&mut out);
            }
        } else if p.col >= offset {
            break;
        }
    }

    let start = positioned
        .iter()
        .position(|p| !p.token.is_style() && p.col >= offset)
        .unwrap_or(0);

    let mut filled = 0;
    let mut idx = start;
    let mut laps = 0;
    while filled < width && laps < MAX_LAPS {
        while idx < positioned.len() && filled < width {
            let token = positioned[idx].token;
            let cols = token.width();
            if filled + cols > width {
                out.push(' ');
                filled = width;
                break;
            }
            token.push_to(&mut out);
            filled += cols;
            idx += 1;
        }
        idx = 0;
        laps += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::token::{text_width, tokenize};
    use crate::unicode::char_display_width;

    fn slice(text: &str, offset: usize, width: usize) -> String {
        let tokens = tokenize(text);
        slice_columns(&tokens, text_width(&tokens), offset, width)
    }

    /// Width of the glyphs in `s`, ignoring directives.
    fn visible_width(s: &str) -> usize {
        text_width(&tokenize(s))
    }

    #[test]
    fn empty_stream_yields_empty_string() {
        assert_eq!(slice_columns(&[], 0, 5, 10), "");
        assert_eq!(slice("#[bold]", 0, 10), "");
    }

    #[test]
    fn plain_window_at_offsets() {
        assert_eq!(slice("abcdef", 0, 3), "abc");
        assert_eq!(slice("abcdef", 2, 3), "cde");
        assert_eq!(slice("abcdef", 4, 3), "efa");
    }

    #[test]
    fn offset_past_end_wraps() {
        assert_eq!(slice("abcdef", 6, 3), "abc");
        assert_eq!(slice("abcdef", 8, 3), "cde");
    }

    #[test]
    fn preamble_carries_style_before_window() {
        assert_eq!(slice("#[fg=red]abcdef", 3, 2), "#[fg=red]de");
        assert_eq!(
            slice("a#[fg=red]bc#[bold]def", 4, 2),
            "#[fg=red]#[bold]ef"
        );
    }

    #[test]
    fn style_at_window_start_is_emitted_once() {
        // The fill loop starts at the glyph, so a directive sitting exactly
        // at the offset comes from the preamble only.
        assert_eq!(slice("ab#[bold]cd", 2, 2), "#[bold]cd");
    }

    #[test]
    fn styles_inside_window_stay_in_place() {
        assert_eq!(slice("ab#[bold]cd#[default]ef", 0, 6), "ab#[bold]cd#[default]ef");
    }

    #[test]
    fn wrap_replays_leading_styles() {
        assert_eq!(slice("#[fg=red]abc", 2, 3), "#[fg=red]c#[fg=red]ab");
    }

    #[test]
    fn wide_glyph_at_edge_becomes_space() {
        assert_eq!(slice("ab世c", 0, 3), "ab ");
        assert_eq!(visible_width(&slice("ab世c", 0, 3)), 3);
        assert_eq!(slice("ab世c", 2, 3), "世c");
    }

    #[test]
    fn offset_inside_wide_glyph_starts_at_next_glyph() {
        // Column 3 is the right half of '世'; the window starts at 'c'.
        assert_eq!(slice("ab世cd", 3, 2), "cd");
    }

    #[test]
    fn zero_width_viewport_emits_only_preamble() {
        assert_eq!(slice("#[bold]abc", 1, 0), "#[bold]");
        assert_eq!(slice("abc", 1, 0), "");
    }

    #[test]
    fn window_width_is_bounded_and_exact_when_content_is_long_enough() {
        let text = "#[fg=red]世界 hello #[bold]ｗｉｄｅ#[default] tail";
        let tokens = tokenize(text);
        let total = text_width(&tokens);
        for width in 0..=total {
            for offset in 0..total * 2 {
                let out = slice_columns(&tokens, total, offset, width);
                assert_eq!(visible_width(&out), width, "offset {offset} width {width}");
            }
        }
    }

    #[test]
    fn wide_glyphs_are_never_split() {
        let text = "世界世界x";
        let tokens = tokenize(text);
        let total = text_width(&tokens);
        for offset in 0..total {
            for width in 1..=total {
                let out = slice_columns(&tokens, total, offset, width);
                let glyph_cols: usize = out.chars().map(char_display_width).sum();
                assert!(glyph_cols <= width);
                // Only the trailing padding space may stand in for a wide glyph.
                let spaces = out.chars().filter(|&c| c == ' ').count();
                assert!(spaces <= 1, "offset {offset} width {width}: {out:?}");
            }
        }
    }

    #[test]
    fn offsets_are_invariant_modulo_total_width() {
        let text = "#[fg=blue]scroll 世 me#[default] ";
        let tokens = tokenize(text);
        let total = text_width(&tokens);
        for offset in 0..total {
            let base = slice_columns(&tokens, total, offset, 7);
            for k in 1..4 {
                assert_eq!(slice_columns(&tokens, total, offset + k * total, 7), base);
            }
        }
    }

    #[test]
    fn lap_cap_limits_fill_for_oversized_viewport() {
        // Three laps of a 2-column stream fill at most 6 columns.
        assert_eq!(slice("ab", 0, 10), "ababab");
        assert_eq!(slice("ab", 1, 10), "babab");
        assert_eq!(visible_width(&slice("ab", 1, 10)), 5);
    }

    #[test]
    fn viewport_equal_to_content_returns_rotation() {
        assert_eq!(slice("abcd", 1, 4), "bcda");
    }
}
