//! Character display width lookup.
//!
//! Widths follow the East Asian Width tables shipped with the `unicode-width`
//! crate, in the non-CJK context (ambiguous-width characters are narrow).

use unicode_width::UnicodeWidthChar;

/// Public function to get the display width of a character.
///
/// # Returns
/// * `0` for combining marks, zero-width characters and control characters.
/// * `1` for standard-width printable characters.
/// * `2` for characters that typically occupy two terminal cells.
pub fn char_display_width(c: char) -> usize {
    // Control characters have no width in the table; they never advance the cursor.
    c.width().unwrap_or(0).min(2)
}
