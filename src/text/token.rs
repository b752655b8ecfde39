// src/text/token.rs

//! Splits annotated text into style and glyph tokens.

use crate::unicode::char_display_width;

const DIRECTIVE_OPEN: [char; 2] = ['#', '['];
const DIRECTIVE_CLOSE: char = ']';

/// One unit of annotated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A tmux style directive such as `#[fg=red,bold]`, kept verbatim.
    /// Occupies no columns.
    Style(String),
    /// A single codepoint and the number of columns it occupies.
    Glyph { ch: char, width: usize },
}

impl Token {
    /// Display width in columns. Style tokens are always zero.
    pub fn width(&self) -> usize {
        match self {
            Token::Style(_) => 0,
            Token::Glyph { width, .. } => *width,
        }
    }

    pub fn is_style(&self) -> bool {
        matches!(self, Token::Style(_))
    }

    /// Appends the token's text to `out`.
    pub fn push_to(&self, out: &mut String) {
        match self {
            Token::Style(directive) => out.push_str(directive),
            Token::Glyph { ch, .. } => out.push(*ch),
        }
    }
}

/// Tokenizes annotated text.
///
/// `#[` starts a style directive that runs through the first `]`. Without a
/// closing `]` anywhere after it, the `#` and `[` are ordinary glyphs.
pub fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    // Position of the last ']' lets an unterminated '#[' fall back without rescanning.
    let last_close = chars.iter().rposition(|&c| c == DIRECTIVE_CLOSE);

    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i..].starts_with(&DIRECTIVE_OPEN) && last_close.is_some_and(|end| end > i + 1) {
            if let Some(len) = chars[i + 2..].iter().position(|&c| c == DIRECTIVE_CLOSE) {
                let end = i + 2 + len;
                tokens.push(Token::Style(chars[i..=end].iter().collect()));
                i = end + 1;
                continue;
            }
        }
        let ch = chars[i];
        tokens.push(Token::Glyph {
            ch,
            width: char_display_width(ch),
        });
        i += 1;
    }
    tokens
}

/// Total display width: the sum of glyph widths.
pub fn text_width(tokens: &[Token]) -> usize {
    tokens.iter().map(Token::width).sum()
}

/// Concatenates every token's text, reproducing the tokenized input.
pub fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        token.push_to(&mut out);
    }
    out
}

/// Checksum of the visible text, ignoring style directives.
///
/// Used only to notice that the content changed between invocations.
pub fn content_hash(tokens: &[Token]) -> String {
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; 4];
    for token in tokens {
        if let Token::Glyph { ch, .. } = token {
            hasher.update(ch.encode_utf8(&mut buf).as_bytes());
        }
    }
    hasher.finalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char) -> Token {
        Token::Glyph {
            ch,
            width: char_display_width(ch),
        }
    }

    #[test]
    fn splits_styles_and_glyphs() {
        assert_eq!(
            tokenize("a#[fg=red]b"),
            vec![glyph('a'), Token::Style("#[fg=red]".into()), glyph('b')]
        );
    }

    #[test]
    fn directive_ends_at_first_close_bracket() {
        assert_eq!(
            tokenize("#[bold]]x"),
            vec![Token::Style("#[bold]".into()), glyph(']'), glyph('x')]
        );
    }

    #[test]
    fn unterminated_directive_is_literal() {
        assert_eq!(
            tokenize("x#[bold"),
            vec![
                glyph('x'),
                glyph('#'),
                glyph('['),
                glyph('b'),
                glyph('o'),
                glyph('l'),
                glyph('d')
            ]
        );
    }

    #[test]
    fn close_bracket_before_open_does_not_count() {
        let tokens = tokenize("]#[");
        assert!(tokens.iter().all(|t| !t.is_style()));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn empty_directive_is_a_style_token() {
        assert_eq!(tokenize("#[]"), vec![Token::Style("#[]".into())]);
    }

    #[test]
    fn lone_hash_is_a_glyph() {
        assert_eq!(tokenize("#1 [x]"), vec![
            glyph('#'),
            glyph('1'),
            glyph(' '),
            glyph('['),
            glyph('x'),
            glyph(']')
        ]);
    }

    #[test]
    fn width_ignores_interleaved_styles() {
        let plain = tokenize("ab世c");
        let styled = tokenize("#[bold]a#[fg=red]b#[default]世#[reverse]c#[default]");
        assert_eq!(text_width(&plain), 5);
        assert_eq!(text_width(&styled), 5);
    }

    #[test]
    fn joining_tokens_reproduces_input() {
        for input in [
            "",
            "plain",
            "#[fg=colour200,bold]wide 世界#[default] tail",
            "#[a]#[b]#[c]",
            "broken #[ directive",
        ] {
            assert_eq!(join_tokens(&tokenize(input)), input);
        }
    }

    #[test]
    fn content_hash_ignores_styles() {
        let plain = content_hash(&tokenize("hello"));
        let styled = content_hash(&tokenize("#[fg=red]hel#[bold]lo#[default]"));
        assert_eq!(plain, styled);
        assert_ne!(plain, content_hash(&tokenize("hellO")));
    }

    #[test]
    fn content_hash_is_crc32_decimal() {
        // CRC-32/IEEE of "123456789" is 0xCBF43926.
        assert_eq!(content_hash(&tokenize("123456789")), "3421780262");
    }
}
