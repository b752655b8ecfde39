// src/ansi/lexer.rs

//! ANSI escape sequence lexer.
//! Converts a byte stream into `AnsiToken`s, processing byte by byte,
//! handling UTF-8 decoding and state across calls.

use log::{trace, warn};
use std::{mem, str};

/// Unicode replacement character (U+FFFD).
/// Used when encountering invalid UTF-8 sequences.
const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

const ESC_BYTE: u8 = 0x1B;
const DEL_BYTE: u8 = 0x7F;

// --- Constants for UTF-8 byte classification (used by Utf8Decoder) ---
const UTF8_ASCII_MAX: u8 = 0x7F;
const UTF8_CONT_MIN: u8 = 0x80;
const UTF8_CONT_MAX: u8 = 0xBF;
const UTF8_2_BYTE_MIN: u8 = 0xC2; // Excludes overlong 0xC0, 0xC1
const UTF8_3_BYTE_MIN: u8 = 0xE0;
const UTF8_4_BYTE_MIN: u8 = 0xF0;
const UTF8_4_BYTE_MAX: u8 = 0xF4; // Max valid start for 4-byte sequence (RFC 3629)

/// Represents the outcome of a single byte being processed by the Utf8Decoder.
#[derive(Debug, PartialEq, Eq)]
enum Utf8DecodeResult {
    Decoded(char),
    InvalidSequence,
    NeedsMoreBytes,
}

/// Represents a single token identified by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiToken {
    /// A character decoded from UTF-8, including printable ASCII.
    Print(char),
    /// A C0 control code (0x00 - 0x1F) or DEL (0x7F).
    C0Control(u8),
}

/// Internal state machine for decoding UTF-8 byte streams incrementally.
#[derive(Debug, Clone, Default)]
struct Utf8Decoder {
    buffer: [u8; 4],
    len: usize,
    expected: usize,
}

impl Utf8Decoder {
    #[inline]
    fn reset(&mut self) {
        self.len = 0;
        self.expected = 0;
    }

    fn is_pending(&self) -> bool {
        self.len > 0
    }

    fn decode(&mut self, byte: u8) -> Utf8DecodeResult {
        if self.len == 0 {
            return self.decode_first_byte(byte);
        }
        self.decode_continuation_byte(byte)
    }

    #[inline]
    fn decode_first_byte(&mut self, byte: u8) -> Utf8DecodeResult {
        let expected = match byte {
            0x00..=UTF8_ASCII_MAX => return Utf8DecodeResult::Decoded(byte as char),
            UTF8_2_BYTE_MIN..=0xDF => 2,
            UTF8_3_BYTE_MIN..=0xEF => 3,
            UTF8_4_BYTE_MIN..=UTF8_4_BYTE_MAX => 4,
            // 0x80-0xC1 (continuation / overlong) and 0xF5-0xFF
            _ => {
                warn!("invalid utf8 start byte: {:X?}", byte);
                self.reset();
                return Utf8DecodeResult::InvalidSequence;
            }
        };
        self.expected = expected;
        self.buffer[0] = byte;
        self.len = 1;
        Utf8DecodeResult::NeedsMoreBytes
    }

    #[inline]
    fn decode_continuation_byte(&mut self, byte: u8) -> Utf8DecodeResult {
        if !(UTF8_CONT_MIN..=UTF8_CONT_MAX).contains(&byte) {
            self.reset();
            return Utf8DecodeResult::InvalidSequence;
        }

        self.buffer[self.len] = byte;
        self.len += 1;

        if self.len != self.expected {
            return Utf8DecodeResult::NeedsMoreBytes;
        }

        // `from_utf8` rejects overlong encodings and surrogates.
        let decoded = str::from_utf8(&self.buffer[..self.len])
            .ok()
            .and_then(|s| s.chars().next());
        self.reset();

        match decoded {
            Some(c) => Utf8DecodeResult::Decoded(c),
            None => Utf8DecodeResult::InvalidSequence,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnsiLexer {
    tokens: Vec<AnsiToken>,
    utf8_decoder: Utf8Decoder,
}

impl AnsiLexer {
    pub fn new() -> Self {
        AnsiLexer::default()
    }

    /// C0 codes and DEL. These always interrupt a pending UTF-8 sequence.
    #[inline]
    fn is_control_code(byte: u8) -> bool {
        byte <= 0x1F || byte == DEL_BYTE
    }

    fn process_byte_as_new_token(&mut self, byte: u8) {
        if Self::is_control_code(byte) {
            self.tokens.push(AnsiToken::C0Control(byte));
            return;
        }
        match self.utf8_decoder.decode(byte) {
            Utf8DecodeResult::Decoded(c) => self.tokens.push(AnsiToken::Print(c)),
            Utf8DecodeResult::NeedsMoreBytes => {}
            Utf8DecodeResult::InvalidSequence => {
                self.tokens.push(AnsiToken::Print(REPLACEMENT_CHARACTER));
            }
        }
    }

    pub fn process_byte(&mut self, byte: u8) {
        if !self.utf8_decoder.is_pending() {
            self.process_byte_as_new_token(byte);
            return;
        }

        if Self::is_control_code(byte) {
            if byte == ESC_BYTE {
                warn!("encountered ESC mid utf8 stream");
            }
            self.tokens.push(AnsiToken::Print(REPLACEMENT_CHARACTER));
            self.utf8_decoder.reset();
            self.process_byte_as_new_token(byte);
            return;
        }

        match self.utf8_decoder.decode(byte) {
            Utf8DecodeResult::Decoded(c) => self.tokens.push(AnsiToken::Print(c)),
            Utf8DecodeResult::NeedsMoreBytes => {}
            Utf8DecodeResult::InvalidSequence => {
                // The buffered prefix is broken; `byte` starts over from ground.
                self.tokens.push(AnsiToken::Print(REPLACEMENT_CHARACTER));
                self.process_byte_as_new_token(byte);
            }
        }
    }

    pub fn take_tokens(&mut self) -> Vec<AnsiToken> {
        trace!("taking {} tokens from lexer", self.tokens.len());
        mem::take(&mut self.tokens)
    }

    /// Finalizes any incomplete UTF-8 sequence at end of stream.
    pub fn finalize(&mut self) {
        if self.utf8_decoder.is_pending() {
            self.tokens.push(AnsiToken::Print(REPLACEMENT_CHARACTER));
            self.utf8_decoder.reset();
        }
    }
}
