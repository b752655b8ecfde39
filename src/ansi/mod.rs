// src/ansi/mod.rs

//! # ANSI to tmux style translation
//!
//! Converts raw bytes that may carry terminal escape sequences into text
//! annotated with tmux style directives (`#[fg=red,bold]`).
//!
//! ## Architecture: Two-Stage Pipeline
//!
//! ```text
//! Bytes              Lexer              Parser                 Output
//! (UTF-8)            (tokens)           (state machine)        (text)
//!    ↓                ↓                  ↓                      ↓
//! [0x1B,'[','3',  →  [C0Control(ESC), →  [SetGraphicsRendition  →  "#[fg=red]A"
//!  '1','m','A']       Print('['), ...]     ([Foreground(Red)]),
//!                                          Print('A')]
//! ```
//!
//! The lexer decodes UTF-8 (invalid input becomes U+FFFD) and separates C0
//! control bytes from printable characters. The parser recognizes
//! `ESC [ params final`: SGR sequences (`final == 'm'`) become style
//! directives, any other final character drops the whole sequence. An ESC
//! that does not start a CSI is kept as text.
//!
//! ## Incremental Processing
//!
//! `AnsiProcessor::process_bytes` may be called with arbitrary chunks; partial
//! UTF-8 and partial escape sequences are buffered until the next call.
//! `finish` flushes what is left at end of input.

pub mod commands;
mod lexer;
mod parser;

pub use commands::{AnsiCommand, Attribute};
use lexer::AnsiLexer;
use parser::AnsiParser;

/// Stateful processor combining the lexer (byte → token) and parser
/// (token → command).
#[derive(Debug, Default)]
pub struct AnsiProcessor {
    lexer: AnsiLexer,
    parser: AnsiParser,
}

impl AnsiProcessor {
    /// Creates a new processor in the ground state.
    pub fn new() -> Self {
        AnsiProcessor {
            lexer: AnsiLexer::new(),
            parser: AnsiParser::new(),
        }
    }

    /// Processes a chunk of bytes and returns every command completed by it.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Vec<AnsiCommand> {
        for byte in bytes {
            self.lexer.process_byte(*byte);
        }
        for token in self.lexer.take_tokens() {
            self.parser.process_token(token);
        }
        self.parser.take_commands()
    }

    /// Ends the stream, returning commands for any buffered input.
    pub fn finish(&mut self) -> Vec<AnsiCommand> {
        self.lexer.finalize();
        for token in self.lexer.take_tokens() {
            self.parser.process_token(token);
        }
        self.parser.finalize();
        self.parser.take_commands()
    }
}

/// Translates a complete byte buffer into tmux-annotated text.
pub fn ansi_to_tmux(bytes: &[u8]) -> String {
    let mut processor = AnsiProcessor::new();
    let mut commands = processor.process_bytes(bytes);
    commands.extend(processor.finish());

    let mut out = String::with_capacity(bytes.len());
    for command in &commands {
        command.write_to(&mut out);
    }
    out
}
