// src/ansi/parser.rs

//! Translates lexer tokens into `AnsiCommand`s.
//!
//! Only CSI sequences are recognized. SGR sequences (final byte `m`) become
//! `SetGraphicsRendition` commands; every other CSI sequence is swallowed.
//! Characters outside escape sequences pass through as `Print`.

use super::commands::AnsiCommand;
use super::lexer::AnsiToken;
use log::trace;
use std::mem;

const ESC: u8 = 0x1B;

/// States for the translator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ParserState {
    /// Default state: characters pass through.
    #[default]
    Ground,
    /// Received ESC, waiting to see whether a CSI follows.
    Escape,
    /// Inside `ESC [`, collecting digits and `;` until a final character.
    CsiParam,
}

#[derive(Debug, Default)]
pub struct AnsiParser {
    state: ParserState,
    csi_params: Vec<u32>,
    current_param: u32,
    has_params: bool,
    commands: Vec<AnsiCommand>,
}

impl AnsiParser {
    pub fn new() -> Self {
        AnsiParser::default()
    }

    pub fn process_token(&mut self, token: AnsiToken) {
        match self.state {
            ParserState::Ground => self.handle_ground(token),
            ParserState::Escape => self.handle_escape(token),
            ParserState::CsiParam => self.handle_csi_param(token),
        }
    }

    pub fn take_commands(&mut self) -> Vec<AnsiCommand> {
        mem::take(&mut self.commands)
    }

    /// Flushes state at end of input.
    ///
    /// A lone trailing ESC is kept as a literal character; an unterminated
    /// CSI sequence is discarded.
    pub fn finalize(&mut self) {
        match self.state {
            ParserState::Ground => {}
            ParserState::Escape => self.commands.push(AnsiCommand::Print(ESC as char)),
            ParserState::CsiParam => {
                trace!("discarding unterminated CSI sequence at end of input");
                self.clear_csi_params();
            }
        }
        self.state = ParserState::Ground;
    }

    fn handle_ground(&mut self, token: AnsiToken) {
        match token {
            AnsiToken::C0Control(ESC) => {
                trace!("Ground -> Escape");
                self.state = ParserState::Escape;
            }
            AnsiToken::C0Control(byte) => self.commands.push(AnsiCommand::Print(byte as char)),
            AnsiToken::Print(c) => self.commands.push(AnsiCommand::Print(c)),
        }
    }

    fn handle_escape(&mut self, token: AnsiToken) {
        if token == AnsiToken::Print('[') {
            trace!("Escape -> CsiParam");
            self.clear_csi_params();
            self.state = ParserState::CsiParam;
            return;
        }
        // Not a CSI: the ESC is ordinary text and the token is reconsidered from ground.
        self.commands.push(AnsiCommand::Print(ESC as char));
        self.state = ParserState::Ground;
        self.handle_ground(token);
    }

    fn handle_csi_param(&mut self, token: AnsiToken) {
        match token {
            AnsiToken::Print(c @ '0'..='9') => {
                let digit = c as u32 - '0' as u32;
                self.current_param = self
                    .current_param
                    .saturating_mul(10)
                    .saturating_add(digit);
                self.has_params = true;
            }
            AnsiToken::Print(';') => {
                self.csi_params.push(self.current_param);
                self.current_param = 0;
                self.has_params = true;
            }
            AnsiToken::Print('m') => {
                if self.has_params {
                    self.csi_params.push(self.current_param);
                }
                trace!("CsiParam -> Ground (SGR {:?})", self.csi_params);
                let command = AnsiCommand::from_sgr(&self.csi_params);
                self.commands.push(command);
                self.clear_csi_params();
                self.state = ParserState::Ground;
            }
            other => {
                trace!("CsiParam -> Ground (dropping non-SGR CSI, final {:?})", other);
                self.clear_csi_params();
                self.state = ParserState::Ground;
            }
        }
    }

    fn clear_csi_params(&mut self) {
        self.csi_params.clear();
        self.current_param = 0;
        self.has_params = false;
    }
}
