// src/text/mod.rs

//! Tokenizing and windowing of tmux-annotated text.

pub mod token;
pub mod window;

pub use token::{content_hash, join_tokens, text_width, tokenize, Token};
pub use window::slice_columns;
