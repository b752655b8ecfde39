//! Renders long, styled text as a fixed-width scrolling marquee for a tmux
//! status line.
//!
//! Each call to the binary produces one frame. ANSI colour sequences on stdin
//! are translated into tmux `#[...]` directives, the text is windowed to the
//! requested width, and the scroll position is carried to the next call
//! through a small state file keyed by instance id.

pub mod ansi;
pub mod color;
pub mod config;
pub mod marquee;
pub mod state;
pub mod text;
pub mod unicode;
