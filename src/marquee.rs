// src/marquee.rs

//! One rendering step of the marquee.
//!
//! Each invocation renders a single frame and hands back the scroll state for
//! the next one. Nothing is kept in memory between invocations; the caller
//! persists the returned `StateUpdate` through a `StateStore`.

use crate::ansi::ansi_to_tmux;
use crate::state::StateStore;
use crate::text::{content_hash, slice_columns, text_width, tokenize};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scroll direction of the marquee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// Text moves right to left, looping through the separator.
    #[default]
    Left,
    /// Text moves left to right, looping through the separator.
    Right,
    /// Text moves back and forth without looping.
    Bounce,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "bounce" => Ok(Direction::Bounce),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Unknown names fall back to `Left`.
impl From<String> for Direction {
    fn from(name: String) -> Self {
        name.parse().unwrap_or_else(|e| {
            warn!("{e}, scrolling left");
            Direction::Left
        })
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.to_string()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Bounce => "bounce",
        };
        f.write_str(name)
    }
}

/// Options controlling how a frame is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeOptions {
    /// Viewport width in columns.
    pub width: usize,
    /// Columns advanced per invocation.
    pub speed: usize,
    /// Text inserted between loop iterations (left/right only).
    pub separator: String,
    pub direction: Direction,
    /// Right-pad text that fits the viewport with spaces.
    pub pad: bool,
    /// Invocations to hold at offset 0 before scrolling starts.
    pub scroll_delay: usize,
}

impl Default for MarqueeOptions {
    fn default() -> Self {
        MarqueeOptions {
            width: 30,
            speed: 1,
            separator: " - ".to_string(),
            direction: Direction::Left,
            pad: true,
            scroll_delay: 0,
        }
    }
}

/// Persisted scroll position for one marquee instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollState {
    /// Checksum of the content the position refers to.
    pub content_hash: String,
    pub position: usize,
    pub delay_counter: usize,
}

impl ScrollState {
    /// Fresh state for newly seen content.
    pub fn new(content_hash: String) -> Self {
        ScrollState {
            content_hash,
            position: 0,
            delay_counter: 0,
        }
    }
}

/// What the caller should do with the stored state after a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate {
    /// No scrolling is in progress; forget any stored state.
    Clear,
    /// Store this state for the next invocation.
    Save(ScrollState),
}

/// One rendered line plus the state transition that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub line: String,
    pub update: StateUpdate,
}

/// Turns raw input into the annotated text the marquee scrolls.
///
/// Trailing newlines are dropped, ANSI SGR sequences are translated to tmux
/// directives, and the result is cut to `max_length` codepoints (0 keeps
/// everything).
pub fn prepare_content(raw: &[u8], max_length: usize) -> String {
    let end = raw.iter().rposition(|&b| b != b'\n').map_or(0, |i| i + 1);
    let text = ansi_to_tmux(&raw[..end]);
    if max_length == 0 {
        return text;
    }
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

/// Folds a position into a triangle wave over `0..=range`.
fn bounce_offset(position: usize, range: usize) -> usize {
    let cycle = range * 2;
    let pos = position % cycle;
    if pos > range {
        cycle - pos
    } else {
        pos
    }
}

#[derive(Debug, Clone, Default)]
pub struct Marquee {
    options: MarqueeOptions,
}

impl Marquee {
    pub fn new(options: MarqueeOptions) -> Self {
        Marquee { options }
    }

    /// Renders one frame of `text`.
    ///
    /// `load_prior` is only called when the text actually needs scrolling.
    pub fn render(&self, text: &str, load_prior: impl FnOnce() -> Option<ScrollState>) -> Frame {
        let opts = &self.options;
        if text.is_empty() {
            return Frame {
                line: String::new(),
                update: StateUpdate::Clear,
            };
        }

        let tokens = tokenize(text);
        let text_cols = text_width(&tokens);
        if text_cols <= opts.width {
            let mut line = text.to_string();
            if opts.pad {
                line.push_str(&" ".repeat(opts.width - text_cols));
            }
            return Frame {
                line,
                update: StateUpdate::Clear,
            };
        }

        let hash = content_hash(&tokens);
        let state = match load_prior() {
            Some(prior) if prior.content_hash == hash => prior,
            Some(_) => {
                debug!("content changed, restarting scroll");
                ScrollState::new(hash)
            }
            None => ScrollState::new(hash),
        };

        if opts.scroll_delay > 0 && state.delay_counter < opts.scroll_delay {
            let line = slice_columns(&tokens, text_cols, 0, opts.width);
            return Frame {
                line,
                update: StateUpdate::Save(ScrollState {
                    position: 0,
                    delay_counter: state.delay_counter + 1,
                    content_hash: state.content_hash,
                }),
            };
        }

        let (line, position, cycle) = match opts.direction {
            Direction::Bounce => {
                let range = text_cols.saturating_sub(opts.width).max(1);
                let cycle = range * 2;
                let position = state.position % cycle;
                let offset = bounce_offset(position, range);
                (
                    slice_columns(&tokens, text_cols, offset, opts.width),
                    position,
                    cycle,
                )
            }
            Direction::Left | Direction::Right => {
                let scroll_tokens = tokenize(&format!("{text}{}", opts.separator));
                let scroll_cols = text_width(&scroll_tokens);
                let position = state.position % scroll_cols;
                let offset = if opts.direction == Direction::Right {
                    (scroll_cols - position) % scroll_cols
                } else {
                    position
                };
                (
                    slice_columns(&scroll_tokens, scroll_cols, offset, opts.width),
                    position,
                    scroll_cols,
                )
            }
        };

        Frame {
            line,
            update: StateUpdate::Save(ScrollState {
                // position < cycle, so this cannot overflow for any speed.
                position: (position + opts.speed % cycle) % cycle,
                delay_counter: state.delay_counter,
                content_hash: state.content_hash,
            }),
        }
    }

    /// Renders one frame for instance `id`, reading and writing its state
    /// through `store`. Store failures are logged and treated as absent state.
    pub fn step<S: StateStore>(&self, text: &str, id: &str, store: &S) -> String {
        let frame = self.render(text, || {
            store.load(id).unwrap_or_else(|e| {
                warn!("failed to load state for '{id}': {e:#}");
                None
            })
        });
        let result = match &frame.update {
            StateUpdate::Clear => store.clear(id),
            StateUpdate::Save(state) => store.save(id, state),
        };
        if let Err(e) = result {
            warn!("failed to update state for '{id}': {e:#}");
        }
        frame.line
    }
}
