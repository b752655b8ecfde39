// src/main.rs

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{debug, warn};

use tmux_marquee::{
    config::Config,
    marquee::{prepare_content, Direction, Marquee},
    state::{FileStateStore, StateStore},
};

/// Scroll long text through a fixed-width tmux status line.
///
/// Reads text (ANSI colours allowed) from stdin and prints one frame.
#[derive(Parser, Debug)]
#[command(name = "tmux-marquee", version)]
struct Cli {
    /// Viewport width in columns [default: 30]
    #[arg(short, long)]
    width: Option<usize>,
    /// Instance id; each id keeps its own scroll position
    #[arg(short, long, default_value = "default")]
    id: String,
    /// Columns advanced per invocation [default: 1]
    #[arg(short, long)]
    speed: Option<usize>,
    /// Text shown between loops [default: " - "]
    #[arg(long)]
    separator: Option<String>,
    /// Scroll direction: left, right or bounce [default: left]
    #[arg(long)]
    direction: Option<String>,
    /// Pad text that fits with spaces (default)
    #[arg(long, overrides_with = "no_pad")]
    pad: bool,
    /// Print text that fits unchanged
    #[arg(long, overrides_with = "pad")]
    no_pad: bool,
    /// Invocations to hold at the start before scrolling [default: 0]
    #[arg(long)]
    scroll_delay: Option<usize>,
    /// Keep at most this many characters of input, 0 for no limit [default: 0]
    #[arg(long)]
    max_length: Option<usize>,
    /// Config file [default: $XDG_CONFIG_HOME/tmux-marquee/config.json]
    #[arg(long)]
    config: Option<PathBuf>,
    /// Forget the scroll position for this id and exit
    #[arg(long)]
    reset: bool,
}

impl Cli {
    /// Layers explicitly given flags over `config`.
    fn apply(&self, config: &mut Config) {
        let opts = &mut config.marquee;
        if let Some(width) = self.width {
            opts.width = width;
        }
        if let Some(speed) = self.speed {
            opts.speed = speed;
        }
        if let Some(separator) = &self.separator {
            opts.separator = separator.clone();
        }
        if let Some(direction) = &self.direction {
            opts.direction = Direction::from(direction.clone());
        }
        if self.pad {
            opts.pad = true;
        } else if self.no_pad {
            opts.pad = false;
        }
        if let Some(delay) = self.scroll_delay {
            opts.scroll_delay = delay;
        }
        if let Some(max_length) = self.max_length {
            config.input.max_length = max_length;
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        warn!("{e:#}, using defaults");
        Config::default()
    })
}

fn open_store(config: &Config) -> FileStateStore {
    let dir = config.state.resolved_dir();
    FileStateStore::open(&dir).unwrap_or_else(|e| {
        warn!("{e:#}");
        FileStateStore::new(dir)
    })
}

fn main() -> anyhow::Result<()> {
    // Status bars read stdout, so logs stay on stderr and quiet by default.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref());
    cli.apply(&mut config);
    debug!("effective config: {config:?}");

    let store = open_store(&config);
    store.maybe_sweep();

    if cli.reset {
        if let Err(e) = store.clear(&cli.id) {
            warn!("failed to reset '{}': {e:#}", cli.id);
        }
        return Ok(());
    }

    let mut raw = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut raw)
        .context("failed to read stdin")?;
    let text = prepare_content(&raw, config.input.max_length);

    let line = Marquee::new(config.marquee).step(&text, &cli.id, &store);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").context("failed to write stdout")?;
    stdout.flush().context("failed to write stdout")?;
    Ok(())
}
