// src/config.rs

//! Defines the configuration structures for `tmux-marquee`.
//!
//! Settings come from three layers: built-in defaults, an optional JSON
//! config file, and command-line flags. Each later layer overrides the one
//! before it. The file is read from `$XDG_CONFIG_HOME/tmux-marquee/config.json`
//! (falling back to `$HOME/.config/...`) unless a path is given explicitly.
//!
//! Example file:
//!
//! ```json
//! {
//!   "marquee": { "width": 40, "direction": "bounce", "scroll_delay": 3 },
//!   "input": { "max_length": 200 }
//! }
//! ```

use crate::marquee::MarqueeOptions;
use crate::state::default_state_dir;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "tmux-marquee";
const CONFIG_FILE_NAME: &str = "config.json";

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Layout and animation settings.
    pub marquee: MarqueeOptions,
    /// Input handling.
    pub input: InputConfig,
    /// Where scroll state is kept.
    pub state: StateConfig,
}

/// Settings applied to the text before it is rendered.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum number of codepoints kept from the input. 0 keeps everything.
    pub max_length: usize,
}

/// Scroll state storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StateConfig {
    /// Directory for state files. `None` selects the runtime directory.
    pub dir: Option<PathBuf>,
}

impl StateConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_state_dir)
    }
}

impl Config {
    /// Loads the config from the default location. A missing file yields the
    /// defaults.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid config at {}", path.display()))
    }
}

/// `$XDG_CONFIG_HOME/tmux-marquee/config.json`, else
/// `$HOME/.config/tmux-marquee/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .filter(|v| !v.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })?;
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marquee::Direction;

    #[test]
    fn defaults_match_cli_defaults() {
        let config = Config::default();
        assert_eq!(config.marquee.width, 30);
        assert_eq!(config.marquee.speed, 1);
        assert_eq!(config.marquee.separator, " - ");
        assert_eq!(config.marquee.direction, Direction::Left);
        assert!(config.marquee.pad);
        assert_eq!(config.marquee.scroll_delay, 0);
        assert_eq!(config.input.max_length, 0);
        assert_eq!(config.state.dir, None);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"marquee": {"width": 40, "direction": "bounce"}, "state": {"dir": "/run/m"}}"#,
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.marquee.width, 40);
        assert_eq!(config.marquee.direction, Direction::Bounce);
        assert_eq!(config.marquee.speed, 1);
        assert_eq!(config.state.resolved_dir(), PathBuf::from("/run/m"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
    }
}
