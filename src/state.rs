// src/state.rs

//! Keyed storage for scroll state.
//!
//! Each marquee instance owns one small `<id>.state` file. A record is
//! three lines: content hash, position and delay counter. Writes go to a
//! temporary file that is renamed into place, so concurrent readers see
//! either the old record or the new one.

use crate::marquee::ScrollState;
use anyhow::{Context, Result};
use log::{debug, trace, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Files untouched for longer than this are removed by `sweep_stale`.
pub const STALE_AFTER: Duration = Duration::from_secs(60 * 60);
/// A sweep runs on average once per this many invocations.
pub const SWEEP_ONE_IN: u32 = 100;

const STATE_DIR_NAME: &str = "tmux-marquee";
const STATE_FILE_EXT: &str = ".state";
const TMP_MARKER: &str = ".tmp.";

/// Storage for per-instance scroll state.
pub trait StateStore {
    /// Returns the stored state, or `None` if nothing usable is stored.
    fn load(&self, id: &str) -> Result<Option<ScrollState>>;
    /// Atomically replaces the stored state.
    fn save(&self, id: &str, state: &ScrollState) -> Result<()>;
    /// Removes the stored state. Removing absent state is not an error.
    fn clear(&self, id: &str) -> Result<()>;
}

impl ScrollState {
    /// Parses the three-line record. Unparsable numbers read as 0; a record
    /// with fewer than three lines is treated as absent.
    pub fn parse_record(data: &str) -> Option<Self> {
        let lines: Vec<&str> = data.split('\n').collect();
        if lines.len() < 3 {
            return None;
        }
        Some(ScrollState {
            content_hash: lines[0].to_string(),
            position: lines[1].trim().parse().unwrap_or(0),
            delay_counter: lines[2].trim().parse().unwrap_or(0),
        })
    }

    pub fn to_record(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            self.content_hash, self.position, self.delay_counter
        )
    }
}

/// Default state directory: `$XDG_RUNTIME_DIR/tmux-marquee`, then
/// `$TMPDIR/tmux-marquee`, then `/tmp/tmux-marquee`.
pub fn default_state_dir() -> PathBuf {
    ["XDG_RUNTIME_DIR", "TMPDIR"]
        .iter()
        .filter_map(|var| std::env::var_os(var))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(STATE_DIR_NAME)
}

/// Maps an instance id onto a safe file name ending in `.state`.
fn file_name_for(id: &str) -> String {
    let mut name: String = id
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();
    if name.is_empty() {
        name.push('_');
    }
    name.push_str(STATE_FILE_EXT);
    name
}

/// True for names `save` writes: `<name>.state` and `<name>.state.tmp.<pid>`.
fn is_store_file(name: &str) -> bool {
    if name.ends_with(STATE_FILE_EXT) {
        return name.len() > STATE_FILE_EXT.len();
    }
    name.rsplit_once(TMP_MARKER).is_some_and(|(base, pid)| {
        base.ends_with(STATE_FILE_EXT) && !pid.is_empty() && pid.bytes().all(|b| b.is_ascii_digit())
    })
}

/// `StateStore` backed by one file per id in a directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Uses `dir` as is, without touching the filesystem.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStateStore { dir: dir.into() }
    }

    /// Creates `dir` (mode 0700 on Unix) if needed and returns a store over it.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(dir);
        create_private_dir(&store.dir)
            .with_context(|| format!("failed to create state dir {}", store.dir.display()))?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(file_name_for(id))
    }

    /// Removes state files not modified within `max_age`. Other files in the
    /// directory are never touched. Returns how many were removed.
    pub fn sweep_stale(&self, max_age: Duration) -> Result<usize> {
        let cutoff = SystemTime::now()
            .checked_sub(max_age)
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read state dir {}", self.dir.display()))?;

        let mut removed = 0;
        for entry in entries.flatten() {
            if !entry.file_name().to_str().is_some_and(is_store_file) {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            if meta.is_dir() {
                continue;
            }
            let Ok(modified) = meta.modified() else { continue };
            if modified < cutoff {
                match fs::remove_file(entry.path()) {
                    Ok(()) => removed += 1,
                    Err(e) => warn!("failed to remove stale {}: {e}", entry.path().display()),
                }
            }
        }
        debug!("swept {removed} stale state files");
        Ok(removed)
    }

    /// Runs `sweep_stale` on roughly one call in `SWEEP_ONE_IN`.
    pub fn maybe_sweep(&self) {
        if rand::random_range(0..SWEEP_ONE_IN) != 0 {
            return;
        }
        if let Err(e) = self.sweep_stale(STALE_AFTER) {
            warn!("stale state sweep failed: {e:#}");
        }
    }
}

impl StateStore for FileStateStore {
    fn load(&self, id: &str) -> Result<Option<ScrollState>> {
        let path = self.path_for(id);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(ScrollState::parse_record(&data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn save(&self, id: &str, state: &ScrollState) -> Result<()> {
        let path = self.path_for(id);
        let tmp = self
            .dir
            .join(format!("{}{TMP_MARKER}{}", file_name_for(id), std::process::id()));
        fs::write(&tmp, state.to_record())
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("failed to replace {}", path.display()));
        }
        trace!("saved {:?} to {}", state, path.display());
        Ok(())
    }

    fn clear(&self, id: &str) -> Result<()> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}
