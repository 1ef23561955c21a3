//! Configuration file discovery and loading.
//!
//! The rc file holds directive tokens — the same `key=value` grammar the
//! command line and wire messages use — separated by whitespace, with `#`
//! starting a comment that runs to end of line. It is consulted once at
//! startup, and only when the command line supplied no
//! update-mask-producing directives.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use tracing::debug;

/// Locate the rc file, checking in order:
/// 1. the platform config directory (`~/.config/brim/brimrc` on Unix)
/// 2. `~/.brimrc`
pub fn config_file() -> Option<PathBuf> {
    if let Some(dirs) = ProjectDirs::from("", "", "brim") {
        let path = dirs.config_dir().join("brimrc");
        if path.is_file() {
            return Some(path);
        }
    }
    if let Some(dirs) = BaseDirs::new() {
        let path = dirs.home_dir().join(".brimrc");
        if path.is_file() {
            return Some(path);
        }
    }
    None
}

/// Load directive tokens from the rc file. An absent file is not an
/// error; an unreadable one is.
pub fn load_directives() -> Result<Vec<String>> {
    let Some(path) = config_file() else {
        debug!("no rc file found");
        return Ok(Vec::new());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    debug!(path = %path.display(), "loaded rc file");
    Ok(tokenize(&text))
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in text.lines() {
        let line = line.split('#').next().unwrap_or("");
        tokens.extend(line.split_whitespace().map(str::to_string));
    }
    tokens
}
