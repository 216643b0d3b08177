//! Utility functions for directory lookup and file output
//!
//! # Directory Structure
//!
//! - Config: `~/.config/forticonf/` - Dialect settings (`config.json`)

use directories::ProjectDirs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "forticonf", "forticonf").map(|pd| pd.config_dir().to_path_buf())
}

/// Replaces `path` with `contents` using a temp file in the same directory
/// followed by a rename, so readers never observe a half-written file.
///
/// # Errors
///
/// Returns `Err` if the temp file cannot be created, written, or renamed.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
