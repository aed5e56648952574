//! Working-directory scan for an EPUB to process.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Return the first entry in `dir` whose name ends in `.epub`.
///
/// The match is case-sensitive and the order is whatever the OS yields
/// from the directory listing. The returned path is the bare file name,
/// so callers resolve it relative to the scanned directory.
pub fn find_first_epub(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read an entry in {}", dir.display()))?;
        let name = entry.file_name();
        if name.to_string_lossy().ends_with(".epub") {
            debug!(file = %name.to_string_lossy(), "Matched EPUB extension");
            return Ok(Some(PathBuf::from(name)));
        }
    }

    Ok(None)
}
