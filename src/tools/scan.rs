//! Non-recursive directory listing.

use std::path::PathBuf;

use crate::constants::SCAN_MAX_ENTRIES;
use crate::error::{Error, Result};

/// List a directory: subdirectories first with a trailing `/`, each group
/// sorted, capped at [`SCAN_MAX_ENTRIES`] with a `+N more` notice.
///
/// An empty path means the current directory; a leading `~` expands to the
/// home directory.
pub fn scan_dir(path: &str) -> Result<String> {
    let target = resolve_target(path)?;
    if !target.exists() {
        return Err(Error::NotFound(format!(
            "directory '{}'",
            target.display()
        )));
    }

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(&target)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.path().is_dir() {
            dirs.push(format!("{name}/"));
        } else {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();

    let all: Vec<String> = dirs.into_iter().chain(files).collect();
    let shown = all.len().min(SCAN_MAX_ENTRIES);
    let mut output = all[..shown].join("\n");
    if all.len() > shown {
        output.push_str(&format!("\n... (+{} more)", all.len() - shown));
    }
    Ok(output)
}

fn resolve_target(path: &str) -> Result<PathBuf> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Ok(std::env::current_dir()?);
    }
    if let Some(rest) = trimmed.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return Ok(home.join(rest.trim_start_matches('/')));
        }
    }
    Ok(PathBuf::from(trimmed))
}
