//! Recursive regex search across workspace files.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::constants::{BINARY_DETECTION_BYTES, SEARCH_MAX_MATCHES};
use crate::error::{Error, Result};

/// Search files under `root` for lines matching `pattern`.
///
/// Hidden directories, `target/`, `node_modules/`, and binary files are
/// skipped. An optional glob pattern filters which files are searched.
/// Results are `path:line:content`, capped at [`SEARCH_MAX_MATCHES`].
pub fn search_files(pattern: &str, root: &Path, include: Option<&str>) -> Result<Vec<String>> {
    let regex =
        Regex::new(pattern).map_err(|e| Error::Syntax(format!("invalid regex: {e}")))?;

    if !root.exists() {
        return Err(Error::NotFound(format!("directory '{}'", root.display())));
    }

    let include_pattern = include.and_then(|pat| {
        let full = root.join("**").join(pat);
        glob::Pattern::new(&full.to_string_lossy()).ok()
    });

    let mut matches = Vec::new();
    walk_and_search(root, root, &regex, &include_pattern, &mut matches);
    Ok(matches)
}

/// Recursively walk directories, searching files for regex matches.
fn walk_and_search(
    root: &Path,
    dir: &Path,
    regex: &Regex,
    include: &Option<glob::Pattern>,
    matches: &mut Vec<String>,
) {
    if matches.len() >= SEARCH_MAX_MATCHES {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return, // silently skip unreadable dirs
    };

    let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        if matches.len() >= SEARCH_MAX_MATCHES {
            return;
        }

        let path = entry.path();
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        if path.is_dir() {
            if name.starts_with('.') || name == "target" || name == "node_modules" {
                continue;
            }
            walk_and_search(root, &path, regex, include, matches);
        } else if path.is_file() {
            if let Some(ref pattern) = include {
                if !pattern.matches_path(&path) {
                    continue;
                }
            }
            search_file(root, &path, regex, matches);
        }
    }
}

/// Search a single file, appending results as `path:line:content`.
fn search_file(root: &Path, path: &PathBuf, regex: &Regex, matches: &mut Vec<String>) {
    // Read file, silently skip binary/unreadable
    let content = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return,
    };

    // Check for binary content (null bytes in first 8KB)
    let check_len = content.len().min(BINARY_DETECTION_BYTES);
    if content[..check_len].contains(&0) {
        return;
    }

    let text = match String::from_utf8(content) {
        Ok(s) => s,
        Err(_) => return,
    };

    let relative = path.strip_prefix(root).unwrap_or(path);

    for (line_num, line) in text.lines().enumerate() {
        if matches.len() >= SEARCH_MAX_MATCHES {
            return;
        }
        if regex.is_match(line) {
            matches.push(format!("{}:{}:{}", relative.display(), line_num + 1, line));
        }
    }
}
