//! Media listing for the serving boundary.
//!
//! The web layer is an external collaborator; the only contract the core
//! owes it is a listing of narration files to present. A missing directory
//! is an empty feed, not an error.

use std::path::Path;

use anyhow::Result;

/// List narration audio identifiers (`.mp3` file names), sorted by name.
pub fn list_media<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_mp3 = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("mp3"));
        if is_mp3 {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}
