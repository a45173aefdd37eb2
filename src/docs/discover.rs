// src/docs/discover.rs
// =============================================================================
// Walks a directory tree and returns every document in it.
//
// Discovery is synchronous and runs before any checking starts. A root that
// doesn't exist is a configuration error for the whole run; an entry we can't
// read somewhere below the root is only skipped with a warning.
// =============================================================================

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

// Finds all documents under `root` with the given extension
//
// Parameters:
//   root: documentation root directory (must exist)
//   extension: file extension without the dot, e.g. "md"
//
// Returns: absolute paths, sorted by file name within each directory.
//   An empty Vec is fine (nothing to check).
pub fn discover_documents(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Documentation root '{}' does not exist", root.display()))?;
    if !root.is_dir() {
        bail!("Documentation root '{}' is not a directory", root.display());
    }

    // Hidden files and directories (.vuepress/, .draft.md, ...) are skipped,
    // the root itself is kept even if its name starts with a dot
    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    let mut documents = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new(extension)) {
            documents.push(entry.into_path());
        }
    }

    debug!("Found {} document(s) under {}", documents.len(), root.display());
    Ok(documents)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
