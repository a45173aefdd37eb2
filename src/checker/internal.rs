// src/checker/internal.rs
// =============================================================================
// Validates links that point at our own site.
//
// Rules, checked in this order (only the first violation is reported):
// 1. The link must be written site-absolute: starting with '/', but not "//"
// 2. Its path must end with '/' (every target is a directory-style document)
// 3. The target directory must contain the index document (README.md)
//
// Example:
//   root = /repo/docs, link = "/guide/setup/"
//   target = /repo/docs/guide/setup/README.md
// =============================================================================

use std::path::{Path, PathBuf};

use crate::report::ErrorKind;

// Checks one internal link
//
// Parameters:
//   root: the documentation root directory
//   index_document: file name that represents a directory ("README.md")
//   destination: the link destination exactly as written
//
// Returns: None if the link is fine, otherwise the first rule it breaks
pub async fn check_internal_link(
    root: &Path,
    index_document: &str,
    destination: &str,
) -> Option<ErrorKind> {
    // "//host/path" starts with '/' but is protocol-relative, not site-absolute
    if !destination.starts_with('/') || destination.starts_with("//") {
        return Some(ErrorKind::RelativeUrlForbidden);
    }

    let path = strip_query_and_fragment(destination);
    if !path.ends_with('/') {
        return Some(ErrorKind::NoTrailingSlash);
    }

    let target = target_path(root, index_document, path);
    // An error while checking (e.g. permission denied) counts as absent
    match tokio::fs::try_exists(&target).await {
        Ok(true) => None,
        _ => Some(ErrorKind::TargetAbsent),
    }
}

// Builds <root>/<path without leading '/'>/<index_document>
fn target_path(root: &Path, index_document: &str, path: &str) -> PathBuf {
    let mut target = root.to_path_buf();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        target.push(segment);
    }
    target.push(index_document);
    target
}

// "/guide/?tab=1#intro" -> "/guide/"
fn strip_query_and_fragment(destination: &str) -> &str {
    match destination.find(|c: char| c == '?' || c == '#') {
        Some(end) => &destination[..end],
        None => destination,
    }
}
