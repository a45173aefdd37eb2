// src/report.rs
// =============================================================================
// Errors found while checking documents, and the report that collects them.
//
// Every error is tied to exactly one (document, link) pair. We never merge
// or deduplicate: the same broken link in two documents is two errors.
//
// The report keeps the order it was built in: documents in discovery order,
// links in the order they appear inside each document.
// =============================================================================

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::checker::Link;

// What went wrong with a single link
//
// #[serde(tag = "type")] writes the variant name into a "type" field, and the
// rename attributes give each variant its stable code in the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ErrorKind {
    /// Internal link whose path doesn't end with '/'
    #[serde(rename = "internal.no-trailing-slash")]
    NoTrailingSlash,
    /// Internal link not written as a site-absolute path
    #[serde(rename = "internal.relative-url-forbidden")]
    RelativeUrlForbidden,
    /// Internal link whose index document doesn't exist on disk
    #[serde(rename = "internal.target-absent")]
    TargetAbsent,
    /// External link answered with 400 Bad Request
    #[serde(rename = "external.not-found")]
    NotFound { status: u16 },
    /// External link answered with any other non-success status
    #[serde(rename = "external.not-ok")]
    NotOk { status: u16 },
    /// The request itself failed (DNS, refused connection, timeout, ...)
    #[serde(rename = "external.transport-error")]
    TransportError { detail: String },
}

impl ErrorKind {
    // Stable machine-readable code, same as the JSON "type" field
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NoTrailingSlash => "internal.no-trailing-slash",
            ErrorKind::RelativeUrlForbidden => "internal.relative-url-forbidden",
            ErrorKind::TargetAbsent => "internal.target-absent",
            ErrorKind::NotFound { .. } => "external.not-found",
            ErrorKind::NotOk { .. } => "external.not-ok",
            ErrorKind::TransportError { .. } => "external.transport-error",
        }
    }

    // Human-readable description used in the text report
    pub fn description(&self) -> String {
        match self {
            ErrorKind::NoTrailingSlash => "found link without trailing slash".to_string(),
            ErrorKind::RelativeUrlForbidden => {
                "internal links must be written as site-absolute paths".to_string()
            }
            ErrorKind::TargetAbsent => "link to non-existent document".to_string(),
            ErrorKind::NotFound { status } => {
                format!("external link not found (HTTP {})", status)
            }
            ErrorKind::NotOk { status } => {
                format!("external link returned HTTP {}", status)
            }
            ErrorKind::TransportError { detail } => {
                format!("external link could not be fetched ({})", detail)
            }
        }
    }
}

// One error, attributed to the document and the link it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentError {
    /// Absolute path of the document containing the link
    pub document: PathBuf,
    /// The offending link, as written
    pub link: Link,
    #[serde(flatten)]
    pub kind: ErrorKind,
}

impl DocumentError {
    pub fn new(document: PathBuf, link: Link, kind: ErrorKind) -> Self {
        Self { document, link, kind }
    }
}

// Renders the error as one line: "<document> - <description>: <destination>"
impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {}",
            self.document.display(),
            self.kind.description(),
            self.link.destination
        )
    }
}

// All errors from one run, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckReport {
    errors: Vec<DocumentError>,
}

impl CheckReport {
    // Merges per-document error lists, keeping the order they're given in
    pub fn from_documents<I>(per_document: I) -> Self
    where
        I: IntoIterator<Item = Vec<DocumentError>>,
    {
        Self {
            errors: per_document.into_iter().flatten().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[DocumentError] {
        &self.errors
    }
}
