// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - markdown: Extracts links from Markdown text
// - classify: Decides internal vs external for each link
// - internal: Validates links pointing at our own site
// - http: Probes external links over the network
//
// This file ties them together:
// - check_link: classify one link and run the matching validator
// - check_content / check_document: every link of one document, in order
// - check_documents: all documents concurrently, report in discovery order
// =============================================================================

mod classify;
mod http;
mod internal;
mod markdown;

pub use classify::{classify, Classification};
pub use http::Prober;
pub use internal::check_internal_link;
pub use markdown::{extract_markdown_links, Link};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use log::{debug, info};
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

use crate::config::Settings;
use crate::report::{CheckReport, DocumentError, ErrorKind};

// Everything needed to check links, shared by all document tasks
//
// Nothing in here is mutated during a run; each document task only reads it
// and produces its own error list.
#[derive(Debug)]
pub struct Checker {
    root: PathBuf,
    origin: Url,
    index_document: String,
    exclude: Vec<Regex>,
    max_concurrency: Option<usize>,
    prober: Prober,
}

impl Checker {
    // Builds a checker (and its HTTP client) from resolved settings
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            root: settings.root.clone(),
            origin: settings.origin.clone(),
            index_document: settings.index_document.clone(),
            exclude: settings.exclude.clone(),
            max_concurrency: settings.max_concurrency,
            prober: Prober::new(settings.timeout, &settings.user_agent)?,
        })
    }

    // Checks every document and merges the results into one report
    //
    // All documents run concurrently (on the current thread, overlapping
    // only while waiting on I/O). `max_concurrency` caps how many are in
    // flight; unset means all of them at once.
    //
    // The report is ordered by the `documents` order, not completion order,
    // because `buffered` yields results in the order the futures were given.
    pub async fn check_documents(&self, documents: &[PathBuf]) -> Result<CheckReport> {
        let limit = match self.max_concurrency {
            Some(limit) if limit > 0 => limit,
            _ => documents.len().max(1),
        };
        info!(
            "Checking {} document(s), up to {} at a time",
            documents.len(),
            limit
        );

        let results: Vec<Result<Vec<DocumentError>>> = stream::iter(documents)
            .map(|document| self.check_document(document))
            .buffered(limit)
            .collect()
            .await;

        let per_document = results.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(CheckReport::from_documents(per_document))
    }

    // Reads one document from disk and checks all its links
    //
    // A document we can't read is a fatal error for the whole run
    pub async fn check_document(&self, document: &Path) -> Result<Vec<DocumentError>> {
        let bytes = tokio::fs::read(document)
            .await
            .with_context(|| format!("Failed to read document {}", document.display()))?;
        let content = String::from_utf8_lossy(&bytes);

        Ok(self.check_content(document, &content).await)
    }

    // Checks all links of one document, one after the other
    pub async fn check_content(&self, document: &Path, content: &str) -> Vec<DocumentError> {
        let links = extract_markdown_links(content);
        debug!("{} link(s) found in {}", links.len(), document.display());

        let mut errors = Vec::new();
        for link in links {
            if let Some(error) = self.check_link(document, link).await {
                errors.push(error);
            }
        }
        errors
    }

    // Checks a single link
    //
    // Returns: None if the link passes (or is excluded), otherwise the error
    pub async fn check_link(&self, document: &Path, link: Link) -> Option<DocumentError> {
        if self.is_excluded(&link.destination) {
            debug!("Skipping excluded link {}", link.destination);
            return None;
        }

        let kind = match classify(&self.origin, &link.destination) {
            Ok(Classification::Internal) => {
                check_internal_link(&self.root, &self.index_document, &link.destination).await
            }
            Ok(Classification::External(url)) => self.prober.probe(&url).await,
            // The request could never be formed, so no probe was possible
            Err(e) => Some(ErrorKind::TransportError {
                detail: format!("invalid URL: {}", e),
            }),
        }?;

        debug!(
            "{} in {}: {}",
            kind.code(),
            document.display(),
            link.destination
        );
        Some(DocumentError::new(document.to_path_buf(), link, kind))
    }

    fn is_excluded(&self, destination: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.is_match(destination))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. buffered vs buffer_unordered
//    - Both run up to N futures at once
//    - buffer_unordered yields results as they finish
//    - buffered yields them in the order the futures were created, which is
//      what keeps the report in discovery order
//
// 2. Why is there no tokio::spawn here?
//    - The futures only borrow `self`; spawned tasks would need 'static data
//    - On a current_thread runtime spawning wouldn't add parallelism anyway
//
// 3. Collecting Vec<Result<T>> into Result<Vec<T>>
//    - .collect::<Result<Vec<_>>>() stops at the first Err
//    - That's how one unreadable document aborts the whole run
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ORIGIN;
    use std::fs;
    use tempfile::TempDir;

    // A docs root with guide/README.md in it
    fn docs_tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("guide")).unwrap();
        fs::write(dir.path().join("guide/README.md"), "# Guide").unwrap();
        dir
    }

    fn checker(root: &Path) -> Checker {
        let settings = Settings {
            root: root.to_path_buf(),
            origin: Url::parse(DEFAULT_ORIGIN).unwrap(),
            ..Settings::default()
        };
        Checker::new(&settings).unwrap()
    }

    fn kinds(errors: &[DocumentError]) -> Vec<ErrorKind> {
        errors.iter().map(|e| e.kind.clone()).collect()
    }

    #[tokio::test]
    async fn test_existing_internal_target_is_clean() {
        let dir = docs_tree();
        let errors = checker(dir.path())
            .check_content(Path::new("/doc.md"), "[x](/guide/)")
            .await;
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_no_trailing_slash() {
        let dir = docs_tree();
        let errors = checker(dir.path())
            .check_content(Path::new("/doc.md"), "[x](/guide)")
            .await;
        assert_eq!(kinds(&errors), vec![ErrorKind::NoTrailingSlash]);
        assert_eq!(errors[0].link.destination, "/guide");
        assert_eq!(errors[0].document, PathBuf::from("/doc.md"));
    }

    #[tokio::test]
    async fn test_relative_link() {
        let dir = docs_tree();
        let errors = checker(dir.path())
            .check_content(Path::new("/doc.md"), "[x](guide/)")
            .await;
        assert_eq!(kinds(&errors), vec![ErrorKind::RelativeUrlForbidden]);
    }

    #[tokio::test]
    async fn test_external_links_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server.mock("GET", "/page").with_status(200).create_async().await;
        let _missing = server.mock("GET", "/missing").with_status(400).create_async().await;

        let dir = docs_tree();
        let checker = checker(dir.path());

        let clean = format!("[x]({}/page)", server.url());
        assert!(checker.check_content(Path::new("/doc.md"), &clean).await.is_empty());

        let broken = format!("[x]({}/missing)", server.url());
        let errors = checker.check_content(Path::new("/doc.md"), &broken).await;
        assert_eq!(kinds(&errors), vec![ErrorKind::NotFound { status: 400 }]);
    }

    #[tokio::test]
    async fn test_external_links_skip_the_filesystem() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server.mock("GET", "/guide/").with_status(200).create_async().await;

        // No guide/README.md under this root, yet the link passes: only the
        // probe decides for another host
        let dir = tempfile::tempdir().unwrap();
        let content = format!("[x]({}/guide/)", server.url());
        let errors = checker(dir.path())
            .check_content(Path::new("/doc.md"), &content)
            .await;
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_destination() {
        let dir = docs_tree();
        let errors = checker(dir.path())
            .check_content(Path::new("/doc.md"), "[x](http://[broken)")
            .await;
        assert!(matches!(
            kinds(&errors).as_slice(),
            [ErrorKind::TransportError { .. }]
        ));
    }

    #[tokio::test]
    async fn test_only_first_rule_is_reported_per_link() {
        let dir = docs_tree();
        let errors = checker(dir.path())
            .check_content(Path::new("/doc.md"), "[a](guide) [b](/guide) [c](/nope/) [d](/guide/)")
            .await;
        assert_eq!(
            kinds(&errors),
            vec![
                ErrorKind::RelativeUrlForbidden,
                ErrorKind::NoTrailingSlash,
                ErrorKind::TargetAbsent,
            ]
        );
    }

    #[tokio::test]
    async fn test_excluded_links_are_skipped() {
        let dir = docs_tree();
        let settings = Settings {
            root: dir.path().to_path_buf(),
            exclude: vec![Regex::new("^#").unwrap()],
            ..Settings::default()
        };
        let errors = Checker::new(&settings)
            .unwrap()
            .check_content(Path::new("/doc.md"), "[top](#intro) [x](/guide)")
            .await;
        assert_eq!(kinds(&errors), vec![ErrorKind::NoTrailingSlash]);
    }

    #[tokio::test]
    async fn test_documents_are_reported_in_order_without_dedup() {
        let dir = docs_tree();
        let first = dir.path().join("first.md");
        let second = dir.path().join("second.md");
        fs::write(&first, "[a](/guide) [b](/missing/)").unwrap();
        fs::write(&second, "[a](/guide)").unwrap();

        let documents = vec![first.clone(), second.clone()];
        for max_concurrency in [None, Some(1), Some(0)] {
            let mut checker = checker(dir.path());
            checker.max_concurrency = max_concurrency;
            let report = checker.check_documents(&documents).await.unwrap();

            let summary: Vec<_> = report
                .errors()
                .iter()
                .map(|e| (e.document.clone(), e.kind.clone()))
                .collect();
            assert_eq!(
                summary,
                vec![
                    (first.clone(), ErrorKind::NoTrailingSlash),
                    (first.clone(), ErrorKind::TargetAbsent),
                    (second.clone(), ErrorKind::NoTrailingSlash),
                ]
            );
        }
    }

    #[tokio::test]
    async fn test_unreadable_document_is_fatal() {
        let dir = docs_tree();
        let result = checker(dir.path())
            .check_documents(&[dir.path().join("does-not-exist.md")])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_running_twice_gives_the_same_report() {
        let dir = docs_tree();
        let doc = dir.path().join("index.md");
        fs::write(&doc, "[a](/guide/) [b](guide/) [c](/guide) [d](/nope/)").unwrap();

        let checker = checker(dir.path());
        let documents = vec![doc];
        let first = checker.check_documents(&documents).await.unwrap();
        let second = checker.check_documents(&documents).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
