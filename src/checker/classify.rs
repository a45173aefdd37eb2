// src/checker/classify.rs
// =============================================================================
// Decides whether a link points at our own site or somewhere else.
//
// Every destination is first resolved against the canonical origin (the
// site's published address, scheme + host + base path). After resolution the
// host is the only thing we look at:
// - same host as the origin  -> internal
// - anything else            -> external
//
// So a relative link like "guide/" resolves onto our host and is classified
// internal. The internal validator then rejects it for not being written as
// a site-absolute path.
// =============================================================================

use url::Url;

// Result of classifying one destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Resolves onto the canonical host
    Internal,
    /// Resolves onto another host (or no host at all, e.g. mailto:)
    External(Url),
}

// Classifies a link destination against the canonical origin
//
// Returns Err only when the destination can't be resolved into a URL at all
// (e.g. "http://[broken"), which the caller reports per link.
pub fn classify(origin: &Url, destination: &str) -> Result<Classification, url::ParseError> {
    let resolved = origin.join(destination)?;

    if resolved.host_str() == origin.host_str() {
        Ok(Classification::Internal)
    } else {
        Ok(Classification::External(resolved))
    }
}
