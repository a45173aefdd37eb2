// src/checker/http.rs
// =============================================================================
// This module checks if external URLs are alive by making HTTP requests.
//
// Key functionality:
// - Makes exactly one GET request per link (no retries)
// - Follows redirects the way reqwest does by default
// - Tells "the remote is unreachable" apart from "the remote said no"
//
// Status mapping:
// - 2xx            -> fine
// - 400            -> external.not-found
// - anything else  -> external.not-ok
// - request failed -> external.transport-error
// =============================================================================

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::report::ErrorKind;

// Sends probes for external links
//
// Holds one reqwest Client, which pools connections internally, so every
// document task can share the same Prober by reference.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    // Builds the HTTP client
    //
    // Parameters:
    //   timeout: per-request timeout, None leaves it to the transport
    //   user_agent: value for the User-Agent header
    pub fn new(timeout: Option<Duration>, user_agent: &str) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    // Probes one URL
    //
    // Returns: None if the link is fine, otherwise what went wrong
    pub async fn probe(&self, url: &Url) -> Option<ErrorKind> {
        debug!("Probing {}", url);

        match self.client.get(url.as_str()).send().await {
            Ok(response) => classify_status(response.status()),
            Err(e) => Some(ErrorKind::TransportError {
                detail: describe_error(&e),
            }),
        }
    }
}

// Maps an HTTP status to a link error
fn classify_status(status: StatusCode) -> Option<ErrorKind> {
    if status.is_success() {
        None
    } else if status == StatusCode::BAD_REQUEST {
        Some(ErrorKind::NotFound {
            status: status.as_u16(),
        })
    } else {
        Some(ErrorKind::NotOk {
            status: status.as_u16(),
        })
    }
}

// Turns a reqwest error into a short, readable detail string
//
// reqwest's Display only shows the outermost error ("error sending request
// for url ..."), the useful part (DNS, refused, ...) is further down the chain
fn describe_error(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_redirect() {
        "too many redirects"
    } else if error.is_builder() {
        "invalid request"
    } else {
        "request failed"
    };

    let mut root_cause: &dyn std::error::Error = error;
    while let Some(source) = root_cause.source() {
        root_cause = source;
    }

    format!("{}: {}", kind, root_cause)
}
