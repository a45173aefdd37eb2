// src/config.rs
// =============================================================================
// Configuration for a link checking run.
//
// Values come from three places, later ones win:
// 1. Built-in defaults (see the constants below)
// 2. A TOML config file: --config <path>, or .doclinks.toml in the current
//    directory if it exists
// 3. Command-line flags
//
// Example .doclinks.toml:
//
//   origin = "https://docs.example.org/docs/"
//   index_document = "README.md"
//   max_concurrency = 16
//   timeout_secs = 20
//   exclude = ["^#", "^mailto:"]
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::cli::CheckLinksArgs;

/// The site's published address; every link is resolved against it
pub const DEFAULT_ORIGIN: &str = "https://docs.example.org/docs/";

/// File that represents a directory-style document
pub const DEFAULT_INDEX_DOCUMENT: &str = "README.md";

/// Extension of the documents we check
pub const DEFAULT_EXTENSION: &str = "md";

/// Config file picked up from the working directory when --config isn't given
pub const DEFAULT_CONFIG_FILE: &str = ".doclinks.toml";

const DEFAULT_USER_AGENT: &str = concat!("doclinks/", env!("CARGO_PKG_VERSION"));

// The contents of a config file, every key optional
//
// deny_unknown_fields turns typos like `orign = ...` into an error instead of
// silently ignoring them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub origin: Option<String>,
    pub index_document: Option<String>,
    pub extension: Option<String>,
    pub max_concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub exclude: Vec<String>,
}

impl FileConfig {
    // Reads and parses a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file '{}'", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in config file '{}'", path.display()))
    }

    // Loads the explicit config file, or the default one if it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Documentation root, as given
    pub root: PathBuf,
    /// Canonical origin links are resolved against
    pub origin: Url,
    pub index_document: String,
    pub extension: String,
    /// How many documents are checked at once, None = all of them
    pub max_concurrency: Option<usize>,
    /// Per-request timeout for external probes, None = transport default
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Links whose destination matches any of these are skipped
    pub exclude: Vec<Regex>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("docs"),
            // DEFAULT_ORIGIN is a constant and known to be valid
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is a valid URL"),
            index_document: DEFAULT_INDEX_DOCUMENT.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            max_concurrency: None,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            exclude: Vec::new(),
        }
    }
}

impl Settings {
    // Merges defaults, the config file and the CLI flags
    //
    // Everything that can be wrong with the configuration itself is caught
    // here, before any document is read.
    pub fn resolve(args: &CheckLinksArgs, file: FileConfig) -> Result<Self> {
        let defaults = Settings::default();

        // Existence of the root is checked by discovery, which runs next
        let root = args.root.clone();

        let origin = match args.origin.as_deref().or(file.origin.as_deref()) {
            Some(origin) => parse_origin(origin)?,
            None => defaults.origin,
        };

        let index_document = args
            .index_document
            .clone()
            .or(file.index_document)
            .unwrap_or(defaults.index_document);
        if index_document.is_empty() || index_document.contains('/') {
            bail!("Index document must be a plain file name, got '{}'", index_document);
        }

        let extension = args
            .extension
            .clone()
            .or(file.extension)
            .unwrap_or(defaults.extension)
            .trim_start_matches('.')
            .to_string();

        let exclude = args
            .exclude
            .iter()
            .chain(file.exclude.iter())
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("Invalid exclude pattern '{}'", pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        let settings = Settings {
            root,
            origin,
            index_document,
            extension,
            max_concurrency: args.max_concurrency.or(file.max_concurrency),
            timeout: args
                .timeout
                .or(file.timeout_secs)
                .map(Duration::from_secs),
            user_agent: file.user_agent.unwrap_or(defaults.user_agent),
            exclude,
        };

        settings.log_summary();
        Ok(settings)
    }

    fn log_summary(&self) {
        info!("Documentation root: {}", self.root.display());
        info!(
            "Origin: {}, index document: {}, extension: .{}",
            self.origin, self.index_document, self.extension
        );
        info!(
            "Concurrency: {}, timeout: {}",
            self.max_concurrency
                .filter(|n| *n > 0)
                .map_or("unbounded".to_string(), |n| n.to_string()),
            self.timeout
                .map_or("none".to_string(), |t| format!("{}s", t.as_secs()))
        );
    }
}

// The origin must be an absolute URL with a host, otherwise host comparison
// means nothing
fn parse_origin(origin: &str) -> Result<Url> {
    let url = Url::parse(origin).with_context(|| format!("Invalid origin '{}'", origin))?;
    if url.host_str().is_none() {
        return Err(anyhow!("Origin '{}' has no host", origin));
    }
    Ok(url)
}
