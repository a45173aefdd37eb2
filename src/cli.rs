// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every flag here is optional: when left out, the value comes from the config
// file or the built-in default (see config.rs).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "doclinks",
    version,
    about = "Check the links in a Markdown documentation tree",
    long_about = "doclinks walks a directory of Markdown documents and checks every link in them. \
                  Internal links must be site-absolute, end with '/' and point at a directory \
                  containing an index document; external links must answer with a success status."
)]
pub struct Cli {
    /// Print debug logs (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

// The subcommands we support
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every link in every document under a root directory
    ///
    /// Example: doclinks check-links docs --max-concurrency 8
    CheckLinks(CheckLinksArgs),
}

// Arguments for `check-links`
#[derive(Args, Debug, Clone)]
pub struct CheckLinksArgs {
    /// Documentation root directory
    #[arg(default_value = "docs")]
    pub root: PathBuf,

    /// Config file (defaults to .doclinks.toml in the current directory, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Canonical site origin links are resolved against
    /// (e.g. https://docs.example.org/docs/)
    #[arg(long)]
    pub origin: Option<String>,

    /// File name that represents a directory-style document
    #[arg(long)]
    pub index_document: Option<String>,

    /// Extension of the documents to check
    #[arg(long)]
    pub extension: Option<String>,

    /// Maximum number of documents checked at the same time (0 = no limit)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Timeout in seconds for each external request
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip links whose destination matches this regex (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Output the report as JSON instead of text lines
    #[arg(long)]
    pub json: bool,
}
