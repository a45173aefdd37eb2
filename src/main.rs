// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (RUST_LOG, or --verbose for debug output)
// 3. Resolve the configuration (defaults < config file < flags)
// 4. Find the documents, check them all, print the report
// 5. Exit with proper code (0 = clean, 1 = broken links, 2 = fatal error)
//
// A clean run prints nothing at all. Broken links are printed one per line
// with a red "ERROR:" prefix; fatal errors get a "fatal:" prefix so the two
// can't be confused.
// =============================================================================

mod checker; // src/checker/ - link extraction and validation
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - config file + flag merging
mod docs; // src/docs/ - document discovery
mod report; // src/report.rs - errors and the final report

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use owo_colors::{OwoColorize, Stream};

use checker::Checker;
use cli::{CheckLinksArgs, Cli, Commands};
use config::{FileConfig, Settings};
use report::CheckReport;

// Exit codes
const EXIT_CLEAN: i32 = 0;
const EXIT_BROKEN_LINKS: i32 = 1;
const EXIT_FATAL: i32 = 2;

// Everything runs on one thread: documents overlap only while they wait on
// the network or the filesystem
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let outcome = run(cli.command).await;
    if let Err(e) = &outcome {
        // {:#} prints the whole context chain on one line
        eprintln!(
            "{} {:#}",
            "fatal:".if_supports_color(Stream::Stderr, |t| t.bold()),
            e
        );
    }

    std::process::exit(exit_code(&outcome));
}

// Maps the outcome of a run to the process exit code
//
//   clean report     -> 0
//   broken links     -> 1
//   fatal error      -> 2
fn exit_code(outcome: &Result<CheckReport>) -> i32 {
    match outcome {
        Ok(report) if report.is_empty() => EXIT_CLEAN,
        Ok(_) => EXIT_BROKEN_LINKS,
        Err(_) => EXIT_FATAL,
    }
}

// Sets up env_logger
//
// RUST_LOG wins when set; otherwise only warnings are shown, or debug output
// for our own crate with --verbose
fn init_logger(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

// Dispatches to the selected subcommand
async fn run(command: Commands) -> Result<CheckReport> {
    match command {
        Commands::CheckLinks(args) => check_links(args).await,
    }
}

// Handles the 'check-links' subcommand: checks, prints, and hands the report
// back so main can pick the exit code
async fn check_links(args: CheckLinksArgs) -> Result<CheckReport> {
    let file_config = FileConfig::discover(args.config.as_deref())?;
    let settings = Settings::resolve(&args, file_config)?;

    let documents = docs::discover_documents(&settings.root, &settings.extension)?;
    info!("Found {} document(s)", documents.len());

    let checker = Checker::new(&settings)?;
    let report = checker.check_documents(&documents).await?;
    info!("{} broken link(s)", report.len());

    print_report(&report, args.json)?;
    Ok(report)
}

// Prints the report either as error lines on stderr or as JSON on stdout
fn print_report(report: &CheckReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for error in report.errors() {
        eprintln!(
            "{} {}",
            "ERROR:".if_supports_color(Stream::Stderr, |t| t.red()),
            error
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    // Runs `doclinks check-links <root>` with an empty config file, so a
    // stray .doclinks.toml in the working directory can't interfere
    async fn check(root: &Path, extra: &[&str]) -> Result<CheckReport> {
        let config = tempfile::NamedTempFile::new().unwrap();
        let root = root.to_str().unwrap();
        let config_path = config.path().to_str().unwrap();

        let mut argv = vec!["doclinks", "check-links", root, "--config", config_path];
        argv.extend_from_slice(extra);
        let Commands::CheckLinks(args) = Cli::parse_from(argv).command;
        check_links(args).await
    }

    fn docs_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("guide")).unwrap();
        fs::write(dir.path().join("guide/README.md"), "[back](/guide/)").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_clean_run_exits_zero() {
        let dir = docs_tree();
        fs::write(dir.path().join("index.md"), "[x](/guide/)").unwrap();
        let outcome = check(dir.path(), &[]).await;
        assert_eq!(exit_code(&outcome), EXIT_CLEAN);
    }

    #[tokio::test]
    async fn test_broken_links_exit_one() {
        let dir = docs_tree();
        fs::write(dir.path().join("index.md"), "[x](/guide) [y](guide/)").unwrap();
        let outcome = check(dir.path(), &["--json"]).await;
        assert_eq!(outcome.as_ref().map(CheckReport::len).ok(), Some(2));
        assert_eq!(exit_code(&outcome), EXIT_BROKEN_LINKS);
    }

    #[tokio::test]
    async fn test_missing_root_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = check(&dir.path().join("missing"), &[]).await;
        assert!(outcome.is_err());
        assert_eq!(exit_code(&outcome), EXIT_FATAL);
    }

    #[tokio::test]
    async fn test_bad_config_exits_two() {
        let dir = docs_tree();
        let outcome = check(dir.path(), &["--exclude", "("]).await;
        assert_eq!(exit_code(&outcome), EXIT_FATAL);
    }

    #[test]
    fn test_print_report_never_fails() {
        let report = CheckReport::default();
        assert!(print_report(&report, false).is_ok());
        assert!(print_report(&report, true).is_ok());
    }
}
