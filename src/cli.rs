// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - check: validate links in one or more markdown files
// - scan:  run the osv-scanner wrapper on a directory
//
// Settings for `check` come from three places, later ones winning:
// defaults -> mdlinks.toml (or --config) -> command-line flags
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use markdown_link_guardian::config::{compile_pattern, EmptyLinkPolicy, FileConfig, ValidationConfig};
use markdown_link_guardian::scanner::DEFAULT_SCANNER;
use markdown_link_guardian::ValidationError;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "md-guardian",
    version,
    about = "Validate links in markdown files and scan projects for vulnerabilities",
    long_about = "md-guardian checks that every relative link in your markdown files points at a file \
                  that exists and that every external link answers. It's meant for CI pipelines, \
                  so it exits with 1 when something is broken."
)]
pub struct Cli {
    /// Show more log output on stderr (-v = debug, -vv = trace)
    ///
    /// RUST_LOG, when set, takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate links in markdown files
    ///
    /// Example: md-guardian check README.md docs/index.md --ignore-external
    Check(CheckArgs),

    /// Run osv-scanner on a directory and report vulnerabilities
    ///
    /// Example: md-guardian scan . --report osv-report.json
    Scan {
        /// Directory to scan
        target: PathBuf,

        /// Where to write the raw JSON report
        #[arg(long, default_value = "osv-report.json")]
        report: PathBuf,

        /// Scanner program to run
        #[arg(long, default_value = DEFAULT_SCANNER)]
        scanner: String,

        /// Output results in JSON format instead of a list
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Markdown files to validate (.md or .markdown)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Don't probe http:// and https:// links
    #[arg(long)]
    pub ignore_external: bool,

    /// Don't check #anchor links
    #[arg(long)]
    pub ignore_anchors: bool,

    /// Network timeout per external link, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retry budget for external links (accepted, currently not enforced)
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Extra link pattern (regex); repeatable, applied after the config's
    ///
    /// The second capture group is the target if present, else the first
    #[arg(long = "pattern", value_name = "REGEX")]
    pub patterns: Vec<String>,

    /// Count `[text]()` as a valid link to the file itself instead of
    /// ignoring it
    #[arg(long)]
    pub keep_empty_links: bool,

    /// Config file (defaults to mdlinks.toml or .mdlinks.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    // Builds the ValidationConfig for this run
    //
    // Flags only ever switch things on or add to what the file says; they
    // never switch a file setting off.
    pub fn validation_config(&self, cwd: &Path) -> Result<ValidationConfig, ValidationError> {
        let mut config = FileConfig::discover(self.config.as_deref(), cwd)?.into_validation_config()?;

        if self.ignore_external {
            config.ignore_external_links = true;
        }
        if self.ignore_anchors {
            config.ignore_anchor_links = true;
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if self.keep_empty_links {
            config.empty_links = EmptyLinkPolicy::SelfReference;
        }
        for pattern in &self.patterns {
            config.custom_patterns.push(compile_pattern(pattern)?);
        }

        Ok(config)
    }
}
