// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so JSON on stdout stays clean)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results and exit with proper code
//    (0 = success, 1 = broken links / vulnerabilities found, 2 = error)
//
// All of the real work lives in the library (src/lib.rs); this file only
// turns results into output.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use cli::{CheckArgs, Cli, Commands};
use markdown_link_guardian::scanner::{OsvScanner, Vulnerability};
use markdown_link_guardian::{ValidationResult, Validator};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins if set; otherwise -v flags pick the level
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Returns:
//   Ok(0) = nothing broken
//   Ok(1) = broken links or vulnerabilities found
//   Err   = could not complete the run
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check(args) => handle_check(args).await,
        Commands::Scan { target, report, scanner, json } => {
            handle_scan(&target, &report, scanner, json).await
        }
    }
}

// One entry of the JSON output for `check`
#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    #[serde(flatten)]
    result: &'a ValidationResult,
}

async fn handle_check(args: CheckArgs) -> Result<i32> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let config = args.validation_config(&cwd)?;

    if !args.json {
        println!("🔍 Checking {} markdown file(s)", args.files.len());
    }

    let validator = Validator::new(config)?;
    let results = validator.validate_files(args.files.as_slice()).await?;

    if args.json {
        let reports: Vec<FileReport> = args
            .files
            .iter()
            .zip(&results)
            .map(|(file, result)| FileReport {
                file: file.display().to_string(),
                result,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_table(&args.files, &results);
    }

    let any_broken = results.iter().any(|result| !result.is_ok());
    Ok(if any_broken { 1 } else { 0 })
}

// Prints one row per file, then every broken link underneath
fn print_table(files: &[PathBuf], results: &[ValidationResult]) {
    println!();
    println!("{:<60} {:>8} {:>8} {:>8}", "FILE", "TOTAL", "VALID", "BROKEN");
    println!("{}", "=".repeat(87));

    for (file, result) in files.iter().zip(results) {
        let name = file.display().to_string();
        // Keep the end of long paths, that's the part that identifies the file
        let name_display = if name.chars().count() > 57 {
            let tail: String = name.chars().rev().take(57).collect::<Vec<_>>().into_iter().rev().collect();
            format!("...{}", tail)
        } else {
            name
        };

        println!(
            "{:<60} {:>8} {:>8} {:>8}",
            name_display,
            result.total_links(),
            result.valid_links(),
            result.broken_links()
        );
        for error in result.errors() {
            println!("   ❌ {}", error);
        }
    }

    println!();

    let total: usize = results.iter().map(ValidationResult::total_links).sum();
    let valid: usize = results.iter().map(ValidationResult::valid_links).sum();
    let broken: usize = results.iter().map(ValidationResult::broken_links).sum();

    println!("📊 Summary:");
    println!("   ✅ Valid: {}", valid);
    println!("   ❌ Broken: {}", broken);
    println!("   📋 Total: {}", total);
}

async fn handle_scan(target: &Path, report: &Path, program: String, json: bool) -> Result<i32> {
    let scanner = OsvScanner::new(program);
    if !json {
        println!("🔍 Scanning {} with {}", target.display(), scanner.program());
    }

    let vulnerabilities = scanner
        .run(target, report)
        .await
        .with_context(|| format!("scan of {} failed", target.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vulnerabilities)?);
    } else {
        print_vulnerabilities(&vulnerabilities, report);
    }

    Ok(if vulnerabilities.is_empty() { 0 } else { 1 })
}

fn print_vulnerabilities(vulnerabilities: &[Vulnerability], report: &Path) {
    if vulnerabilities.is_empty() {
        println!("✅ No vulnerabilities found");
    } else {
        println!("⚠️  {} vulnerabilit(y/ies) found:", vulnerabilities.len());
        for vulnerability in vulnerabilities {
            println!(
                "   {} {}",
                vulnerability.id().unwrap_or("<no id>"),
                vulnerability.summary().unwrap_or("")
            );
        }
    }
    println!("📄 Report written to {}", report.display());
}
