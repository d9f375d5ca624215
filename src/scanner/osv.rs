// src/scanner/osv.rs
// =============================================================================
// A thin wrapper around the `osv-scanner` command-line tool.
//
// How it works:
// 1. Check the target directory exists (before spawning anything)
// 2. Run `<program> <leading args> --json -r <target>` and capture output
// 3. Non-zero exit -> error with the scanner's stderr
// 4. Write the raw JSON stdout to the report path
// 5. Parse it and return every vulnerability from every result entry
//
// The program and leading arguments are configurable so the wrapper can be
// pointed at a different binary (or a stand-in script in tests).
// =============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::ScanError;

/// Program run when none is configured.
pub const DEFAULT_SCANNER: &str = "osv-scanner";

// Shape of the scanner's JSON report. Only the parts we read are modeled;
// everything else is ignored. Missing and null arrays both mean "none".
#[derive(Debug, Deserialize)]
struct ScanReport {
    #[serde(default)]
    results: Option<Vec<ScanResultEntry>>,
}

#[derive(Debug, Deserialize)]
struct ScanResultEntry {
    #[serde(default)]
    vulnerabilities: Option<Vec<Vulnerability>>,
}

/// One vulnerability record, kept as the scanner produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vulnerability(pub Value);

impl Vulnerability {
    /// The advisory id, e.g. "GHSA-xxxx-xxxx-xxxx" or "CVE-2024-1234".
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn summary(&self) -> Option<&str> {
        self.0.get("summary").and_then(Value::as_str)
    }
}

/// Runs the vulnerability scanner.
#[derive(Debug, Clone)]
pub struct OsvScanner {
    program: String,
    leading_args: Vec<String>,
}

impl Default for OsvScanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCANNER)
    }
}

impl OsvScanner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Arguments placed before the ones the wrapper adds.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    // Scans `target` and writes the raw JSON report to `report`
    //
    // Returns: every vulnerability found, possibly none
    pub async fn run(&self, target: &Path, report: &Path) -> Result<Vec<Vulnerability>, ScanError> {
        if !target.exists() {
            return Err(ScanError::TargetNotFound(target.to_path_buf()));
        }

        debug!(program = %self.program, target = %target.display(), "running scanner");

        let output = Command::new(&self.program)
            .args(&self.leading_args)
            .arg("--json")
            .arg("-r")
            .arg(target)
            .output()
            .await
            .map_err(|source| ScanError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, stderr = stderr.as_str(), "scanner failed");
            return Err(ScanError::CommandFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        tokio::fs::write(report, &output.stdout)
            .await
            .map_err(|source| ScanError::WriteReport {
                path: report.to_path_buf(),
                source,
            })?;

        let vulnerabilities = parse_scan_output(&output.stdout)?;
        info!(
            target = %target.display(),
            report = %report.display(),
            count = vulnerabilities.len(),
            "scan finished"
        );

        Ok(vulnerabilities)
    }
}

/// Scans `target` with the default `osv-scanner` program.
pub async fn run_osv_scan(target: &Path, report: &Path) -> Result<Vec<Vulnerability>, ScanError> {
    OsvScanner::default().run(target, report).await
}

/// Flattens `results[].vulnerabilities[]` out of a raw scanner report.
pub fn parse_scan_output(raw: &[u8]) -> Result<Vec<Vulnerability>, ScanError> {
    let report: ScanReport = serde_json::from_slice(raw)?;

    Ok(report
        .results
        .unwrap_or_default()
        .into_iter()
        .flat_map(|entry| entry.vulnerabilities.unwrap_or_default())
        .collect())
}
