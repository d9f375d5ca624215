// src/error.rs
// =============================================================================
// Error types for the library side of the crate.
//
// Two families of errors live here:
// - ValidationError: the file we were asked to validate can't be validated at
//   all (missing, a directory, not markdown, unreadable), or the configuration
//   is bad. These are fatal and go straight back to the caller.
// - ScanError: the vulnerability scanner wrapper failed.
//
// A broken link is NOT an error in this sense. It is recorded inside the
// ValidationResult and validation keeps going (see checker/resolve.rs).
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Fatal problems with a markdown file or with the validation settings.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    #[error("Not a markdown file: {}", .0.display())]
    NotMarkdown(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid link pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures of the external vulnerability scanner wrapper.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan target not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("Failed to start scanner '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Scanner exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Failed to write report {}: {source}", path.display())]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scanner output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
