// src/lib.rs
// =============================================================================
// markdown-link-guardian: validate the links in local markdown files.
//
// Modules:
// - checker: extraction, classification and resolution of single links
// - validate: whole-file (and multi-file) validation
// - config: validation settings and the optional TOML config file
// - scanner: wrapper around the osv-scanner vulnerability tool
// - error: error types
//
// Typical use:
//
//     let config = ValidationConfig::default().with_ignore_external_links(true);
//     let result = validate_markdown_links(Path::new("README.md"), config).await?;
//     println!("{} broken", result.broken_links());
// =============================================================================

pub mod checker;
pub mod config;
pub mod error;
pub mod scanner;
pub mod validate;

pub use checker::{LinkOutcome, ValidationResult};
pub use config::{EmptyLinkPolicy, FileConfig, ValidationConfig};
pub use error::{ScanError, ValidationError};
pub use validate::{validate_markdown_links, validate_multiple_markdown_files, Validator};
