// src/validate.rs
// =============================================================================
// Top-level validation of markdown files.
//
// What happens for one file:
// 1. Make sure the path exists, is a file, and ends in .md / .markdown
// 2. Read it as UTF-8 text
// 3. Extract links (checker::extract_links)
// 4. Skip links the config says to ignore
// 5. Resolve the rest one at a time, in extraction order, and record each
//    verdict in a fresh ValidationResult
//
// Step 1 and 2 failures are returned as errors. Anything that goes wrong with
// an individual link in step 5 is recorded as a broken link instead.
//
// Several files can be validated together. They are checked one after
// another in input order, each with its own result, and the first file-level
// error stops the run.
// =============================================================================

use std::path::Path;
use tracing::{debug, info, warn};

use crate::checker::{
    extract_links, is_anchor_link, is_external_link, resolve_link, HttpProbe, LinkOutcome,
    LinkProbe, ValidationResult,
};
use crate::config::ValidationConfig;
use crate::error::ValidationError;

/// File extensions accepted as markdown (compared case-insensitively).
pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Validates markdown files with a fixed config and probe.
pub struct Validator<P> {
    config: ValidationConfig,
    probe: P,
}

impl Validator<HttpProbe> {
    /// Creates a validator that probes external links over HTTP, using the
    /// config's timeout.
    pub fn new(config: ValidationConfig) -> Result<Self, ValidationError> {
        let probe = HttpProbe::new(config.timeout)
            .map_err(|e| ValidationError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_probe(config, probe))
    }
}

impl<P: LinkProbe> Validator<P> {
    pub fn with_probe(config: ValidationConfig, probe: P) -> Self {
        Self { config, probe }
    }

    /// Validates every link in one markdown file.
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationResult, ValidationError> {
        ensure_markdown_file(path).await?;

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ValidationError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let links = extract_links(
            &content,
            &self.config.custom_patterns,
            self.config.empty_links,
        );
        debug!(file = %path.display(), count = links.len(), "extracted links");

        let mut result = ValidationResult::new();

        for link in &links {
            if self.is_ignored(link) {
                debug!(link = link.as_str(), "skipping ignored link");
                continue;
            }

            let outcome = resolve_link(path, link, &self.probe).await;
            if let LinkOutcome::Broken(reason) = &outcome {
                warn!(file = %path.display(), link = link.as_str(), reason = reason.as_str(), "broken link");
            }
            result.record(link, outcome);
        }

        info!(
            file = %path.display(),
            total = result.total_links(),
            valid = result.valid_links(),
            broken = result.broken_links(),
            "validated markdown file"
        );

        Ok(result)
    }

    /// Validates several files, each independently, in input order. The
    /// error from the earliest failing file is returned.
    pub async fn validate_files<F: AsRef<Path>>(
        &self,
        files: &[F],
    ) -> Result<Vec<ValidationResult>, ValidationError> {
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(self.validate_file(file.as_ref()).await?);
        }
        Ok(results)
    }

    fn is_ignored(&self, link: &str) -> bool {
        (self.config.ignore_external_links && is_external_link(link))
            || (self.config.ignore_anchor_links && is_anchor_link(link))
    }
}

/// Validates one markdown file, probing external links over HTTP.
pub async fn validate_markdown_links(
    path: &Path,
    config: ValidationConfig,
) -> Result<ValidationResult, ValidationError> {
    Validator::new(config)?.validate_file(path).await
}

/// Validates several markdown files with one config.
pub async fn validate_multiple_markdown_files<F: AsRef<Path>>(
    files: &[F],
    config: ValidationConfig,
) -> Result<Vec<ValidationResult>, ValidationError> {
    Validator::new(config)?.validate_files(files).await
}

/// True if the path has a .md or .markdown extension, in any case.
pub fn has_markdown_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

// Checks that the path is something we can validate, in this order:
// exists, is not a directory, has a markdown extension
async fn ensure_markdown_file(path: &Path) -> Result<(), ValidationError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ValidationError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ValidationError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if metadata.is_dir() {
        return Err(ValidationError::IsDirectory(path.to_path_buf()));
    }

    if !has_markdown_extension(path) {
        return Err(ValidationError::NotMarkdown(path.to_path_buf()));
    }

    Ok(())
}
