// src/config.rs
// =============================================================================
// Validation settings.
//
// ValidationConfig is what the validator actually runs with. It is built once
// per run and never mutated afterwards; custom patterns are compiled up front
// so a bad regex is reported before any file is touched.
//
// FileConfig is the on-disk (TOML) form of the same settings. The CLI loads it
// first and then lets explicit flags override individual values.
// =============================================================================

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ValidationError;

/// Default network probe timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default retry budget. Stored, not enforced (see DESIGN.md).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// File names looked up in the working directory when no --config is given.
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["mdlinks.toml", ".mdlinks.toml"];

/// What to do with a link whose target is empty, like `[Empty]()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyLinkPolicy {
    /// Leave it out of extraction entirely.
    #[default]
    Drop,
    /// Extract it as an empty target, which resolves as a valid self-link.
    SelfReference,
}

/// Settings for one validation run.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub ignore_external_links: bool,
    pub ignore_anchor_links: bool,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Applied after the built-in patterns, in this order.
    pub custom_patterns: Vec<Regex>,
    pub empty_links: EmptyLinkPolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ignore_external_links: false,
            ignore_anchor_links: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            custom_patterns: Vec::new(),
            empty_links: EmptyLinkPolicy::Drop,
        }
    }
}

impl ValidationConfig {
    pub fn with_ignore_external_links(mut self, ignore: bool) -> Self {
        self.ignore_external_links = ignore;
        self
    }

    pub fn with_ignore_anchor_links(mut self, ignore: bool) -> Self {
        self.ignore_anchor_links = ignore;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_empty_links(mut self, policy: EmptyLinkPolicy) -> Self {
        self.empty_links = policy;
        self
    }

    /// Compiles `pattern` and appends it to the custom pattern list.
    pub fn with_custom_pattern(mut self, pattern: &str) -> Result<Self, ValidationError> {
        self.custom_patterns.push(compile_pattern(pattern)?);
        Ok(self)
    }
}

/// Compiles a link pattern with the same flags as the built-in ones
/// (`^`/`$` match at line boundaries).
pub fn compile_pattern(pattern: &str) -> Result<Regex, ValidationError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|source| ValidationError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// TOML form of ValidationConfig. Every field is optional in the file.
///
/// ```toml
/// ignore_external_links = true
/// timeout_secs = 10
/// custom_patterns = ['\[\[([^\]]+)\]\]']
/// empty_links = "self_reference"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub ignore_external_links: bool,
    pub ignore_anchor_links: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub custom_patterns: Vec<String>,
    pub empty_links: EmptyLinkPolicy,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            ignore_external_links: false,
            ignore_anchor_links: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            custom_patterns: Vec::new(),
            empty_links: EmptyLinkPolicy::Drop,
        }
    }
}

impl FileConfig {
    pub fn from_toml(content: &str) -> Result<Self, ValidationError> {
        toml::from_str(content).map_err(|e| ValidationError::Config(e.to_string()))
    }

    /// Loads a config file from an explicit path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ValidationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Loads `path` if given; otherwise the first existing file from
    /// CONFIG_FILE_CANDIDATES in `dir`; otherwise defaults.
    ///
    /// An explicit path that doesn't exist is an error, unlike a missing
    /// candidate file.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ValidationError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(ValidationError::NotFound(path.to_path_buf()));
            }
            return Self::load(path);
        }

        for candidate in CONFIG_FILE_CANDIDATES {
            let candidate = dir.join(candidate);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "using config file");
                return Self::load(candidate);
            }
        }

        Ok(Self::default())
    }

    /// Compiles the file settings into a ValidationConfig.
    pub fn into_validation_config(self) -> Result<ValidationConfig, ValidationError> {
        let mut config = ValidationConfig::default()
            .with_ignore_external_links(self.ignore_external_links)
            .with_ignore_anchor_links(self.ignore_anchor_links)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_max_retries(self.max_retries)
            .with_empty_links(self.empty_links);

        for pattern in &self.custom_patterns {
            config = config.with_custom_pattern(pattern)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidationConfig::default();
        assert!(!config.ignore_external_links);
        assert!(!config.ignore_anchor_links);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(config.custom_patterns.is_empty());
        assert_eq!(config.empty_links, EmptyLinkPolicy::Drop);
    }

    #[test]
    fn test_builder_sets_every_field() {
        let config = ValidationConfig::default()
            .with_ignore_external_links(true)
            .with_ignore_anchor_links(true)
            .with_timeout(Duration::from_secs(10))
            .with_max_retries(1)
            .with_custom_pattern(r"\[\[([^\]]+)\]\]")
            .unwrap();

        assert!(config.ignore_external_links);
        assert!(config.ignore_anchor_links);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.custom_patterns.len(), 1);
    }

    #[test]
    fn test_bad_pattern_is_rejected() {
        let err = ValidationConfig::default()
            .with_custom_pattern(r"\[\[(unclosed")
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_file_config_partial_toml() {
        let file = FileConfig::from_toml(
            r#"
            ignore_anchor_links = true
            timeout_secs = 5
            custom_patterns = ['\{\{([^}]+)\}\}']
            empty_links = "self_reference"
            "#,
        )
        .unwrap();

        assert!(file.ignore_anchor_links);
        assert!(!file.ignore_external_links);
        assert_eq!(file.max_retries, DEFAULT_MAX_RETRIES);

        let config = file.into_validation_config().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.custom_patterns.len(), 1);
        assert_eq!(config.empty_links, EmptyLinkPolicy::SelfReference);
    }

    #[test]
    fn test_file_config_unknown_key() {
        let err = FileConfig::from_toml("ignore_everything = true").unwrap_err();
        assert!(matches!(err, ValidationError::Config(_)));
    }

    #[test]
    fn test_discover_candidate_and_missing_explicit() {
        let dir = tempfile::tempdir().unwrap();

        let config = FileConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, FileConfig::default());

        std::fs::write(dir.path().join(".mdlinks.toml"), "max_retries = 7").unwrap();
        let config = FileConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.max_retries, 7);

        let missing = dir.path().join("nope.toml");
        let err = FileConfig::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ValidationError::NotFound(_)));
    }
}
