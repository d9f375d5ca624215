// src/checker/result.rs
// =============================================================================
// The per-file accumulator.
//
// Every link that is not skipped ends up here exactly once, either as valid or
// as broken, so these always hold:
//   total_links() == valid_links + broken_links == all_links.len()
//   errors.len() == broken_links
//
// The counters are only changed through add_valid_link / add_broken_link /
// record, which keeps the invariant in one place.
// =============================================================================

use serde::{Serialize, Serializer};
use serde::ser::SerializeStruct;

use super::resolve::LinkOutcome;

/// Outcome of validating one markdown file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    valid_links: usize,
    broken_links: usize,
    all_links: Vec<String>,
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn valid_links(&self) -> usize {
        self.valid_links
    }

    pub fn broken_links(&self) -> usize {
        self.broken_links
    }

    pub fn total_links(&self) -> usize {
        self.valid_links + self.broken_links
    }

    /// Every link that was checked, in the order it was checked.
    pub fn all_links(&self) -> &[String] {
        &self.all_links
    }

    /// One "<link>: <reason>" message per broken link.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_ok(&self) -> bool {
        self.broken_links == 0
    }

    pub fn add_valid_link(&mut self, link: &str) {
        self.valid_links += 1;
        self.all_links.push(link.to_string());
    }

    pub fn add_broken_link(&mut self, link: &str, reason: &str) {
        self.broken_links += 1;
        self.all_links.push(link.to_string());
        self.errors.push(format!("{}: {}", link, reason));
    }

    /// Records the resolver's verdict for `link`.
    pub fn record(&mut self, link: &str, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Valid => self.add_valid_link(link),
            LinkOutcome::Broken(reason) => self.add_broken_link(link, &reason),
        }
    }
}

// Hand-written so the JSON output carries total_links alongside the counters
impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 5)?;
        state.serialize_field("total_links", &self.total_links())?;
        state.serialize_field("valid_links", &self.valid_links)?;
        state.serialize_field("broken_links", &self.broken_links)?;
        state.serialize_field("all_links", &self.all_links)?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let result = ValidationResult::new();
        assert_eq!(result.valid_links(), 0);
        assert_eq!(result.broken_links(), 0);
        assert_eq!(result.total_links(), 0);
        assert!(result.errors().is_empty());
        assert!(result.all_links().is_empty());
        assert!(result.is_ok());
    }

    #[test]
    fn test_add_links() {
        let mut result = ValidationResult::new();
        result.add_valid_link("./file1.md");
        result.add_broken_link("./missing.md", "File not found");

        assert_eq!(result.valid_links(), 1);
        assert_eq!(result.broken_links(), 1);
        assert_eq!(result.total_links(), 2);
        assert_eq!(result.all_links(), ["./file1.md", "./missing.md"]);
        assert_eq!(result.errors(), ["./missing.md: File not found"]);
        assert!(!result.is_ok());
    }

    #[test]
    fn test_record_outcomes() {
        let mut result = ValidationResult::new();
        result.record("#top", LinkOutcome::Valid);
        result.record("https://example.com/gone", LinkOutcome::Broken("HTTP 410".to_string()));

        assert_eq!(result.total_links(), result.all_links().len());
        assert_eq!(result.errors().len(), result.broken_links());
        assert!(result.errors()[0].contains("410"));
    }

    #[test]
    fn test_json_shape() {
        let mut result = ValidationResult::new();
        result.add_valid_link("./a.md");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_links"], 1);
        assert_eq!(json["valid_links"], 1);
        assert_eq!(json["all_links"][0], "./a.md");
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
    }
}
