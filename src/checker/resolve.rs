// src/checker/resolve.rs
// =============================================================================
// This module decides whether a single extracted link is valid or broken.
//
// Internal links (paths and anchors):
// - "#section"          -> always valid, we don't parse headings
// - "file.md#section"   -> the "#section" part is dropped
// - ""  or "#..." only  -> valid, it points at the file itself
// - anything else       -> resolved against the directory of the markdown
//                          file (NOT the working directory) and looked up
//
// External links go through a LinkProbe:
// - final status < 400  -> valid
// - final status >= 400 -> broken, "HTTP <code>"
// - no answer           -> broken, with the failure's description
//
// Every outcome is a plain LinkOutcome value. Nothing here returns an error:
// one bad link must never stop the rest of the file from being checked.
// =============================================================================

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::classify::{is_anchor_link, is_internal_link};
use super::http::{LinkProbe, ProbeOutcome};

/// Message recorded for an internal link whose target doesn't exist.
pub const FILE_NOT_FOUND: &str = "File not found";

/// Verdict for one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Valid,
    /// Holds the human-readable reason.
    Broken(String),
}

// Resolves one link found in `source`
//
// Parameters:
//   source: path of the markdown file the link came from
//   link: the extracted target
//   probe: used for anything that isn't a file path
pub async fn resolve_link(source: &Path, link: &str, probe: &dyn LinkProbe) -> LinkOutcome {
    let outcome = if is_internal_link(link) {
        resolve_internal(source, link)
    } else {
        resolve_external(link, probe).await
    };

    debug!(link, ?outcome, "resolved link");
    outcome
}

/// Checks an internal link against the filesystem.
pub fn resolve_internal(source: &Path, link: &str) -> LinkOutcome {
    if is_anchor_link(link) {
        return LinkOutcome::Valid;
    }

    let path_part = link.split('#').next().unwrap_or_default();
    if path_part.is_empty() {
        return LinkOutcome::Valid;
    }

    let base = source.parent().unwrap_or_else(|| Path::new(""));
    let target = base.join(path_part);

    if target_exists(&target) {
        LinkOutcome::Valid
    } else {
        LinkOutcome::Broken(FILE_NOT_FOUND.to_string())
    }
}

// canonicalize() only succeeds for paths that exist, following symlinks.
// When it fails we still try the lexically normalized path, so that
// "missing_dir/../file.md" behaves like "file.md".
fn target_exists(target: &Path) -> bool {
    if std::fs::canonicalize(target).is_ok() {
        return true;
    }
    normalize(target).exists()
}

// Removes "." and folds ".." into the previous component without touching
// the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // ".." at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Checks an external link with `probe`.
///
/// A panicking probe is caught and reported as a broken link.
pub async fn resolve_external(link: &str, probe: &dyn LinkProbe) -> LinkOutcome {
    let probed = AssertUnwindSafe(probe.probe(link)).catch_unwind().await;

    match probed {
        Ok(ProbeOutcome::Status(code)) if code < 400 => LinkOutcome::Valid,
        Ok(ProbeOutcome::Status(code)) => LinkOutcome::Broken(format!("HTTP {}", code)),
        Ok(ProbeOutcome::Failed(failure)) => LinkOutcome::Broken(failure.to_string()),
        Err(panic) => LinkOutcome::Broken(panic_message(panic.as_ref())),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Link check panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::http::ProbeFailure;
    use async_trait::async_trait;
    use std::fs;

    struct FixedProbe(ProbeOutcome);

    #[async_trait]
    impl LinkProbe for FixedProbe {
        async fn probe(&self, _url: &str) -> ProbeOutcome {
            self.0.clone()
        }
    }

    struct PanickingProbe;

    #[async_trait]
    impl LinkProbe for PanickingProbe {
        async fn probe(&self, _url: &str) -> ProbeOutcome {
            panic!("probe exploded")
        }
    }

    #[test]
    fn test_anchor_and_self_links_are_valid() {
        let source = Path::new("/definitely/not/here/doc.md");
        assert_eq!(resolve_internal(source, "#section"), LinkOutcome::Valid);
        assert_eq!(resolve_internal(source, ""), LinkOutcome::Valid);
    }

    #[test]
    fn test_relative_to_source_directory() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("api.md"), "# API").unwrap();
        fs::write(dir.path().join("README.md"), "# Readme").unwrap();

        let source = docs.join("index.md");
        assert_eq!(resolve_internal(&source, "./api.md"), LinkOutcome::Valid);
        assert_eq!(resolve_internal(&source, "api.md#usage"), LinkOutcome::Valid);
        assert_eq!(resolve_internal(&source, "../README.md"), LinkOutcome::Valid);
        assert_eq!(resolve_internal(&source, "./"), LinkOutcome::Valid);
        assert_eq!(
            resolve_internal(&source, "./missing.md"),
            LinkOutcome::Broken(FILE_NOT_FOUND.to_string())
        );
    }

    #[test]
    fn test_parent_of_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("file.md"), "# File").unwrap();

        let source = dir.path().join("doc.md");
        assert_eq!(resolve_internal(&source, "./nowhere/../file.md"), LinkOutcome::Valid);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c.md")), PathBuf::from("a/c.md"));
        assert_eq!(normalize(Path::new("../x.md")), PathBuf::from("../x.md"));
        assert_eq!(normalize(Path::new("/../x.md")), PathBuf::from("/x.md"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }

    #[tokio::test]
    async fn test_external_status_codes() {
        let ok = FixedProbe(ProbeOutcome::Status(200));
        assert_eq!(resolve_external("https://example.com", &ok).await, LinkOutcome::Valid);

        let redirect = FixedProbe(ProbeOutcome::Status(304));
        assert_eq!(resolve_external("https://example.com", &redirect).await, LinkOutcome::Valid);

        let missing = FixedProbe(ProbeOutcome::Status(404));
        assert_eq!(
            resolve_external("https://httpstat.us/404", &missing).await,
            LinkOutcome::Broken("HTTP 404".to_string())
        );
    }

    #[tokio::test]
    async fn test_external_failure_description() {
        let probe = FixedProbe(ProbeOutcome::Failed(ProbeFailure::Timeout(
            "operation timed out".to_string(),
        )));
        assert_eq!(
            resolve_external("https://example.com/slow", &probe).await,
            LinkOutcome::Broken("Request timed out: operation timed out".to_string())
        );
    }

    #[tokio::test]
    async fn test_panicking_probe_is_contained() {
        let outcome = resolve_external("https://example.com", &PanickingProbe).await;
        assert_eq!(outcome, LinkOutcome::Broken("probe exploded".to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_by_kind() {
        let probe = FixedProbe(ProbeOutcome::Status(500));
        let source = Path::new("doc.md");

        assert_eq!(resolve_link(source, "#top", &probe).await, LinkOutcome::Valid);
        assert_eq!(
            resolve_link(source, "https://example.com", &probe).await,
            LinkOutcome::Broken("HTTP 500".to_string())
        );
        // Not internal and not HTTP: still goes to the probe
        assert_eq!(
            resolve_link(source, "mailto:someone@example.com", &probe).await,
            LinkOutcome::Broken("HTTP 500".to_string())
        );
    }
}
