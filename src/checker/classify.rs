// src/checker/classify.rs
// =============================================================================
// Decides what kind of target a link is.
//
// The two predicates are independent, NOT complements:
//   "./a.md", "#top"        -> internal
//   "https://x", "http://x" -> external
//   "ftp://x", "mailto:x"   -> neither
//
// The resolver treats "neither" like external (it is not a file path), and
// the probe then reports it as broken because it isn't HTTP.
// =============================================================================

/// Prefixes that mark a link as something other than a file path.
const NON_FILE_PREFIXES: [&str; 4] = ["http://", "https://", "ftp://", "mailto:"];

/// True if the link is a path relative to the markdown file, or an anchor.
pub fn is_internal_link(link: &str) -> bool {
    !NON_FILE_PREFIXES.iter().any(|prefix| link.starts_with(prefix))
}

/// True if the link is an HTTP or HTTPS URL.
pub fn is_external_link(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// True for a pure in-page anchor such as `#installation`.
pub fn is_anchor_link(link: &str) -> bool {
    link.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_links() {
        assert!(is_internal_link("./file.md"));
        assert!(is_internal_link("../parent/file.md"));
        assert!(is_internal_link("#anchor"));
        assert!(is_internal_link("WikiLink"));
        assert!(!is_internal_link("https://example.com"));
        assert!(!is_internal_link("ftp://example.com"));
        assert!(!is_internal_link("mailto:someone@example.com"));
    }

    #[test]
    fn test_external_links() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("http://example.com"));
        assert!(!is_external_link("./file.md"));
        assert!(!is_external_link("ftp://example.com"));
    }

    #[test]
    fn test_ftp_is_neither() {
        let link = "ftp://example.com/file";
        assert!(!is_internal_link(link));
        assert!(!is_external_link(link));
    }

    #[test]
    fn test_anchor() {
        assert!(is_anchor_link("#section-1"));
        assert!(!is_anchor_link("./file.md#section-1"));
    }
}
