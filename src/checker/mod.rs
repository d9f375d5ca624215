// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - markdown: Extracts link targets from markdown text
// - classify: Tells internal, external and anchor links apart
// - http: Probes external URLs over HTTP
// - resolve: Turns one link into a valid/broken verdict
// - result: Accumulates verdicts for one file
//
// Data flows in that order: extract -> classify -> resolve -> accumulate.
// =============================================================================

mod classify;
mod http;
mod markdown;
mod resolve;
mod result;

// Re-export public items from submodules
// This lets users write `checker::extract_links()` instead of
// `checker::markdown::extract_links()`
pub use classify::{is_anchor_link, is_external_link, is_internal_link};
pub use http::{HttpProbe, LinkProbe, ProbeFailure, ProbeOutcome, MAX_REDIRECTS};
pub use markdown::{extract_links, extract_markdown_links};
pub use resolve::{resolve_external, resolve_internal, resolve_link, LinkOutcome, FILE_NOT_FOUND};
pub use result::ValidationResult;
