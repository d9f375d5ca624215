// src/scanner/mod.rs
// =============================================================================
// This module wraps an external vulnerability scanner (osv-scanner).
//
// We don't scan anything ourselves: the wrapper runs the tool, keeps its raw
// JSON report on disk, and hands back the vulnerabilities it found.
// =============================================================================

mod osv;

pub use osv::{parse_scan_output, run_osv_scan, OsvScanner, Vulnerability, DEFAULT_SCANNER};
