// src/checker/markdown.rs
// =============================================================================
// This module extracts link targets from Markdown text.
//
// We use the `regex` crate rather than a full Markdown parser. The extractor
// is deliberately a text scan:
// 1. Fenced code blocks (```...```) are cut out of the text
// 2. Inline code spans (`...`) are cut out
// 3. Each pattern runs over what is left, in a fixed order:
//    inline links, reference usages, reference definitions, then any custom
//    patterns from the config
//
// The output order is pattern order first, then match order inside each
// pattern. It is NOT document order: all inline links come before all
// reference usages, and so on.
//
// Rust concepts:
// - OnceLock: Compile the built-in regexes once and share them
// - Iterators: captures_iter() walks all non-overlapping matches
// - Slices: Custom patterns are borrowed as &[Regex]
// =============================================================================

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::config::EmptyLinkPolicy;

// The built-in patterns, compiled once on first use.
//
// Labels and targets exclude '\n' so a link broken across lines is not
// matched.
struct BuiltinPatterns {
    fenced_code: Regex,
    inline_code: Regex,
    inline_link: Regex,
    reference_usage: Regex,
    reference_definition: Regex,
}

fn builtin() -> &'static BuiltinPatterns {
    static PATTERNS: OnceLock<BuiltinPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        // These are constants, so a failure here is a programmer error.
        let compile = |pattern: &str| Regex::new(pattern).expect("built-in pattern is valid");
        BuiltinPatterns {
            fenced_code: compile(r"(?s)```.*?```"),
            inline_code: compile(r"`[^`]*`"),
            // [label](target)
            inline_link: compile(r"\[([^\]\n]*)\]\(([^)\n]*)\)"),
            // [label][ref]
            reference_usage: compile(r"\[([^\]\n]*)\]\[([^\]\n]*)\]"),
            // [ref]: target "optional title"   (at the start of a line, LF or CRLF)
            reference_definition: compile(
                r#"(?mR)^\[([^\]\n]*)\]:[ \t]*(.+?)(?:[ \t]+(?:"[^"\n]*"|'[^'\n]*'|\([^)\n]*\)))?[ \t]*$"#,
            ),
        }
    })
}

// Extracts all link targets from Markdown text using the default settings
//
// Parameters:
//   markdown: the markdown text to scan (borrowed as &str)
//
// Returns: Vec<String> of trimmed targets, duplicates kept
//
// Example input:
//   "See [Rust](https://www.rust-lang.org) and [docs](./docs/README.md)"
//
// Example output:
//   vec!["https://www.rust-lang.org", "./docs/README.md"]
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    extract_links(markdown, &[], EmptyLinkPolicy::Drop)
}

// Extracts link targets with extra patterns and an empty-link policy
//
// Parameters:
//   markdown: the markdown text to scan
//   custom_patterns: extra patterns, run after the built-in ones in order
//   empty_links: whether `[x]()` yields an empty target or nothing
//
// For every match, the target is the second capture group when the pattern
// has two or more groups (an unmatched second group counts as empty), the
// first group when it has exactly one, and the whole match when it has none.
// Targets that are empty after trimming are dropped, except an empty
// inline link under EmptyLinkPolicy::SelfReference.
pub fn extract_links(
    markdown: &str,
    custom_patterns: &[Regex],
    empty_links: EmptyLinkPolicy,
) -> Vec<String> {
    let patterns = builtin();

    // Remove code first so nothing inside it is ever treated as a link
    let without_fences = patterns.fenced_code.replace_all(markdown, "");
    let text = patterns.inline_code.replace_all(&without_fences, "");

    let keep_empty_inline = empty_links == EmptyLinkPolicy::SelfReference;

    let ordered = [
        (&patterns.inline_link, keep_empty_inline),
        (&patterns.reference_usage, false),
        (&patterns.reference_definition, false),
    ]
    .into_iter()
    .chain(custom_patterns.iter().map(|pattern| (pattern, false)));

    let mut links = Vec::new();

    for (pattern, keep_empty) in ordered {
        for captures in pattern.captures_iter(&text) {
            let target = select_target(pattern, &captures).trim();

            if !target.is_empty() || keep_empty {
                links.push(target.to_string());
            }
        }
    }

    links
}

// Picks the target text out of one match
fn select_target<'t>(pattern: &Regex, captures: &Captures<'t>) -> &'t str {
    // captures_len() counts the implicit whole-match group too
    let groups = pattern.captures_len() - 1;

    let chosen = match groups {
        0 => captures.get(0),
        1 => captures.get(1),
        _ => captures.get(2),
    };

    chosen.map(|m| m.as_str()).unwrap_or("")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is OnceLock?
//    - A cell that is written at most once, safely across threads
//    - get_or_init() runs the closure the first time, then returns the
//      stored value forever after
//    - Compiling a regex is expensive, so we only want to do it once
//
// 2. Why does replace_all return a Cow?
//    - Cow = "clone on write"
//    - If nothing matched, it just borrows the input (no copy)
//    - If something was replaced, it owns a new String
//
// 3. What is the 't lifetime in select_target?
//    - The returned &str points into the scanned text, not into the Captures
//    - Spelling out 't tells the compiler that, so we can keep the slice
//      after the Captures value is gone
// -----------------------------------------------------------------------------
