//! # Root-Domain Widening
//!
//! Derives apex domains from everything accumulated so far and re-seeds
//! passive enumeration with them to surface subdomains the first passes
//! missed.
//!
//! Root extraction is a fixed-arity suffix match capturing the final two
//! or three dot-delimited labels. This deliberately misclassifies
//! compound public suffixes (e.g. `example.co.uk` style registries with
//! longer labels); a public-suffix-list lookup is a known open question
//! and call sites depend on the current behavior.

use std::sync::OnceLock;

use ambit_common::host::{canonicalize, is_valid_candidate};
use regex::Regex;

/// Final two-or-three-label suffix of a hostname.
fn root_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[^.]+\.[^.]{2,3}(?:\.[^.]{2,3})?$").expect("root pattern is valid")
    })
}

/// Extracts the deduplicated set of apex domains from `hosts`, preserving
/// first-seen order so re-runs are reproducible.
///
/// Extraction is a fixed point: applying it to its own output (or to an
/// accumulator widened with it) yields the same set.
pub fn extract_roots<S: AsRef<str>>(hosts: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut roots = Vec::new();

    for host in hosts {
        let host = canonicalize(host.as_ref());
        if !is_valid_candidate(&host) {
            continue;
        }

        if let Some(found) = root_pattern().find(&host) {
            let root = found.as_str().to_string();
            if root.contains('.') && seen.insert(root.clone()) {
                roots.push(root);
            }
        }
    }

    roots
}
