//! # The Discovery Accumulator
//!
//! The single piece of shared mutable state in the pipeline: the growing,
//! deduplicated, order-preserving set of every hostname discovered so far.
//!
//! Candidates are canonicalized and validated on the way in, and `merge_new`
//! reports only the delta a source actually contributed. The set grows
//! monotonically across the run and never shrinks.

use std::collections::HashSet;

use ambit_common::host::{canonicalize, is_valid_candidate};

/// Ordered, deduplicated set of canonical hostnames.
#[derive(Debug, Default)]
pub struct Accumulator {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalizes and validates each candidate, discards those already
    /// present, and appends the rest in first-seen order.
    ///
    /// Returns exactly the newly-added subset. Calling this twice with the
    /// same input is a no-op the second time.
    pub fn merge_new<I, S>(&mut self, candidates: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut delta = Vec::new();

        for candidate in candidates {
            let host = canonicalize(candidate.as_ref());
            if !is_valid_candidate(&host) {
                continue;
            }
            if self.seen.insert(host.clone()) {
                self.order.push(host.clone());
                delta.push(host);
            }
        }

        delta
    }

    /// Full snapshot in insertion order.
    pub fn all(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, host: &str) -> bool {
        self.seen.contains(&canonicalize(host))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
