//! # Per-Source Attribution
//!
//! Records which source(s) reported each host. Built lazily from the raw
//! per-source artifact files rather than from the accumulator: a source
//! that contributes an already-known host still gets credited for it.

use std::collections::HashMap;

use ambit_common::host::{canonicalize, is_valid_candidate};

use crate::workspace::Workspace;

/// Attribution label and raw artifact stem for every source, in pipeline
/// order. The widening pass has its own artifact but shares the passive
/// enumeration label.
pub const SOURCE_FILES: &[(&str, &str)] = &[
    ("chaos", "chaos"),
    ("subfinder", "subfinder"),
    ("amass", "amass"),
    ("wayback", "wayback"),
    ("certificate", "certificate"),
    ("findomain", "findomain"),
    ("subfinder", "subfinder2"),
];

/// Canonical host to the ordered set of source labels that reported it.
#[derive(Debug, Default)]
pub struct SourceAttribution {
    map: HashMap<String, Vec<String>>,
}

impl SourceAttribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds attribution from the raw artifacts of a run. Missing
    /// files contribute nothing.
    pub fn load(workspace: &Workspace) -> Self {
        let mut attribution = Self::new();

        for (label, artifact) in SOURCE_FILES {
            let lines = Workspace::read_lines(&workspace.raw_source_path(artifact));
            for line in lines {
                attribution.record(&line, label);
            }
        }

        attribution
    }

    /// Credits `label` for `raw_host`. First-report order is preserved,
    /// duplicates are dropped.
    pub fn record(&mut self, raw_host: &str, label: &str) {
        let host = canonicalize(raw_host);
        if !is_valid_candidate(&host) {
            return;
        }

        let labels = self.map.entry(host).or_default();
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }

    pub fn sources_for(&self, host: &str) -> Option<&[String]> {
        self.map.get(host).map(Vec::as_slice)
    }
}
