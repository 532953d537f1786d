//! The central **abstraction** for subdomain discovery sources.
//!
//! This module defines the unified interface every discovery mechanism
//! (dataset lookup, passive enumeration, archive crawl, certificate
//! transparency, brute enumeration) must implement. The pipeline depends
//! only on this trait, so individual sources can be swapped or mocked
//! without touching the orchestration logic.
//!
//! Every source writes its raw, pre-filter output to a per-source artifact
//! regardless of success; the attribution map is later rebuilt from those
//! files. A failing source degrades to an empty contribution, never to a
//! failed run.

use std::sync::OnceLock;
use std::time::Duration;

use ambit_common::error::ToolError;
use ambit_common::seed::DomainSeed;
use async_trait::async_trait;

use crate::workspace::Workspace;

pub mod amass;
pub mod certificate;
pub mod chaos;
pub mod findomain;
pub mod subfinder;
pub mod wayback;

/// Request timeout for the external HTTP APIs (dataset index, archive
/// index, certificate search).
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome classification of one discovery pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceStatus {
    /// The source ran and produced output (possibly zero candidates).
    Ok,
    /// The required tool or dataset is missing; zero contribution.
    Unavailable,
    /// The source errored; whatever partial output exists is kept.
    Failed,
    /// The time bound expired; the process group was killed.
    TimedOut,
}

/// Raw candidates and status reported by one discovery pass.
#[derive(Debug)]
pub struct SourceReport {
    pub candidates: Vec<String>,
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn ok(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            status: SourceStatus::Ok,
        }
    }

    pub fn empty(status: SourceStatus) -> Self {
        Self {
            candidates: Vec::new(),
            status,
        }
    }
}

/// One pluggable discovery mechanism.
#[async_trait]
pub trait Source: Send + Sync {
    /// Artifact stem for this source's raw output file.
    fn id(&self) -> &'static str;

    /// Label recorded in the attribution map.
    fn label(&self) -> &'static str {
        self.id()
    }

    /// Runs one discovery pass for `seed`, writing raw output into the
    /// workspace. Must not fail the run: errors map to a degraded status.
    async fn discover(&self, seed: &DomainSeed, workspace: &Workspace) -> SourceReport;
}

/// Shared HTTP client with the short fixed request timeout.
pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("ambit/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default()
    })
}

/// Maps a tool failure onto the source status taxonomy.
pub(crate) fn status_of(err: &ToolError) -> SourceStatus {
    match err {
        ToolError::NotFound(_) => SourceStatus::Unavailable,
        ToolError::TimedOut { .. } => SourceStatus::TimedOut,
        ToolError::Failed { .. } => SourceStatus::Failed,
    }
}

/// Order-preserving dedup (case-insensitive) for raw artifact files.
pub(crate) fn dedup_preserving(lines: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    lines
        .into_iter()
        .filter(|line| seen.insert(line.trim().to_lowercase()))
        .collect()
}
