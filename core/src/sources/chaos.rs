//! Dataset lookup against the Chaos public recon index.
//!
//! Fetches the remote index, locates an organisation-keyed bundle by
//! substring match against the normalized organisation key, downloads and
//! unpacks the zip bundle, and reads every `.txt` member line-oriented.
//!
//! A missing bundle is `Unavailable`, which tells the pipeline to fall
//! back to passive enumeration with the same seed.

use std::io::{Cursor, Read};

use ambit_common::seed::DomainSeed;
use ambit_common::{info, warn};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Source, SourceReport, SourceStatus, http_client};
use crate::workspace::Workspace;

const INDEX_URL: &str = "https://chaos-data.projectdiscovery.io/index.json";

#[derive(Debug, Deserialize)]
struct IndexEntry {
    #[serde(default)]
    name: String,
    #[serde(rename = "URL", default)]
    url: String,
}

pub struct ChaosDataset {
    org_key: String,
}

impl ChaosDataset {
    pub fn new(org_key: String) -> Self {
        Self { org_key }
    }

    fn bundle_url(&self, index: &[IndexEntry]) -> Option<String> {
        index
            .iter()
            .find(|entry| entry.name.to_lowercase().contains(&self.org_key))
            .map(|entry| entry.url.clone())
    }
}

#[async_trait]
impl Source for ChaosDataset {
    fn id(&self) -> &'static str {
        "chaos"
    }

    async fn discover(&self, _seed: &DomainSeed, workspace: &Workspace) -> SourceReport {
        let out = workspace.raw_source_path(self.id());

        let index: Vec<IndexEntry> = match fetch_index().await {
            Ok(index) => index,
            Err(e) => {
                warn!("dataset index fetch failed: {e}");
                return SourceReport::empty(SourceStatus::Failed);
            }
        };

        let Some(url) = self.bundle_url(&index) else {
            debug!("no dataset bundle matches `{}`", self.org_key);
            return SourceReport::empty(SourceStatus::Unavailable);
        };

        info!("downloading dataset bundle {url}");
        let bytes = match fetch_bundle(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("dataset bundle download failed: {e}");
                return SourceReport::empty(SourceStatus::Failed);
            }
        };

        let candidates = match unpack_bundle(&bytes) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("dataset bundle unpack failed: {e}");
                return SourceReport::empty(SourceStatus::Failed);
            }
        };

        if let Err(e) = Workspace::write_lines(&out, &candidates) {
            warn!("failed to persist dataset output: {e}");
        }

        SourceReport::ok(candidates)
    }
}

async fn fetch_index() -> reqwest::Result<Vec<IndexEntry>> {
    http_client()
        .get(INDEX_URL)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

async fn fetch_bundle(url: &str) -> reqwest::Result<Vec<u8>> {
    Ok(http_client()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?
        .to_vec())
}

/// Reads every `.txt` member of the zip bundle as newline-delimited
/// candidates.
fn unpack_bundle(bytes: &[u8]) -> anyhow::Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut candidates = Vec::new();

    for index in 0..archive.len() {
        let mut member = archive.by_index(index)?;
        if !member.name().ends_with(".txt") {
            continue;
        }

        let mut content = String::new();
        member.read_to_string(&mut content)?;
        candidates.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(candidates)
}
