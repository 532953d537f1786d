//! Archive crawl against the Wayback Machine CDX index.
//!
//! Queries the historical URL index for everything under the seed domain
//! and extracts hostnames from the returned URL strings: split on `/`,
//! take the authority segment, strip the port.

use ambit_common::seed::DomainSeed;
use ambit_common::warn;
use async_trait::async_trait;
use tracing::debug;

use super::{Source, SourceReport, SourceStatus, dedup_preserving, http_client};
use crate::workspace::Workspace;

const CDX_URL: &str = "http://web.archive.org/cdx/search/cdx";

pub struct Wayback;

#[async_trait]
impl Source for Wayback {
    fn id(&self) -> &'static str {
        "wayback"
    }

    async fn discover(&self, seed: &DomainSeed, workspace: &Workspace) -> SourceReport {
        let Some(domain) = seed.as_single() else {
            debug!("wayback only accepts single-domain seeds");
            return SourceReport::empty(SourceStatus::Unavailable);
        };

        let out = workspace.raw_source_path(self.id());

        let request = http_client()
            .get(CDX_URL)
            .query(&[
                ("url", format!("*.{domain}")),
                ("output", "txt".into()),
                ("fl", "original".into()),
                ("collapse", "urlkey".into()),
                ("page", String::new()),
            ])
            .send();

        let body = match request.await.and_then(|r| r.error_for_status()) {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("wayback index read failed: {e}");
                    let _ = Workspace::write_lines::<String>(&out, &[]);
                    return SourceReport::empty(SourceStatus::Failed);
                }
            },
            Err(e) => {
                warn!("wayback index query failed: {e}");
                let _ = Workspace::write_lines::<String>(&out, &[]);
                return SourceReport::empty(SourceStatus::Failed);
            }
        };

        let hosts = dedup_preserving(extract_hosts(&body));
        if let Err(e) = Workspace::write_lines(&out, &hosts) {
            warn!("failed to persist wayback output: {e}");
        }

        SourceReport::ok(hosts)
    }
}

/// Pulls the authority segment out of each archived URL, dropping any port.
fn extract_hosts(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let authority = line.split('/').nth(2)?;
            let host = authority.split(':').next()?;
            host.contains('.').then(|| host.to_string())
        })
        .collect()
}
