//! Certificate-transparency search through crt.sh.
//!
//! First resolves the organisation's registrant name with a WHOIS lookup
//! (discarding privacy/proxy placeholders), then queries the CT index
//! twice: once by organisation name when one survived the filter, once by
//! the seed domain directly. Wildcard prefixes are stripped from the
//! extracted names.

use std::time::Duration;

use ambit_common::seed::DomainSeed;
use ambit_common::warn;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Source, SourceReport, SourceStatus, dedup_preserving, http_client};
use crate::exec;
use crate::workspace::Workspace;

const CRTSH_URL: &str = "https://crt.sh/";
const WHOIS_TIMEOUT: Duration = Duration::from_secs(30);

/// Registrant values that are privacy services, not real organisations.
const PRIVACY_MARKERS: &[&str] = &[
    "whois",
    "domain",
    "proxy",
    "privacy",
    "redacted",
    "protected",
    "dnstination",
    "whoisguard",
];

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    #[serde(default)]
    common_name: Option<String>,
    #[serde(default)]
    name_value: Option<String>,
}

pub struct CertTransparency;

#[async_trait]
impl Source for CertTransparency {
    fn id(&self) -> &'static str {
        "certificate"
    }

    async fn discover(&self, seed: &DomainSeed, workspace: &Workspace) -> SourceReport {
        let Some(domain) = seed.as_single() else {
            debug!("certificate search only accepts single-domain seeds");
            return SourceReport::empty(SourceStatus::Unavailable);
        };

        let out = workspace.raw_source_path(self.id());
        let mut names: Vec<String> = Vec::new();
        let mut any_query_succeeded = false;

        if let Some(registrant) = registrant_org(domain).await {
            let query = urlencoding::encode(&registrant.replace(' ', "+")).into_owned();
            match fetch_entries(&format!("{CRTSH_URL}?O={query}&output=json")).await {
                Ok(entries) => {
                    any_query_succeeded = true;
                    names.extend(entries.iter().flat_map(entry_names));
                }
                Err(e) => warn!("certificate query by organisation failed: {e}"),
            }
        }

        let query = urlencoding::encode(domain);
        match fetch_entries(&format!("{CRTSH_URL}?q={query}&output=json")).await {
            Ok(entries) => {
                any_query_succeeded = true;
                names.extend(entries.iter().flat_map(entry_names));
            }
            Err(e) => warn!("certificate query by domain failed: {e}"),
        }

        let names = dedup_preserving(names);
        if let Err(e) = Workspace::write_lines(&out, &names) {
            warn!("failed to persist certificate output: {e}");
        }

        if any_query_succeeded {
            SourceReport::ok(names)
        } else {
            SourceReport::empty(SourceStatus::Failed)
        }
    }
}

/// Looks up the registrant organisation via the `whois` tool, returning
/// `None` for missing tools, missing fields, and privacy-service values.
async fn registrant_org(domain: &str) -> Option<String> {
    let output = match exec::run_tool("whois", &[domain], WHOIS_TIMEOUT).await {
        Ok(output) => output,
        Err(e) => {
            debug!("whois lookup skipped: {e}");
            return None;
        }
    };

    let registrant = output.stdout.lines().find_map(|line| {
        if line.contains("Registrant Organization") || line.contains("Registrant Organisation") {
            line.split_once(':').map(|(_, value)| value.trim().to_string())
        } else {
            None
        }
    })?;

    let lowered = registrant.to_lowercase();
    if PRIVACY_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        debug!("registrant `{registrant}` looks like a privacy service, ignoring");
        return None;
    }

    Some(registrant)
}

async fn fetch_entries(url: &str) -> reqwest::Result<Vec<CrtShEntry>> {
    http_client()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<CrtShEntry>>()
        .await
}

/// A single CT entry may carry a common name plus a newline-separated SAN
/// block; both contribute candidates, wildcard prefixes stripped.
fn entry_names(entry: &CrtShEntry) -> Vec<String> {
    let mut names = Vec::new();

    if let Some(cn) = &entry.common_name {
        push_name(&mut names, cn);
    }
    if let Some(block) = &entry.name_value {
        for name in block.lines() {
            push_name(&mut names, name);
        }
    }

    names
}

fn push_name(names: &mut Vec<String>, raw: &str) {
    let name = raw.trim().trim_start_matches("*.");
    if !name.is_empty() && name.contains('.') {
        names.push(name.to_string());
    }
}
