//! # DNS Resolution Stage
//!
//! Drives `dnsx` over the full accumulator snapshot (plus the bare root
//! domain and its `www.` prefix) and parses the one-JSON-record-per-line
//! output into the per-host DNS map. A host counts as live iff it has at
//! least one A or AAAA answer.
//!
//! With `dnsx` missing the stage produces an empty map and an empty live
//! set; downstream stages tolerate both.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use ambit_common::config::Config;
use ambit_common::host::canonicalize;
use ambit_common::{success, warn};
use serde::Deserialize;
use tracing::debug;

use crate::accumulator::Accumulator;
use crate::exec;
use crate::workspace::Workspace;

const TOOL: &str = "dnsx";
const TIMEOUT: Duration = Duration::from_secs(600);

/// All records resolved for one host. NS/SOA/CAA/PTR are kept as
/// presence-only signals; liveness is decided by A/AAAA alone.
#[derive(Clone, Debug, Default)]
pub struct DnsRecord {
    pub a: Vec<String>,
    pub aaaa: Vec<String>,
    pub cname: Vec<String>,
    pub mx: Vec<String>,
    pub txt: Vec<String>,
    pub ns: Vec<String>,
    pub soa: Vec<String>,
    pub caa: Vec<String>,
    pub ptr: Vec<String>,
}

impl DnsRecord {
    /// A host has confirmed liveness iff it resolved to an address.
    pub fn is_live(&self) -> bool {
        !self.a.is_empty() || !self.aaaa.is_empty()
    }
}

/// Output of the resolution stage.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Canonical host to resolved records.
    pub records: HashMap<String, DnsRecord>,
    /// Hosts with at least one A/AAAA answer, in output-file order.
    pub live: Vec<String>,
}

/// The `host` field of a dnsx record may be a string or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostField {
    One(String),
    Many(Vec<String>),
}

impl HostField {
    fn into_hosts(self) -> Vec<String> {
        match self {
            HostField::One(host) => vec![host],
            HostField::Many(hosts) => hosts,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResolvedLine {
    host: Option<HostField>,
    #[serde(default)]
    a: Vec<String>,
    #[serde(default)]
    aaaa: Vec<String>,
    #[serde(default)]
    cname: Vec<String>,
    #[serde(default)]
    mx: Vec<String>,
    #[serde(default)]
    txt: Vec<String>,
    #[serde(default)]
    ns: Vec<String>,
    #[serde(default)]
    soa: Vec<String>,
    #[serde(default)]
    caa: Vec<String>,
    #[serde(default)]
    ptr: Vec<String>,
}

/// Runs the resolution stage: persists the master list, invokes the
/// resolver, and parses whatever output exists afterwards.
pub async fn resolve_stage(
    cfg: &Config,
    workspace: &Workspace,
    accumulator: &mut Accumulator,
) -> anyhow::Result<Resolution> {
    // The bare root and its www twin always get a resolution attempt even
    // when no source reported them.
    accumulator.merge_new([cfg.domain.clone(), format!("www.{}", cfg.domain)]);

    let master = workspace.master_path(&cfg.org_key());
    Workspace::write_lines(&master, accumulator.all())?;

    if !exec::tool_available(TOOL) {
        warn!("{TOOL} not found, skipping resolution");
        Workspace::write_lines::<String>(&workspace.live_path(), &[])?;
        return Ok(Resolution::default());
    }

    let resolved = workspace.resolved_path();
    let master_str = master.display().to_string();
    let resolved_str = resolved.display().to_string();
    let args = [
        "-l", &master_str, "-silent", "-a", "-aaaa", "-cname", "-ns", "-txt", "-ptr", "-mx",
        "-soa", "-caa", "-resp", "-json", "-o", &resolved_str,
    ];

    match exec::run_tool(TOOL, &args, TIMEOUT).await {
        Ok(output) if !output.exit_ok => {
            warn!("{TOOL} exited non-zero, continuing with available results")
        }
        Ok(_) => success!("resolved {} candidate hosts", accumulator.len()),
        Err(e) => warn!("{e}, continuing with available results"),
    }

    let resolution = parse_resolved(&resolved);
    Workspace::write_lines(&workspace.live_path(), &resolution.live)?;

    Ok(resolution)
}

/// Parses the resolver's JSONL output. Unparseable lines are skipped,
/// never fatal; a missing file parses as empty.
pub fn parse_resolved(path: &Path) -> Resolution {
    let mut resolution = Resolution::default();
    let mut seen_live = std::collections::HashSet::new();

    for line in Workspace::read_lines(path) {
        let parsed: ResolvedLine = match serde_json::from_str(&line) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("skipping malformed resolver record: {e}");
                continue;
            }
        };

        let Some(hosts) = parsed.host.map(HostField::into_hosts) else {
            continue;
        };

        for host in hosts {
            let key = canonicalize(&host);
            if key.is_empty() {
                continue;
            }

            let record = resolution.records.entry(key.clone()).or_default();
            record.a.extend(parsed.a.iter().cloned());
            record.aaaa.extend(parsed.aaaa.iter().cloned());
            record.cname.extend(parsed.cname.iter().cloned());
            record.mx.extend(parsed.mx.iter().cloned());
            record.txt.extend(parsed.txt.iter().cloned());
            record.ns.extend(parsed.ns.iter().cloned());
            record.soa.extend(parsed.soa.iter().cloned());
            record.caa.extend(parsed.caa.iter().cloned());
            record.ptr.extend(parsed.ptr.iter().cloned());

            if record.is_live() && seen_live.insert(key.clone()) {
                resolution.live.push(key);
            }
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_resolved(lines: &[&str]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolved.jsonl");
        Workspace::write_lines(&path, lines).unwrap();
        (dir, path)
    }

    #[test]
    fn live_requires_an_address_record() {
        let (_dir, path) = write_resolved(&[
            r#"{"host":"a.example.com","a":["1.2.3.4"]}"#,
            r#"{"host":"b.example.com","txt":["v=spf1"]}"#,
            r#"{"host":"c.example.com","aaaa":["::1"]}"#,
        ]);

        let resolution = parse_resolved(&path);
        assert_eq!(resolution.live, ["a.example.com", "c.example.com"]);
        assert!(resolution.records.contains_key("b.example.com"));
        assert!(!resolution.records["b.example.com"].is_live());
    }

    #[test]
    fn host_field_accepts_string_or_list() {
        let (_dir, path) = write_resolved(&[
            r#"{"host":["x.example.com","y.example.com"],"a":["1.1.1.1"]}"#,
        ]);

        let resolution = parse_resolved(&path);
        assert_eq!(resolution.live, ["x.example.com", "y.example.com"]);
    }

    #[test]
    fn malformed_lines_are_skipped_not_fatal() {
        let (_dir, path) = write_resolved(&[
            "not json at all",
            r#"{"host":"ok.example.com","a":["9.9.9.9"]}"#,
            r#"{"host": 42}"#,
        ]);

        let resolution = parse_resolved(&path);
        assert_eq!(resolution.live, ["ok.example.com"]);
    }

    #[test]
    fn keys_are_canonicalized() {
        let (_dir, path) = write_resolved(&[r#"{"host":"Mail.Example.COM.","a":["1.2.3.4"]}"#]);

        let resolution = parse_resolved(&path);
        assert!(resolution.records.contains_key("mail.example.com"));
    }

    #[test]
    fn missing_file_parses_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let resolution = parse_resolved(&dir.path().join("nope.jsonl"));
        assert!(resolution.records.is_empty());
        assert!(resolution.live.is_empty());
    }
}
