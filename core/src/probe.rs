//! # Web Probe Stage
//!
//! Drives `httpx` over the live-host set across a fixed catalog of
//! commonly-web-serving ports (a bounded-cost allowlist, not a range
//! scan) and parses the tabular output into the per-host endpoint map.
//!
//! The stage declines to run when there is nothing live to probe.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use ambit_common::host::canonicalize;
use ambit_common::{success, warn};
use tracing::debug;

use crate::exec;
use crate::workspace::Workspace;

const TOOL: &str = "httpx";
const TIMEOUT: Duration = Duration::from_secs(1800);

/// Explicit allowlist of ports worth probing for web services.
const WEB_PORTS: &str = "80,81,82,88,135,143,300,443,554,591,593,832,902,981,993,1010,1024,\
1311,2077,2079,2082,2083,2086,2087,2095,2096,2222,2480,3000,3128,3306,3333,3389,4243,4443,\
4567,4711,4712,4993,5000,5001,5060,5104,5108,5357,5432,5800,5985,6379,6543,7000,7170,7396,\
7474,7547,8000,8001,8008,8014,8042,8069,8080,8081,8083,8085,8088,8089,8090,8091,8118,8123,\
8172,8181,8222,8243,8280,8281,8333,8443,8500,8834,8880,8888,8983,9000,9043,9060,9080,9090,\
9091,9100,9200,9443,9800,9981,9999,10000,10443,12345,12443,16080,18091,18092,20720,28017,49152";

/// One probed endpoint on a host; a host may expose many across
/// ports and schemes.
#[derive(Clone, Debug)]
pub struct WebEndpoint {
    pub url: String,
    pub status_code: Option<u16>,
    pub title: Option<String>,
}

pub type WebMap = HashMap<String, Vec<WebEndpoint>>;

/// Runs the probe stage against the persisted live list and returns the
/// endpoint map keyed by canonical host.
pub async fn probe_stage(workspace: &Workspace) -> anyhow::Result<WebMap> {
    let live_path = workspace.live_path();
    let live = Workspace::read_lines(&live_path);
    if live.is_empty() {
        warn!("no live hosts, skipping web discovery");
        return Ok(WebMap::new());
    }

    if !exec::tool_available(TOOL) {
        warn!("{TOOL} not found, skipping web discovery");
        return Ok(WebMap::new());
    }

    let csv_path = workspace.web_csv_path();
    let live_str = live_path.display().to_string();
    let csv_str = csv_path.display().to_string();
    let args = [
        "-fr", "-nc", "-silent", "-l", &live_str, "-p", WEB_PORTS, "-csv", "-o", &csv_str,
    ];

    match exec::run_tool(TOOL, &args, TIMEOUT).await {
        Ok(output) if !output.exit_ok => {
            warn!("{TOOL} exited non-zero, continuing with available results")
        }
        Ok(_) => success!("probed {} live hosts", live.len()),
        Err(e) => warn!("{e}, continuing with available results"),
    }

    let web = parse_web_csv(&csv_path);

    let mut urls: Vec<&str> = Vec::new();
    for endpoints in web.values() {
        urls.extend(endpoints.iter().map(|e| e.url.as_str()));
    }
    urls.sort_unstable();
    urls.dedup();
    Workspace::write_lines(&workspace.site_list_path(), &urls)?;

    Ok(web)
}

/// Parses the probe's CSV output. Rows without an `http`-scheme URL are
/// discarded; malformed rows are skipped, never fatal. The host key comes
/// from the `host` column when present, else from the URL authority.
pub fn parse_web_csv(path: &Path) -> WebMap {
    let mut web = WebMap::new();

    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(e) => {
            debug!("no probe output to parse: {e}");
            return web;
        }
    };

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            debug!("probe output has no readable header: {e}");
            return web;
        }
    };
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (url_col, host_col, status_col, title_col) = (
        column("url"),
        column("host"),
        column("status_code"),
        column("title"),
    );

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("skipping malformed probe row: {e}");
                continue;
            }
        };

        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let Some(url) = field(url_col) else { continue };
        if !url.starts_with("http") {
            continue;
        }

        let host = field(host_col)
            .map(str::to_string)
            .or_else(|| host_from_url(url));
        let Some(host) = host else { continue };

        let endpoint = WebEndpoint {
            url: url.to_string(),
            status_code: field(status_col).and_then(|v| v.parse().ok()),
            title: field(title_col).map(str::to_string),
        };

        web.entry(canonicalize(&host)).or_default().push(endpoint);
    }

    web
}

/// Authority segment of a URL, port stripped.
fn host_from_url(url: &str) -> Option<String> {
    let authority = url.split("://").nth(1)?.split('/').next()?;
    let host = authority.split(':').next()?;
    (!host.is_empty()).then(|| host.to_string())
}
