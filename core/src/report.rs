//! # Correlation and Report Building
//!
//! The final join: for every accumulated host, reconcile DNS answers, web
//! endpoints, and per-source attribution into one asset record. Records
//! are derived fresh on every call and follow accumulator insertion
//! order, so a fixed set of upstream artifacts always produces the same
//! sequence.

use ambit_common::host::canonicalize;

use crate::attribution::SourceAttribution;
use crate::probe::WebMap;
use crate::resolve::{DnsRecord, Resolution};

/// Display caps. Truncation is display-only: the full record sets stay in
/// the DNS and web maps.
pub const MAX_DISPLAY_IPS: usize = 3;
pub const MAX_DISPLAY_URLS: usize = 2;

/// Liveness classification, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    /// At least one probed web endpoint.
    Web,
    /// At least one A/AAAA answer, no web endpoint.
    Live,
    /// No confirmed liveness.
    NoIp,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Web => "Web",
            AssetStatus::Live => "Live",
            AssetStatus::NoIp => "No IP",
        }
    }
}

/// The per-host correlated view. Derived, never mutated in place.
#[derive(Clone, Debug)]
pub struct AssetRecord {
    pub host: String,
    pub ips: Vec<String>,
    pub urls: Vec<String>,
    pub sources: String,
    pub status: AssetStatus,
}

/// Joins the four upstream maps by canonical host key.
pub fn build_report(
    hosts: &[String],
    resolution: &Resolution,
    web: &WebMap,
    attribution: &SourceAttribution,
) -> Vec<AssetRecord> {
    hosts
        .iter()
        .map(|host| build_record(host, resolution, web, attribution))
        .collect()
}

fn build_record(
    host: &str,
    resolution: &Resolution,
    web: &WebMap,
    attribution: &SourceAttribution,
) -> AssetRecord {
    let key = canonicalize(host);

    let ips = lookup(&resolution.records, &key)
        .map(display_ips)
        .unwrap_or_default();

    let urls = lookup(web, &key)
        .map(|endpoints| {
            endpoints
                .iter()
                .take(MAX_DISPLAY_URLS)
                .map(|e| e.url.clone())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let sources = attribution
        .sources_for(&key)
        .or_else(|| attribution.sources_for(key.trim_end_matches('.')))
        .map(|labels| labels.join(", "))
        .unwrap_or_else(|| "unknown".to_string());

    let status = if !urls.is_empty() {
        AssetStatus::Web
    } else if !ips.is_empty() {
        AssetStatus::Live
    } else {
        AssetStatus::NoIp
    };

    AssetRecord {
        host: key,
        ips,
        urls,
        sources,
        status,
    }
}

/// Exact key first, then the key with a trailing dot stripped.
fn lookup<'a, V>(map: &'a std::collections::HashMap<String, V>, key: &str) -> Option<&'a V> {
    map.get(key).or_else(|| map.get(key.trim_end_matches('.')))
}

/// Union of A and AAAA, order-preserving dedup, capped for display.
fn display_ips(record: &DnsRecord) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    record
        .a
        .iter()
        .chain(record.aaaa.iter())
        .filter(|ip| seen.insert(ip.as_str()))
        .take(MAX_DISPLAY_IPS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::WebEndpoint;

    fn resolution_with(host: &str, a: &[&str]) -> Resolution {
        let mut resolution = Resolution::default();
        resolution.records.insert(
            host.to_string(),
            DnsRecord {
                a: a.iter().map(|s| s.to_string()).collect(),
                ..DnsRecord::default()
            },
        );
        resolution
    }

    fn endpoint(url: &str) -> WebEndpoint {
        WebEndpoint {
            url: url.to_string(),
            status_code: Some(200),
            title: None,
        }
    }

    #[test]
    fn joins_all_four_maps_for_one_host() {
        let hosts = vec!["x.example.com".to_string()];
        let resolution = resolution_with("x.example.com", &["1.2.3.4"]);

        let mut web = WebMap::new();
        web.insert(
            "x.example.com".into(),
            vec![endpoint("http://x.example.com")],
        );

        let mut attribution = SourceAttribution::new();
        attribution.record("x.example.com", "subfinder");

        let report = build_report(&hosts, &resolution, &web, &attribution);
        assert_eq!(report.len(), 1);

        let record = &report[0];
        assert_eq!(record.status, AssetStatus::Web);
        assert_eq!(record.ips, ["1.2.3.4"]);
        assert_eq!(record.urls, ["http://x.example.com"]);
        assert_eq!(record.sources, "subfinder");
    }

    #[test]
    fn degrades_to_no_ip_without_any_dns_data() {
        let hosts = vec!["a.example.com".to_string(), "b.example.com".to_string()];
        let report = build_report(
            &hosts,
            &Resolution::default(),
            &WebMap::new(),
            &SourceAttribution::new(),
        );

        assert_eq!(report.len(), 2);
        for record in &report {
            assert_eq!(record.status, AssetStatus::NoIp);
            assert!(record.ips.is_empty());
            assert_eq!(record.sources, "unknown");
        }
    }

    #[test]
    fn ip_display_is_capped_but_records_keep_everything() {
        let hosts = vec!["x.example.com".to_string()];
        let resolution = resolution_with(
            "x.example.com",
            &["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4", "5.5.5.5"],
        );

        let report = build_report(
            &hosts,
            &resolution,
            &WebMap::new(),
            &SourceAttribution::new(),
        );

        assert_eq!(report[0].ips.len(), MAX_DISPLAY_IPS);
        assert_eq!(resolution.records["x.example.com"].a.len(), 5);
        assert_eq!(report[0].status, AssetStatus::Live);
    }

    #[test]
    fn live_without_web_endpoint() {
        let hosts = vec!["x.example.com".to_string()];
        let resolution = resolution_with("x.example.com", &["1.2.3.4"]);
        let report = build_report(
            &hosts,
            &resolution,
            &WebMap::new(),
            &SourceAttribution::new(),
        );

        assert_eq!(report[0].status, AssetStatus::Live);
    }

    #[test]
    fn report_is_deterministic_and_ordered() {
        let hosts = vec![
            "z.example.com".to_string(),
            "a.example.com".to_string(),
        ];
        let resolution = Resolution::default();
        let web = WebMap::new();
        let attribution = SourceAttribution::new();

        let first = build_report(&hosts, &resolution, &web, &attribution);
        let second = build_report(&hosts, &resolution, &web, &attribution);

        let order: Vec<_> = first.iter().map(|r| r.host.clone()).collect();
        assert_eq!(order, hosts);
        assert_eq!(
            second.iter().map(|r| r.host.clone()).collect::<Vec<_>>(),
            order
        );
    }
}
