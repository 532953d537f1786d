#![cfg(test)]
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ambit_common::config::Config;
use ambit_common::seed::DomainSeed;
use ambit_core::accumulator::Accumulator;
use ambit_core::attribution::SourceAttribution;
use ambit_core::pipeline::Pipeline;
use ambit_core::probe;
use ambit_core::report::{AssetStatus, build_report};
use ambit_core::resolve;
use ambit_core::sources::{Source, SourceReport};
use ambit_core::widen;
use ambit_core::workspace::Workspace;
use async_trait::async_trait;

/// A canned discovery source that behaves like a real one: reports fixed
/// candidates and writes them as its raw artifact.
struct StaticSource {
    id: &'static str,
    candidates: Vec<String>,
}

#[async_trait]
impl Source for StaticSource {
    fn id(&self) -> &'static str {
        self.id
    }

    async fn discover(&self, _seed: &DomainSeed, workspace: &Workspace) -> SourceReport {
        Workspace::write_lines(&workspace.raw_source_path(self.id), &self.candidates).unwrap();
        SourceReport::ok(self.candidates.clone())
    }
}

/// A cancelled run never touches the network or any external tool, so
/// driving mock sources and then cancelling exercises the full
/// accumulate-attribute-correlate path offline.
#[tokio::test]
async fn partial_run_reports_every_accumulated_host() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config::new("example.com".into(), Some("Acme Corp".into()), false);
    let workspace = Workspace::create(dir.path(), &cfg.org_key()).unwrap();
    let cancel = Arc::new(AtomicBool::new(false));

    let mut pipeline = Pipeline::new(cfg, workspace, cancel.clone());

    let seed = DomainSeed::Single("example.com".into());
    let wayback = StaticSource {
        id: "wayback",
        candidates: vec!["a.example.com".into(), "b.example.com".into()],
    };
    let certificate = StaticSource {
        id: "certificate",
        candidates: vec!["b.example.com".into(), "*.c.example.com".into()],
    };

    pipeline.run_source(&wayback, &seed).await;
    pipeline.run_source(&certificate, &seed).await;
    cancel.store(true, Ordering::Relaxed);

    let report = pipeline.run().await.unwrap();

    assert!(report.interrupted);
    // The wildcard candidate was rejected at the accumulator boundary.
    assert_eq!(report.total_hosts, 2);
    assert_eq!(report.assets.len(), 2);

    // Without the resolver every host degrades to "No IP".
    for asset in &report.assets {
        assert_eq!(asset.status, AssetStatus::NoIp);
    }

    // Attribution joins across sources even for already-known hosts.
    let shared = report
        .assets
        .iter()
        .find(|a| a.host == "b.example.com")
        .unwrap();
    assert_eq!(shared.sources, "wayback, certificate");
}

#[tokio::test]
async fn correlation_over_synthetic_stage_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = Workspace::create(dir.path(), "acme").unwrap();

    let mut accumulator = Accumulator::new();
    accumulator.merge_new(["web.example.com", "mail.example.com", "dead.example.com"]);

    Workspace::write_lines(
        &workspace.resolved_path(),
        &[
            r#"{"host":"web.example.com","a":["1.2.3.4","5.6.7.8","9.9.9.9","10.10.10.10"]}"#,
            r#"{"host":"mail.example.com","a":["2.2.2.2"],"mx":["mx.example.com"]}"#,
            "this line is not json",
        ],
    )
    .unwrap();

    std::fs::write(
        workspace.web_csv_path(),
        "url,host,status_code,title\n\
         https://web.example.com,web.example.com,200,Portal\n\
         https://web.example.com:8443,web.example.com,302,Admin\n\
         https://web.example.com:9443,web.example.com,200,Grafana\n",
    )
    .unwrap();

    Workspace::write_lines(&workspace.raw_source_path("subfinder"), &["web.example.com"]).unwrap();

    let resolution = resolve::parse_resolved(&workspace.resolved_path());
    let web = probe::parse_web_csv(&workspace.web_csv_path());
    let attribution = SourceAttribution::load(&workspace);

    let report = build_report(accumulator.all(), &resolution, &web, &attribution);
    assert_eq!(report.len(), 3);

    let web_host = &report[0];
    assert_eq!(web_host.status, AssetStatus::Web);
    assert_eq!(web_host.ips.len(), 3, "IP display is capped at three");
    assert_eq!(web_host.urls.len(), 2, "URL display is capped at two");
    assert_eq!(web_host.sources, "subfinder");
    // The caps are display-only; the stage maps keep the full records.
    assert_eq!(resolution.records["web.example.com"].a.len(), 4);
    assert_eq!(web["web.example.com"].len(), 3);

    assert_eq!(report[1].status, AssetStatus::Live);
    assert_eq!(report[1].ips, ["2.2.2.2"]);

    assert_eq!(report[2].status, AssetStatus::NoIp);
    assert_eq!(report[2].sources, "unknown");
}

#[tokio::test]
async fn probe_stage_declines_without_live_hosts() {
    let dir = tempfile::tempdir().unwrap();
    let workspace = Workspace::create(dir.path(), "acme").unwrap();
    Workspace::write_lines::<String>(&workspace.live_path(), &[]).unwrap();

    let web = probe::probe_stage(&workspace).await.unwrap();
    assert!(web.is_empty());
}

#[test]
fn widening_an_accumulator_reaches_a_fixed_point() {
    let mut accumulator = Accumulator::new();
    accumulator.merge_new(["a.b.example.com", "example.com", "www.example.com"]);

    let roots = widen::extract_roots(accumulator.all());
    assert_eq!(roots, ["example.com"]);

    // Merging the roots back and re-extracting changes nothing.
    let delta = accumulator.merge_new(&roots);
    assert!(delta.is_empty());
    assert_eq!(widen::extract_roots(accumulator.all()), roots);
}
