//! # The Discovery Pipeline
//!
//! Orchestrates the run as an explicit context value threaded through
//! each stage: enumeration passes feed the accumulator sequentially,
//! widening re-seeds passive enumeration with derived roots, then the
//! resolution and probe stages run over the accumulated snapshot, and the
//! correlator joins everything at the end.
//!
//! The pipeline is strictly sequential; every stage's artifacts are
//! durably on disk before the next stage starts, so a later stage can run
//! against partial results when an earlier one degraded. A cancellation
//! request stops the run at the next stage boundary and skips straight to
//! best-effort reporting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ambit_common::config::Config;
use ambit_common::seed::DomainSeed;
use ambit_common::{success, warn};

use crate::accumulator::Accumulator;
use crate::attribution::SourceAttribution;
use crate::probe::{self, WebMap};
use crate::report::{self, AssetRecord};
use crate::resolve::{self, Resolution};
use crate::sources::{
    Source, SourceStatus, amass::Amass, certificate::CertTransparency, chaos::ChaosDataset,
    dedup_preserving, findomain::Findomain, subfinder::Subfinder, wayback::Wayback,
};
use crate::widen;
use crate::workspace::Workspace;

/// Everything the reporter needs after a run, partial or complete.
#[derive(Debug)]
pub struct RunReport {
    pub assets: Vec<AssetRecord>,
    pub root_domains: Vec<String>,
    pub total_hosts: usize,
    pub live_hosts: usize,
    pub web_urls: usize,
    pub interrupted: bool,
}

pub struct Pipeline {
    cfg: Config,
    workspace: Workspace,
    accumulator: Accumulator,
    cancel: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new(cfg: Config, workspace: Workspace, cancel: Arc<AtomicBool>) -> Self {
        Self {
            cfg,
            workspace,
            accumulator: Accumulator::new(),
            cancel,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Runs one discovery pass: invokes the source, merges its candidates,
    /// and logs the yield. Only the merge delta counts as the source's
    /// contribution.
    pub async fn run_source(&mut self, source: &dyn Source, seed: &DomainSeed) -> SourceStatus {
        let report = source.discover(seed, &self.workspace).await;
        let delta = self.accumulator.merge_new(&report.candidates);

        match report.status {
            SourceStatus::Ok => success!("{}: {} new hosts", source.id(), delta.len()),
            SourceStatus::Unavailable => warn!("{}: unavailable, skipping", source.id()),
            SourceStatus::Failed => warn!("{}: failed, {} new hosts kept", source.id(), delta.len()),
            SourceStatus::TimedOut => {
                warn!("{}: timed out, {} new hosts kept", source.id(), delta.len())
            }
        }

        report.status
    }

    /// The ordered enumeration passes: dataset lookup (with passive
    /// fallback), passive enumeration, and the remaining independent
    /// sources.
    async fn enumerate(&mut self) {
        if self.cancelled() {
            return;
        }

        let seed = DomainSeed::Single(self.cfg.domain.clone());

        if self.cfg.chaos {
            let dataset = ChaosDataset::new(self.cfg.org_key());
            match self.run_source(&dataset, &seed).await {
                SourceStatus::Ok => self.follow_up_on_dataset().await,
                // No bundle (or a failed download) falls back to passive
                // enumeration with the same seed.
                _ => {
                    self.run_source(&Subfinder::new(), &seed).await;
                }
            }
        } else {
            self.run_source(&Subfinder::new(), &seed).await;
        }

        let sources: [&dyn Source; 4] = [&Amass, &Wayback, &CertTransparency, &Findomain];
        for source in sources {
            if self.cancelled() {
                return;
            }
            self.run_source(source, &seed).await;
        }
    }

    /// Re-seeds passive enumeration with the dataset bundle's own domain
    /// list, the way a dataset hit widens the initial search.
    async fn follow_up_on_dataset(&mut self) {
        let bundle = dedup_preserving(Workspace::read_lines(
            &self.workspace.raw_source_path("chaos"),
        ));
        if bundle.is_empty() {
            return;
        }

        let seed_file = self.workspace.root().join("chaos_seeds.txt");
        if let Err(e) = Workspace::write_lines(&seed_file, &bundle) {
            warn!("failed to write dataset seed list: {e}");
            return;
        }

        self.run_source(&Subfinder::new(), &DomainSeed::List(seed_file))
            .await;
    }

    /// Derives apex domains from the accumulator and re-runs passive
    /// enumeration over them. Idempotent: with an unchanged accumulator a
    /// second widening yields an empty delta.
    async fn widen(&mut self) -> anyhow::Result<Vec<String>> {
        let roots = widen::extract_roots(self.accumulator.all());
        Workspace::write_lines(&self.workspace.roots_path(), &roots)?;
        success!("{} root domains gathered", roots.len());

        if !roots.is_empty() {
            let seed = DomainSeed::List(self.workspace.roots_path());
            self.run_source(&Subfinder::widened(), &seed).await;
        }

        Ok(roots)
    }

    /// Runs the full pipeline and builds the final report.
    pub async fn run(mut self) -> anyhow::Result<RunReport> {
        self.enumerate().await;

        let mut roots = Vec::new();
        if !self.cancelled() {
            roots = self.widen().await?;
        }

        let resolution = if self.cancelled() {
            // Best-effort: persist the master list so the partial run
            // still leaves its durable artifact behind.
            let master = self.workspace.master_path(&self.cfg.org_key());
            Workspace::write_lines(&master, self.accumulator.all())?;
            Resolution::default()
        } else {
            resolve::resolve_stage(&self.cfg, &self.workspace, &mut self.accumulator).await?
        };

        let web = if self.cancelled() {
            WebMap::new()
        } else {
            probe::probe_stage(&self.workspace).await?
        };

        let attribution = SourceAttribution::load(&self.workspace);
        let assets = report::build_report(self.accumulator.all(), &resolution, &web, &attribution);

        Ok(RunReport {
            total_hosts: self.accumulator.len(),
            live_hosts: resolution.live.len(),
            web_urls: Workspace::count_lines(&self.workspace.site_list_path()),
            root_domains: roots,
            assets,
            interrupted: self.cancelled(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::sources::SourceReport;

    /// A canned source: reports a fixed candidate list and writes it as
    /// its raw artifact, like any real source would.
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
            let out = workspace.raw_source_path(self.id);
            Workspace::write_lines(&out, &self.candidates).unwrap();
            SourceReport::ok(self.candidates.clone())
        }
    }

    fn pipeline_for(dir: &std::path::Path) -> Pipeline {
        let cfg = Config::new("example.com".into(), None, false);
        let ws = Workspace::create(dir, &cfg.org_key()).unwrap();
        Pipeline::new(cfg, ws, Arc::new(AtomicBool::new(false)))
    }

    #[tokio::test]
    async fn sources_feed_the_accumulator_and_attribution() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_for(dir.path());
        let seed = DomainSeed::Single("example.com".into());

        let wayback = StaticSource {
            id: "wayback",
            candidates: vec!["a.example.com".into(), "b.example.com".into()],
        };
        let certificate = StaticSource {
            id: "certificate",
            candidates: vec!["B.example.com.".into(), "c.example.com".into()],
        };

        pipeline.run_source(&wayback, &seed).await;
        pipeline.run_source(&certificate, &seed).await;

        assert_eq!(
            pipeline.accumulator.all(),
            ["a.example.com", "b.example.com", "c.example.com"]
        );

        // Attribution is rebuilt from the raw artifacts: the certificate
        // source still gets credit for the already-known host.
        let attribution = SourceAttribution::load(&pipeline.workspace);
        assert_eq!(
            attribution.sources_for("b.example.com").unwrap(),
            ["wayback", "certificate"]
        );
    }

    #[tokio::test]
    async fn cancelled_run_still_reports_accumulated_hosts() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_for(dir.path());
        let seed = DomainSeed::Single("example.com".into());

        let wayback = StaticSource {
            id: "wayback",
            candidates: vec!["a.example.com".into()],
        };
        pipeline.run_source(&wayback, &seed).await;
        pipeline.cancel.store(true, Ordering::Relaxed);

        let report = pipeline.run().await.unwrap();
        assert!(report.interrupted);
        assert_eq!(report.assets.len(), 1);
        assert_eq!(report.assets[0].status, crate::report::AssetStatus::NoIp);
        assert_eq!(report.live_hosts, 0);
    }
}
