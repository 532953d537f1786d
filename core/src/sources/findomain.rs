//! Passive enumeration through the `findomain` tool.
//!
//! Unlike the other tools, findomain prints its results to stdout, so the
//! raw artifact is written from the captured output.

use std::time::Duration;

use ambit_common::seed::DomainSeed;
use ambit_common::warn;
use async_trait::async_trait;
use tracing::debug;

use super::{Source, SourceReport, SourceStatus, status_of};
use crate::exec;
use crate::workspace::Workspace;

const TOOL: &str = "findomain";
const TIMEOUT: Duration = Duration::from_secs(300);

pub struct Findomain;

#[async_trait]
impl Source for Findomain {
    fn id(&self) -> &'static str {
        TOOL
    }

    async fn discover(&self, seed: &DomainSeed, workspace: &Workspace) -> SourceReport {
        let Some(domain) = seed.as_single() else {
            debug!("{TOOL} only accepts single-domain seeds");
            return SourceReport::empty(SourceStatus::Unavailable);
        };

        let out = workspace.raw_source_path(self.id());

        match exec::run_tool(TOOL, &["-t", domain, "-q"], TIMEOUT).await {
            Ok(output) => {
                let candidates: Vec<String> = output
                    .stdout
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();

                if let Err(e) = Workspace::write_lines(&out, &candidates) {
                    warn!("failed to persist {TOOL} output: {e}");
                }

                SourceReport::ok(candidates)
            }
            Err(err) => {
                warn!("{err}");
                // Leave an empty artifact so attribution lookups stay uniform.
                let _ = Workspace::write_lines::<String>(&out, &[]);
                SourceReport::empty(status_of(&err))
            }
        }
    }
}
