//! Brute/passive enumeration through the `amass` tool.

use std::time::Duration;

use ambit_common::seed::DomainSeed;
use ambit_common::warn;
use async_trait::async_trait;
use tracing::debug;

use super::{Source, SourceReport, SourceStatus, status_of};
use crate::exec;
use crate::workspace::Workspace;

const TOOL: &str = "amass";
const TIMEOUT: Duration = Duration::from_secs(600);

pub struct Amass;

#[async_trait]
impl Source for Amass {
    fn id(&self) -> &'static str {
        TOOL
    }

    async fn discover(&self, seed: &DomainSeed, workspace: &Workspace) -> SourceReport {
        let Some(domain) = seed.as_single() else {
            debug!("{TOOL} only accepts single-domain seeds");
            return SourceReport::empty(SourceStatus::Unavailable);
        };

        let out = workspace.raw_source_path(self.id());
        let out_str = out.display().to_string();
        let args = ["enum", "-passive", "-d", domain, "-o", &out_str];

        let status = match exec::run_tool(TOOL, &args, TIMEOUT).await {
            Ok(output) => {
                if !output.exit_ok {
                    warn!("{TOOL} exited non-zero, keeping partial output");
                }
                SourceStatus::Ok
            }
            Err(err) => {
                warn!("{err}");
                status_of(&err)
            }
        };

        SourceReport {
            candidates: Workspace::read_lines(&out),
            status,
        }
    }
}
