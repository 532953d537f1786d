//! Passive enumeration through the `subfinder` tool.
//!
//! Used twice per run: once against the initial seed (directly, or with
//! the dataset bundle's domain list) and once more during root-domain
//! widening. The two passes write separate raw artifacts but share one
//! attribution label.

use std::time::Duration;

use ambit_common::seed::DomainSeed;
use ambit_common::warn;
use async_trait::async_trait;

use super::{Source, SourceReport, status_of};
use crate::exec;
use crate::workspace::Workspace;

const TOOL: &str = "subfinder";
const TIMEOUT: Duration = Duration::from_secs(600);

pub struct Subfinder {
    artifact: &'static str,
}

impl Subfinder {
    /// The initial passive-enumeration pass.
    pub fn new() -> Self {
        Self {
            artifact: "subfinder",
        }
    }

    /// The widening pass, kept in a separate artifact so attribution can
    /// distinguish the files while sharing the label.
    pub fn widened() -> Self {
        Self {
            artifact: "subfinder2",
        }
    }
}

impl Default for Subfinder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Source for Subfinder {
    fn id(&self) -> &'static str {
        self.artifact
    }

    fn label(&self) -> &'static str {
        TOOL
    }

    async fn discover(&self, seed: &DomainSeed, workspace: &Workspace) -> SourceReport {
        let out = workspace.raw_source_path(self.artifact);
        let out_str = out.display().to_string();

        let args: Vec<String> = match seed {
            DomainSeed::Single(domain) => {
                vec!["-d".into(), domain.clone(), "-silent".into(), "-o".into(), out_str]
            }
            DomainSeed::List(path) => vec![
                "-dL".into(),
                path.display().to_string(),
                "-silent".into(),
                "-o".into(),
                out_str,
            ],
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let status = match exec::run_tool(TOOL, &args, TIMEOUT).await {
            Ok(output) => {
                if !output.exit_ok {
                    warn!("{TOOL} exited non-zero, keeping partial output");
                }
                super::SourceStatus::Ok
            }
            Err(err) => {
                warn!("{err}");
                status_of(&err)
            }
        };

        // The tool writes its own output file; whatever exists (possibly a
        // partial file after a timeout) is the contribution.
        SourceReport {
            candidates: Workspace::read_lines(&out),
            status,
        }
    }
}
