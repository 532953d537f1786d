//! # Run Workspace
//!
//! Every run writes its artifacts into an organization-scoped directory:
//! one raw output file per source (kept for attribution), plus the merged
//! master list, the root-domain list, the live-host list, and the stage
//! outputs of the resolver and the web probe.
//!
//! All artifacts are plain line-oriented or delimited text. Failing to
//! create the directory tree is the only fatal filesystem condition in the
//! pipeline; everything later degrades gracefully.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Filesystem layout of a single run.
#[derive(Clone, Debug)]
pub struct Workspace {
    root: PathBuf,
    raw: PathBuf,
}

impl Workspace {
    /// Creates (recreating if present) `<base>/<org_key>/` and its `raw/`
    /// subdirectory. This is the one place where an I/O failure aborts the
    /// run.
    pub fn create(base: impl AsRef<Path>, org_key: &str) -> anyhow::Result<Self> {
        let root = base.as_ref().join(org_key);
        if root.exists() {
            fs::remove_dir_all(&root)
                .with_context(|| format!("failed to clear previous run at {}", root.display()))?;
        }

        let raw = root.join("raw");
        fs::create_dir_all(&raw)
            .with_context(|| format!("failed to create output directory {}", raw.display()))?;

        Ok(Self { root, raw })
    }

    /// Opens an existing run directory without clearing it. Used by tests
    /// and by report generation over previously produced artifacts.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let raw = root.join("raw");
        Self { root, raw }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Raw, pre-filter output of one source, e.g. `raw/wayback.txt`.
    pub fn raw_source_path(&self, source: &str) -> PathBuf {
        self.raw.join(format!("{source}.txt"))
    }

    /// The merged master list of every canonical host discovered.
    pub fn master_path(&self, org_key: &str) -> PathBuf {
        self.root.join(format!("{org_key}.master"))
    }

    pub fn roots_path(&self) -> PathBuf {
        self.root.join("rootdomains.txt")
    }

    pub fn live_path(&self) -> PathBuf {
        self.root.join("live.txt")
    }

    pub fn resolved_path(&self) -> PathBuf {
        self.root.join("resolved.jsonl")
    }

    pub fn web_csv_path(&self) -> PathBuf {
        self.root.join("web_intelligence.csv")
    }

    pub fn site_list_path(&self) -> PathBuf {
        self.root.join("site_list.txt")
    }

    /// Writes lines to a file, one per line, replacing any previous content.
    pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> anyhow::Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        for line in lines {
            writeln!(file, "{}", line.as_ref())?;
        }
        Ok(())
    }

    /// Reads the non-empty, trimmed lines of a file. A missing file reads
    /// as empty, matching the degraded-stage contract.
    pub fn read_lines(path: &Path) -> Vec<String> {
        let Ok(file) = File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Line count of an artifact, 0 when absent. Drives the summary block.
    pub fn count_lines(path: &Path) -> usize {
        Self::read_lines(path).len()
    }
}
