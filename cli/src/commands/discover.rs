use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use ambit_common::config::Config;
use ambit_common::{info, success, warn};
use ambit_core::pipeline::{Pipeline, RunReport};
use ambit_core::workspace::Workspace;
use colored::*;

use crate::terminal::{print, spinner, table};

/// Base directory for run artifacts, one subdirectory per organisation.
pub const OUTPUT_BASE: &str = "output";

/// Exit status for an interrupted, partially-reported run.
const INTERRUPTED_EXIT: i32 = 130;

pub async fn discover(domain: String, org: Option<String>, chaos: bool) -> anyhow::Result<()> {
    let cfg = Config::new(domain, org, chaos);

    print::header("attack surface discovery");
    print::aligned_line("Root domain", &cfg.domain);
    print::aligned_line("Organisation", &cfg.org);

    // The one fatal filesystem condition: no workspace, no run.
    let workspace = Workspace::create(OUTPUT_BASE, &cfg.org_key())?;

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping at the next stage boundary");
            cancel_flag.store(true, Ordering::Relaxed);
        }
    });

    spinner::get_spinner().set_message("Gathering candidate hosts...".to_string());

    let start_time = Instant::now();
    let report = Pipeline::new(cfg, workspace, cancel).run().await?;

    spinner::get_spinner().finish_and_clear();
    render(&report, start_time.elapsed());

    if report.interrupted {
        warn!("interrupted, reported partial results");
        std::process::exit(INTERRUPTED_EXIT);
    }

    success!("enumeration completed");
    Ok(())
}

fn render(report: &RunReport, total_time: Duration) {
    table::render(&report.assets);

    print::header("summary");
    print::aligned_line("Root domains", &report.root_domains.len().to_string());
    print::aligned_line("Unique hosts", &report.total_hosts.to_string());
    print::aligned_line("Resolved hosts", &report.live_hosts.to_string());
    print::aligned_line("Web applications", &report.web_urls.to_string());

    if !report.root_domains.is_empty() {
        let shown = report.root_domains[..report.root_domains.len().min(5)].join(", ");
        info!("roots: {shown}");
    }

    let hosts = format!("{} hosts", report.total_hosts).bold().green();
    let elapsed = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    print::fat_separator();
    print::print(&format!("Discovery complete: {hosts} correlated in {elapsed}"));
}
