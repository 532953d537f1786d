//! Rendering of the final asset table.
//!
//! Column widths are fixed and values are clipped to fit; the table is a
//! display surface, the full data lives in the run artifacts.

use ambit_core::report::{AssetRecord, AssetStatus};
use colored::*;

use crate::terminal::print;

const DOMAIN_WIDTH: usize = 40;
const IP_WIDTH: usize = 26;
const STATUS_WIDTH: usize = 8;
const SOURCE_WIDTH: usize = 22;

/// Rows shown before the table cuts over to a "and N more" footer.
const MAX_ROWS: usize = 50;

pub fn render(assets: &[AssetRecord]) {
    if assets.is_empty() {
        return;
    }

    print::header("discovered assets");
    edge('┌', '┬', '┐');

    row(
        &pad("Domain", DOMAIN_WIDTH).bold().bright_cyan(),
        &pad("IP Address(es)", IP_WIDTH).bold().bright_cyan(),
        &pad("Status", STATUS_WIDTH).bold().bright_cyan(),
        &pad("Sources", SOURCE_WIDTH).bold().bright_cyan(),
    );
    edge('├', '┼', '┤');

    for asset in assets.iter().take(MAX_ROWS) {
        let domain = clip(&asset.host, DOMAIN_WIDTH);
        let ips = format_ips(asset);
        let sources = clip(&asset.sources, SOURCE_WIDTH);

        let ip_color = if asset.ips.is_empty() {
            Color::BrightBlack
        } else {
            Color::Cyan
        };

        row(
            &pad(&domain, DOMAIN_WIDTH).white(),
            &pad(&ips, IP_WIDTH).color(ip_color),
            &status_cell(asset.status),
            &pad(&sources, SOURCE_WIDTH).yellow(),
        );
    }

    edge('└', '┴', '┘');

    if assets.len() > MAX_ROWS {
        print::print(
            &format!("  ... and {} more hosts in the master list", assets.len() - MAX_ROWS)
                .dimmed()
                .to_string(),
        );
    }
}

fn status_cell(status: AssetStatus) -> ColoredString {
    let padded = pad(status.as_str(), STATUS_WIDTH);
    match status {
        AssetStatus::Web => padded.bright_green(),
        AssetStatus::Live => padded.cyan(),
        AssetStatus::NoIp => padded.dimmed(),
    }
}

fn format_ips(asset: &AssetRecord) -> String {
    if asset.ips.is_empty() {
        return "-".to_string();
    }

    let mut shown = asset.ips[..asset.ips.len().min(2)].join(", ");
    if asset.ips.len() > 2 {
        shown.push_str(&format!(" +{}", asset.ips.len() - 2));
    }
    clip(&shown, IP_WIDTH)
}

fn row(domain: &ColoredString, ips: &ColoredString, status: &ColoredString, sources: &ColoredString) {
    print::print(&format!("│ {} │ {} │ {} │ {} │", domain, ips, status, sources));
}

fn edge(left: char, mid: char, right: char) {
    let line = format!(
        "{left}{}{mid}{}{mid}{}{mid}{}{right}",
        "─".repeat(DOMAIN_WIDTH + 2),
        "─".repeat(IP_WIDTH + 2),
        "─".repeat(STATUS_WIDTH + 2),
        "─".repeat(SOURCE_WIDTH + 2),
    );
    print::print(&line.bright_black().to_string());
}

fn clip(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

fn pad(value: &str, width: usize) -> String {
    format!("{value:<width$}")
}
