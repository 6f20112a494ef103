//! Console output for domain-verify.
//!
//! Header, progress lines, the end-of-run summary and the dry-run listing.
//! Everything here writes to stdout; diagnostics go through `tracing`.

use console::{pad_str, style, Alignment};
use domain_verify_lib::RunSummary;
use std::path::Path;

use crate::Settings;

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a run.
pub fn print_header(settings: &Settings, blocklist_size: usize) {
    println!(
        "{} {} {}",
        style("domain-verify").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!("— Verifying {}", settings.options.input.display())).dim(),
    );

    let meta_parts = [
        format!("Concurrency: {}", settings.check.concurrency),
        format!("Timeout: {}s", settings.check.dns_timeout.as_secs()),
        format!("Blocklist: {} domains", blocklist_size),
    ];
    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Progress ─────────────────────────────────────────────────────────────────

pub fn progress_line(done: usize, total: usize) -> String {
    format!("Checked {} out of {} domains...", done, total)
}

pub fn print_progress(done: usize, total: usize) {
    println!("{}", style(progress_line(done, total)).dim());
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print outcome counts, elapsed time, output files and the total.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!("  {}", outcome_line(summary));
    println!();

    match (&summary.invalid_output, &summary.unique_output) {
        (Some(invalid), Some(unique)) => {
            println!("{}", written_line("Invalid domains", invalid));
            println!("{}", written_line("Unique invalid domains", unique));
        }
        _ => println!(
            "{}",
            style("All domains have valid MX records and are not disposable.").green()
        ),
    }

    println!("Total domains checked: {}", summary.total_domains);
}

/// One-line tally, e.g. `12 domains in 1.3s | 9 deliverable | 1 disposable | ...`.
pub fn outcome_line(summary: &RunSummary) -> String {
    let counts = &summary.counts;
    format!(
        "{} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}  {}  {}",
        style(summary.total_domains).bold(),
        if summary.total_domains == 1 { "" } else { "s" },
        summary.elapsed_seconds,
        style("|").dim(),
        style(format!("{} deliverable", counts.deliverable)).green(),
        style("|").dim(),
        style(format!("{} disposable", counts.disposable)).red(),
        style("|").dim(),
        style(format!("{} no MX", counts.no_mx_records)).yellow(),
        style("|").dim(),
        style(format!("{} lookup failed", counts.lookup_failed)).yellow(),
    )
}

fn written_line(label: &str, path: &Path) -> String {
    format!("{} written to {}", label, style(path.display()).cyan())
}

// ── Dry run ──────────────────────────────────────────────────────────────────

/// List extracted domains and whether each would be queried.
pub fn print_dry_run(domains: &[(String, bool)]) {
    for (domain, disposable) in domains {
        println!("{}", dry_run_line(domain, *disposable));
    }
}

fn dry_run_line(domain: &str, disposable: bool) -> String {
    let padded = pad_str(domain, 40, Alignment::Left, Some(".."));
    if disposable {
        format!("  {}  {}", padded, style("DISPOSABLE").red().bold())
    } else {
        format!("  {}  {}", padded, style("MX lookup").dim())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
