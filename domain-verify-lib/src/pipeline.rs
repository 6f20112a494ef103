//! End-to-end file run: read, extract, check, aggregate, write.

use crate::aggregate::OutcomeCounts;
use crate::checker::DomainVerifier;
use crate::error::DomainVerifyError;
use crate::export::{read_emails, write_reports};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Default input file.
pub const DEFAULT_INPUT: &str = "emails.csv";

/// Default path of the `domain,error` report.
pub const DEFAULT_INVALID_OUTPUT: &str = "invalid_domains.csv";

/// Default path of the unique-domain report.
pub const DEFAULT_UNIQUE_OUTPUT: &str = "unique_invalid_domains.csv";

/// File locations of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub invalid_output: PathBuf,
    pub unique_output: PathBuf,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            invalid_output: PathBuf::from(DEFAULT_INVALID_OUTPUT),
            unique_output: PathBuf::from(DEFAULT_UNIQUE_OUTPUT),
        }
    }
}

/// What a run did, for the console report or `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Domains extracted from the input, disposable ones included
    pub total_domains: usize,

    /// Domains that needed a DNS query
    pub dns_checked: usize,

    pub counts: OutcomeCounts,

    /// Rows written to the invalid-domains report
    pub invalid_count: usize,

    /// Rows written to the unique report
    pub unique_invalid_count: usize,

    /// Set only when the report was written
    pub invalid_output: Option<PathBuf>,
    pub unique_output: Option<PathBuf>,

    pub elapsed_seconds: f64,
}

impl RunSummary {
    /// Whether every domain was deliverable.
    pub fn all_valid(&self) -> bool {
        self.invalid_count == 0
    }
}

/// Run a whole verification over the files in `options`.
///
/// The input is read completely before any check starts; a malformed input
/// fails the run without touching the output paths. Both reports are
/// written only if at least one domain is invalid, and a failed write leaves
/// neither of them behind.
pub async fn run_pipeline<F>(
    verifier: &DomainVerifier,
    options: &PipelineOptions,
    on_progress: F,
) -> Result<RunSummary, DomainVerifyError>
where
    F: FnMut(usize, usize),
{
    let started = Instant::now();

    let emails = read_emails(&options.input)?;
    info!(input = %options.input.display(), emails = emails.len(), "input loaded");

    let outcome = verifier.verify_emails(&emails, on_progress).await;
    let counts = OutcomeCounts::from_results(&outcome.results);
    let report = outcome.report;

    let (invalid_output, unique_output) = if report.is_empty() {
        info!("no invalid domains, skipping reports");
        (None, None)
    } else {
        write_reports(
            &options.invalid_output,
            &report.invalid,
            &options.unique_output,
            &report.unique_invalid,
        )?;
        info!(
            invalid = report.invalid.len(),
            unique = report.unique_invalid.len(),
            "reports written"
        );
        (
            Some(options.invalid_output.clone()),
            Some(options.unique_output.clone()),
        )
    };

    Ok(RunSummary {
        total_domains: outcome.domains.len(),
        dns_checked: counts.dns_checked(),
        counts,
        invalid_count: report.invalid.len(),
        unique_invalid_count: report.unique_invalid.len(),
        invalid_output,
        unique_output,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    })
}
