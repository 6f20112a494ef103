//! # Domain Verify Library
//!
//! Bulk verification of email domains: every domain is checked against a
//! disposable-domain blocklist and, if it passes, queried for MX records
//! under a bounded concurrency limit.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_verify_lib::DomainVerifier;
//!
//! #[tokio::main]
//! async fn main() {
//!     let verifier = DomainVerifier::new();
//!     let emails = ["a@mailinator.com", "b@example.com"];
//!
//!     let outcome = verifier
//!         .verify_emails(emails, |done, total| println!("Checked {} out of {} domains...", done, total))
//!         .await;
//!
//!     for row in &outcome.report.invalid {
//!         println!("{}: {}", row.domain, row.error);
//!     }
//! }
//! ```
//!
//! ## Features
//!
//! - **Disposable Blocklist**: Exact-match, injectable, extendable from files
//! - **MX Lookups**: One query per domain with a resolver-level timeout
//! - **Bounded Concurrency**: Semaphore-capped DNS queries, results in input order
//! - **CSV Boundary**: `email` column in, invalid-domain reports out
//! - **Configurable**: TOML files and `DV_*` environment variables

// Re-export main public API types and functions
// This makes them available as domain_verify_lib::TypeName
pub use aggregate::{aggregate, AggregateReport, OutcomeCounts};
pub use checker::{DomainVerifier, VerificationReport};
pub use concurrent::{ConcurrentProcessor, ProgressTracker};
pub use config::{
    load_env_config, parse_timeout, BlocklistConfig, ConfigManager, DefaultsConfig, EnvConfig,
    FileConfig,
};
pub use disposable::{DisposableDomains, BUILTIN_DISPOSABLE_DOMAINS};
pub use error::DomainVerifyError;
pub use export::{read_emails, write_invalid_domains, write_reports, write_unique_invalid_domains};
pub use pipeline::{
    run_pipeline, PipelineOptions, RunSummary, DEFAULT_INPUT, DEFAULT_INVALID_OUTPUT,
    DEFAULT_UNIQUE_OUTPUT,
};
pub use resolver::{resolve_mx, DnsResolver, LookupError, MxResolver};
pub use types::{
    CheckConfig, CheckOutcome, CheckResult, InvalidDomainRecord, MxRecord,
    UniqueInvalidDomainRecord, DEFAULT_CONCURRENCY, DISPOSABLE_ERROR, MAX_CONCURRENCY,
};
pub use utils::{extract_domain, extract_domains, normalize_domain};

// Public modules
pub mod config;
pub mod export;

// Internal modules - these are not part of the public API
mod aggregate;
mod checker;
mod concurrent;
mod disposable;
mod error;
mod pipeline;
mod resolver;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainVerifyError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        builtin_blocklist_size: DisposableDomains::builtin().len(),
    }
}

/// Information about the library build
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub builtin_blocklist_size: usize,
}
