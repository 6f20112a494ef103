//! Core data types for domain verification.
//!
//! This module defines the per-domain check result, the rows written to the
//! two output files, and the configuration knobs of a verification run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Error text attached to domains rejected by the disposable blocklist.
pub const DISPOSABLE_ERROR: &str = "Disposable email domain";

/// Default number of simultaneous in-flight DNS queries.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Upper bound accepted for the concurrency limit.
pub const MAX_CONCURRENCY: usize = 100;

/// Progress is reported every time this many DNS checks have completed.
pub const PROGRESS_INTERVAL: usize = 10;

/// A mail exchange record returned by an MX lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    /// Preference value; lower is preferred
    pub priority: u16,

    /// Host name of the mail exchanger
    pub exchange: String,
}

impl MxRecord {
    pub fn new<E: Into<String>>(priority: u16, exchange: E) -> Self {
        Self {
            priority,
            exchange: exchange.into(),
        }
    }
}

/// Result of checking one domain.
///
/// Either `deliverable` is true and `records` is non-empty, or `deliverable`
/// is false. `error` is only set for disposable domains and failed lookups;
/// a lookup that succeeded with zero records carries no error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The domain that was checked (e.g., "example.com")
    pub domain: String,

    /// Whether the domain has MX records and is not disposable
    pub deliverable: bool,

    /// MX records found for the domain, possibly empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<MxRecord>,

    /// Why the domain is not deliverable, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResult {
    /// A domain with at least one MX record.
    ///
    /// An empty `records` list is downgraded to [`CheckResult::no_records`].
    pub fn deliverable<D: Into<String>>(domain: D, records: Vec<MxRecord>) -> Self {
        if records.is_empty() {
            return Self::no_records(domain);
        }
        Self {
            domain: domain.into(),
            deliverable: true,
            records,
            error: None,
        }
    }

    /// A domain found in the disposable blocklist.
    pub fn disposable<D: Into<String>>(domain: D) -> Self {
        Self::failed(domain, DISPOSABLE_ERROR)
    }

    /// A domain whose MX query succeeded but returned nothing.
    pub fn no_records<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
            deliverable: false,
            records: Vec::new(),
            error: None,
        }
    }

    /// A domain that could not be verified.
    pub fn failed<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self {
            domain: domain.into(),
            deliverable: false,
            records: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Classify this result for summaries.
    pub fn outcome(&self) -> CheckOutcome {
        match (&self.error, self.deliverable) {
            (_, true) => CheckOutcome::Deliverable,
            (Some(msg), false) if msg == DISPOSABLE_ERROR => CheckOutcome::Disposable,
            (Some(_), false) => CheckOutcome::LookupFailed,
            (None, false) => CheckOutcome::NoMxRecords,
        }
    }
}

/// How a domain check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// At least one MX record and not disposable
    Deliverable,

    /// Rejected by the blocklist without a DNS query
    Disposable,

    /// The MX query succeeded with zero records
    NoMxRecords,

    /// The MX query failed (NXDOMAIN, timeout, network error, ...)
    LookupFailed,
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckOutcome::Deliverable => write!(f, "deliverable"),
            CheckOutcome::Disposable => write!(f, "disposable"),
            CheckOutcome::NoMxRecords => write!(f, "no MX records"),
            CheckOutcome::LookupFailed => write!(f, "lookup failed"),
        }
    }
}

/// A row of the invalid-domains output file.
///
/// `error` is an empty string for domains without MX records so the column
/// is present on every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidDomainRecord {
    pub domain: String,
    pub error: String,
}

/// A row of the unique-invalid-domains output file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueInvalidDomainRecord {
    pub domain: String,
}

/// Configuration options for a verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Maximum number of simultaneous in-flight DNS queries
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Timeout handed to the DNS resolver for each query.
    /// The scheduler itself never times out a check.
    /// Default: 5 seconds
    #[serde(skip)]
    pub dns_timeout: Duration,

    /// Number of completed DNS checks between progress notifications
    /// Default: 10
    pub progress_interval: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            dns_timeout: Duration::from_secs(5),
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl CheckConfig {
    /// Set the concurrency limit.
    ///
    /// Automatically clamps to 1-100 to prevent resource exhaustion.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    /// Set the resolver timeout.
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }
}
