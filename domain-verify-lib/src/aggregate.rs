//! Result aggregation: invalid rows, unique invalid domains and outcome counts.

use crate::types::{CheckOutcome, CheckResult, InvalidDomainRecord, UniqueInvalidDomainRecord};
use serde::Serialize;
use std::collections::HashSet;

/// The two output record sets of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    /// Every non-deliverable result, in input order
    pub invalid: Vec<InvalidDomainRecord>,

    /// Each distinct domain of `invalid` once, in first-seen order
    pub unique_invalid: Vec<UniqueInvalidDomainRecord>,
}

impl AggregateReport {
    /// True when every domain was deliverable (or there were none).
    pub fn is_empty(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Partition results into the invalid rows and their distinct domains.
///
/// Results without an error message (zero MX records) produce a row with
/// an empty `error`.
pub fn aggregate(results: &[CheckResult]) -> AggregateReport {
    let invalid: Vec<InvalidDomainRecord> = results
        .iter()
        .filter(|result| !result.deliverable)
        .map(|result| InvalidDomainRecord {
            domain: result.domain.clone(),
            error: result.error.clone().unwrap_or_default(),
        })
        .collect();

    let unique_invalid = {
        let mut seen = HashSet::new();
        invalid
            .iter()
            .filter(|record| seen.insert(record.domain.as_str()))
            .map(|record| UniqueInvalidDomainRecord {
                domain: record.domain.clone(),
            })
            .collect()
    };

    AggregateReport {
        invalid,
        unique_invalid,
    }
}

/// Per-outcome tallies of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub deliverable: usize,
    pub disposable: usize,
    pub no_mx_records: usize,
    pub lookup_failed: usize,
}

impl OutcomeCounts {
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            match result.outcome() {
                CheckOutcome::Deliverable => counts.deliverable += 1,
                CheckOutcome::Disposable => counts.disposable += 1,
                CheckOutcome::NoMxRecords => counts.no_mx_records += 1,
                CheckOutcome::LookupFailed => counts.lookup_failed += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.deliverable + self.disposable + self.no_mx_records + self.lookup_failed
    }

    /// Domains that went through a DNS query.
    pub fn dns_checked(&self) -> usize {
        self.total() - self.disposable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MxRecord;

    fn sample() -> Vec<CheckResult> {
        vec![
            CheckResult::disposable("mailinator.com"),
            CheckResult::deliverable("example.com", vec![MxRecord::new(10, "mx.example.com")]),
            CheckResult::failed("gone.test", "Domain not found (NXDOMAIN)"),
            CheckResult::no_records("nomail.example"),
            CheckResult::disposable("mailinator.com"),
            CheckResult::failed("gone.test", "Domain not found (NXDOMAIN)"),
        ]
    }

    #[test]
    fn test_invalid_rows_keep_input_order() {
        let report = aggregate(&sample());
        let domains: Vec<&str> = report.invalid.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(
            domains,
            vec!["mailinator.com", "gone.test", "nomail.example", "mailinator.com", "gone.test"]
        );
        assert_eq!(report.invalid[0].error, "Disposable email domain");
        assert_eq!(report.invalid[2].error, "");
    }

    #[test]
    fn test_unique_invalid_matches_invalid_domains() {
        let report = aggregate(&sample());
        let unique: Vec<&str> = report
            .unique_invalid
            .iter()
            .map(|r| r.domain.as_str())
            .collect();
        assert_eq!(unique, vec!["mailinator.com", "gone.test", "nomail.example"]);

        let from_invalid: HashSet<&str> = report.invalid.iter().map(|r| r.domain.as_str()).collect();
        let from_unique: HashSet<&str> = unique.iter().copied().collect();
        assert_eq!(from_invalid, from_unique);
        assert_eq!(from_unique.len(), unique.len());
    }

    #[test]
    fn test_empty_results() {
        let report = aggregate(&[]);
        assert!(report.is_empty());
        assert!(report.invalid.is_empty());
        assert!(report.unique_invalid.is_empty());
    }

    #[test]
    fn test_all_deliverable() {
        let results = vec![CheckResult::deliverable(
            "example.com",
            vec![MxRecord::new(1, "mx.example.com")],
        )];
        assert!(aggregate(&results).is_empty());
    }

    #[test]
    fn test_outcome_counts() {
        let counts = OutcomeCounts::from_results(&sample());
        assert_eq!(counts.deliverable, 1);
        assert_eq!(counts.disposable, 2);
        assert_eq!(counts.no_mx_records, 1);
        assert_eq!(counts.lookup_failed, 2);
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.dns_checked(), 4);
    }
}
