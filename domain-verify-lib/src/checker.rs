//! Main domain verifier implementation.
//!
//! This module provides the primary `DomainVerifier` struct that ties the
//! disposable classifier, the MX resolver and the bounded scheduler together.

use crate::aggregate::{aggregate, AggregateReport};
use crate::concurrent::ConcurrentProcessor;
use crate::disposable::DisposableDomains;
use crate::resolver::{resolve_mx, DnsResolver, MxResolver};
use crate::types::{CheckConfig, CheckResult};
use crate::utils::{extract_domains, normalize_domain};
use std::sync::Arc;

/// Main verifier that coordinates domain checks.
///
/// # Example
///
/// ```rust,no_run
/// use domain_verify_lib::DomainVerifier;
///
/// #[tokio::main]
/// async fn main() {
///     let verifier = DomainVerifier::new();
///     let result = verifier.check_domain("example.com").await;
///     println!("{}: deliverable={}", result.domain, result.deliverable);
/// }
/// ```
#[derive(Clone)]
pub struct DomainVerifier {
    /// Configuration settings for this verifier instance
    config: CheckConfig,
    /// Disposable blocklist consulted before any DNS query
    classifier: Arc<DisposableDomains>,
    /// MX lookups for non-disposable domains
    resolver: Arc<dyn MxResolver>,
    /// Bounded worker pool shared by all batches of this verifier
    processor: ConcurrentProcessor,
}

/// Everything produced by verifying a list of email addresses.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    /// Domains extracted from the addresses, in input order
    pub domains: Vec<String>,
    /// One result per entry of `domains`
    pub results: Vec<CheckResult>,
    /// Invalid rows and unique invalid domains
    pub report: AggregateReport,
}

impl DomainVerifier {
    /// Create a new verifier with default configuration, the built-in
    /// blocklist and the system DNS resolver.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Create a verifier with custom configuration, the built-in blocklist
    /// and the system DNS resolver.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use domain_verify_lib::{CheckConfig, DomainVerifier};
    /// use std::time::Duration;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let config = CheckConfig::default()
    ///     .with_concurrency(20)
    ///     .with_dns_timeout(Duration::from_secs(3));
    ///
    /// let verifier = DomainVerifier::with_config(config);
    /// # }
    /// ```
    pub fn with_config(config: CheckConfig) -> Self {
        let resolver = Arc::new(DnsResolver::new(config.dns_timeout));
        Self::with_parts(config, DisposableDomains::builtin(), resolver)
    }

    /// Create a verifier from explicit parts, e.g. a custom blocklist or a
    /// scripted resolver.
    pub fn with_parts(
        config: CheckConfig,
        classifier: DisposableDomains,
        resolver: Arc<dyn MxResolver>,
    ) -> Self {
        let processor = ConcurrentProcessor::new(config.concurrency)
            .with_progress_interval(config.progress_interval);
        Self {
            config,
            classifier: Arc::new(classifier),
            resolver,
            processor,
        }
    }

    /// Replace the blocklist.
    pub fn with_blocklist(mut self, classifier: DisposableDomains) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Check a single domain: blocklist first, then one MX query.
    ///
    /// The domain is normalized first, and the result carries the
    /// normalized name.
    pub async fn check_domain(&self, domain: &str) -> CheckResult {
        let domain = normalize_domain(domain);
        if self.classifier.is_disposable(&domain) {
            return CheckResult::disposable(domain);
        }
        resolve_mx(self.resolver.as_ref(), &domain).await
    }

    /// Check many domains under the concurrency limit.
    ///
    /// Domains are normalized like [`check_domain`](Self::check_domain).
    /// Returns one result per domain in input order. See
    /// [`ConcurrentProcessor::run`] for the progress callback contract.
    pub async fn check_domains<F>(&self, domains: &[String], on_progress: F) -> Vec<CheckResult>
    where
        F: FnMut(usize, usize),
    {
        let domains: Vec<String> = domains.iter().map(|d| normalize_domain(d)).collect();
        self.processor
            .run(
                &domains,
                &self.classifier,
                Arc::clone(&self.resolver),
                on_progress,
            )
            .await
    }

    /// Extract domains from email addresses, check them and aggregate.
    pub async fn verify_emails<I, S, F>(&self, emails: I, on_progress: F) -> VerificationReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(usize, usize),
    {
        let domains = extract_domains(emails);
        let results = self.check_domains(&domains, on_progress).await;
        let report = aggregate(&results);

        VerificationReport {
            domains,
            results,
            report,
        }
    }

    /// Get the configuration of this verifier.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Get the blocklist of this verifier.
    pub fn classifier(&self) -> &DisposableDomains {
        &self.classifier
    }
}

impl Default for DomainVerifier {
    fn default() -> Self {
        Self::new()
    }
}
