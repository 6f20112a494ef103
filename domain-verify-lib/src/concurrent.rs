//! Bounded concurrency scheduling for domain checks.
//!
//! The [`ConcurrentProcessor`] owns a semaphore sized to the concurrency
//! limit. Disposable domains are answered immediately and never take a
//! permit; every other domain is checked on its own task, which holds a
//! permit for the duration of its single MX query.

use crate::disposable::DisposableDomains;
use crate::resolver::{resolve_mx, MxResolver};
use crate::types::{CheckResult, DEFAULT_CONCURRENCY, PROGRESS_INTERVAL};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Counts completed DNS checks and decides when progress is reported.
///
/// `record_completion` may be called from any number of threads; each
/// returned count is observed exactly once, so no multiple of the interval
/// is reported twice or skipped.
#[derive(Debug)]
pub struct ProgressTracker {
    completed: AtomicUsize,
    total: usize,
    interval: usize,
}

impl ProgressTracker {
    pub fn new(total: usize, interval: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
            interval: interval.max(1),
        }
    }

    /// Record one finished check.
    ///
    /// Returns the new count when it is a multiple of the interval.
    pub fn record_completion(&self) -> Option<usize> {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        (done % self.interval == 0).then_some(done)
    }

    /// Number of checks recorded so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Total number of domains in the batch, disposable ones included.
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Runs domain checks with at most `max_concurrency` MX queries in flight.
#[derive(Debug, Clone)]
pub struct ConcurrentProcessor {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
    progress_interval: usize,
}

impl ConcurrentProcessor {
    /// Create a new processor. A limit of zero is treated as one.
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            progress_interval: PROGRESS_INTERVAL,
        }
    }

    /// Report progress every `interval` completed DNS checks instead of 10.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Check every domain and return one result per input, in input order.
    ///
    /// `on_progress(completed, total)` is called from this task each time
    /// the number of completed DNS checks reaches a multiple of the progress
    /// interval. `total` is the full batch size; disposable domains never
    /// advance `completed`.
    pub async fn run<F>(
        &self,
        domains: &[String],
        classifier: &DisposableDomains,
        resolver: Arc<dyn MxResolver>,
        mut on_progress: F,
    ) -> Vec<CheckResult>
    where
        F: FnMut(usize, usize),
    {
        let total = domains.len();
        let tracker = ProgressTracker::new(total, self.progress_interval);
        let mut slots: Vec<Option<CheckResult>> = vec![None; total];
        let mut pending = FuturesUnordered::new();

        for (index, domain) in domains.iter().enumerate() {
            if classifier.is_disposable(domain) {
                debug!(domain = %domain, "disposable domain, skipping DNS");
                slots[index] = Some(CheckResult::disposable(domain.as_str()));
                continue;
            }

            let semaphore = Arc::clone(&self.semaphore);
            let resolver = Arc::clone(&resolver);
            let domain = domain.clone();
            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return CheckResult::failed(domain, "worker pool closed"),
                };
                resolve_mx(resolver.as_ref(), &domain).await
            });
            pending.push(async move { (index, handle.await) });
        }

        info!(
            total,
            dns_checks = pending.len(),
            concurrency = self.max_concurrency,
            "checking domains"
        );

        while let Some((index, joined)) = pending.next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(domain = %domains[index], "DNS check task failed: {}", e);
                    CheckResult::failed(domains[index].as_str(), format!("DNS check aborted: {}", e))
                }
            };

            if let Some(done) = tracker.record_completion() {
                on_progress(done, total);
            }
            slots[index] = Some(result);
        }

        info!(completed = tracker.completed(), "DNS checks finished");

        slots
            .into_iter()
            .zip(domains)
            .map(|(slot, domain)| {
                slot.unwrap_or_else(|| CheckResult::failed(domain.as_str(), "no result produced"))
            })
            .collect()
    }
}

impl Default for ConcurrentProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}
