//! MX record resolution.
//!
//! [`MxResolver`] is the seam between the scheduler and the network. The
//! production implementation, [`DnsResolver`], wraps a trust-dns
//! `TokioAsyncResolver` configured for a single attempt per query.
//! [`resolve_mx`] turns whatever the resolver returns into a [`CheckResult`].

use crate::types::{CheckResult, MxRecord};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::{Name, TokioAsyncResolver};

/// Why an MX lookup failed.
///
/// The `Display` text is what ends up in the `error` column of the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The domain does not exist
    #[error("Domain not found (NXDOMAIN)")]
    NotFound,

    /// No answer within the resolver timeout
    #[error("DNS query timed out")]
    Timeout,

    /// The server answered with an error code other than NXDOMAIN
    #[error("DNS server responded with {0}")]
    ServerResponse(String),

    /// Anything else reported by the resolver
    #[error("{0}")]
    Other(String),
}

/// Something that can look up the MX records of a domain.
///
/// Implementations perform exactly one query per call and never retry.
/// `Ok(vec![])` means the query succeeded but the domain has no MX records.
#[async_trait]
pub trait MxResolver: Send + Sync {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, LookupError>;
}

/// Look up `domain` and normalize the outcome into a [`CheckResult`].
pub async fn resolve_mx(resolver: &dyn MxResolver, domain: &str) -> CheckResult {
    match resolver.lookup_mx(domain).await {
        Ok(records) if !records.is_empty() => {
            debug!(domain, records = records.len(), "MX records found");
            CheckResult::deliverable(domain, records)
        }
        Ok(_) => {
            debug!(domain, "MX query returned no records");
            CheckResult::no_records(domain)
        }
        Err(e) => {
            debug!(domain, error = %e, "MX lookup failed");
            CheckResult::failed(domain, e.to_string())
        }
    }
}

/// DNS-backed [`MxResolver`].
#[derive(Clone)]
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Create a resolver from the system configuration (`/etc/resolv.conf`
    /// or the platform equivalent), falling back to the trust-dns defaults
    /// when that cannot be read.
    pub fn new(timeout: Duration) -> Self {
        let (config, opts) = match trust_dns_resolver::system_conf::read_system_conf() {
            Ok(system) => system,
            Err(e) => {
                warn!("Could not read system DNS configuration ({}), using defaults", e);
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        Self::with_config(config, opts, timeout)
    }

    /// Create a resolver from an explicit trust-dns configuration.
    ///
    /// The timeout is applied per query, the attempt count is forced to one
    /// and only one name server is asked at a time, so a failure is final for
    /// that domain. Every query is sent as a fully qualified name, so search
    /// domains in `config` are never applied.
    pub fn with_config(config: ResolverConfig, mut opts: ResolverOpts, timeout: Duration) -> Self {
        opts.timeout = timeout;
        opts.attempts = 1;
        opts.num_concurrent_reqs = 1;

        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl MxResolver for DnsResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, LookupError> {
        let name = absolute_name(domain)?;
        match self.inner.mx_lookup(name).await {
            Ok(lookup) => {
                let mut records: Vec<MxRecord> = lookup
                    .iter()
                    .map(|mx| MxRecord::new(mx.preference(), mx.exchange().to_utf8()))
                    .collect();
                records.sort_by_key(|record| record.priority);
                Ok(records)
            }
            Err(e) => classify_resolve_error(&e),
        }
    }
}

/// Parse `domain` as a fully qualified name.
///
/// trust-dns expands relative names through the `search` and `domain`
/// entries of resolv.conf and reports the last candidate tried, so a relative
/// query can hit a wildcard under a search domain. An FQDN is queried as is.
fn absolute_name(domain: &str) -> Result<Name, LookupError> {
    let mut name = Name::from_utf8(domain)
        .map_err(|e| LookupError::Other(format!("Invalid domain name: {}", e)))?;
    name.set_fqdn(true);
    Ok(name)
}

/// Map a trust-dns error onto the lookup outcome.
///
/// An empty NOERROR answer is reported by trust-dns as an error, but it is
/// a successful query with zero records.
fn classify_resolve_error(err: &ResolveError) -> Result<Vec<MxRecord>, LookupError> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            classify_response_code(*response_code)
        }
        ResolveErrorKind::Timeout => Err(LookupError::Timeout),
        _ => {
            let message = err.to_string();
            if message.contains("timed out") || message.contains("timeout") {
                Err(LookupError::Timeout)
            } else {
                Err(LookupError::Other(message))
            }
        }
    }
}

fn classify_response_code(code: ResponseCode) -> Result<Vec<MxRecord>, LookupError> {
    match code {
        ResponseCode::NoError => Ok(Vec::new()),
        ResponseCode::NXDomain => Err(LookupError::NotFound),
        other => Err(LookupError::ServerResponse(other.to_string())),
    }
}
