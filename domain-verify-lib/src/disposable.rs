//! Disposable email domain classification.
//!
//! The blocklist is plain data: a set of exact domain names handed to
//! [`DisposableDomains`] when it is built. The built-in list can be replaced
//! or extended from files and configuration.

use crate::error::DomainVerifyError;
use crate::utils::normalize_domain;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Domains shipped with the tool. Duplicates collapse once loaded into a set.
pub const BUILTIN_DISPOSABLE_DOMAINS: &[&str] = &[
    "mailinator.com",
    "tempmail.com",
    "10minutemail.com",
    "yopmail.com",
    "guerrillamail.com",
    "trashmail.com",
    "fakeinbox.com",
    "maildrop.cc",
    "dispostable.com",
    "spambog.com",
    "sharklasers.com",
    "getairmail.com",
    "throwawaymail.com",
    "temporarymail.com",
    "temp-mail.org",
    "emailsensei.com",
    "burnermail.io",
    "33mail.com",
    "getnada.com",
    // Legitimate service, listed because it is often used for anonymity.
    "protonmail.com",
    "luxusmail.org",
    "mohmal.com",
    "easytrashmail.com",
    "tmail.com",
    "mailnesia.com",
    "spamgourmet.com",
    "disposablemail.com",
    "mailcatch.com",
    "spam4.me",
    "tempm.com",
    "spamdecoy.net",
    "spaml.de",
    "boun.cr",
    "guerrillamailblock.com",
    "pokemail.net",
    "disposableinbox.com",
    "getonemail.net",
    "dropmail.me",
    "mailbox.org",
    "anonbox.net",
    "amail.club",
    "mytrashmail.com",
    "trashmail.de",
    "sogetthis.com",
    "fake-mail.net",
    "tempemail.co",
    "bigstring.com",
    "spamobox.com",
    "throwawayemail.com",
    "mailtemp.net",
    "disposableaddress.com",
    "emailondeck.com",
    "one-time.email",
    "emlpro.com",
    "getairmail.com",
    "24hourmail.com",
    "chacuo.net",
    "guerrillamail.biz",
    "zoemail.com",
    "disposableemail.us",
    "temp-mail.io",
    "tempail.com",
    "tempr.email",
    "inboxkitten.com",
    "minutemailbox.com",
    "temp-mails.com",
    "mail-fake.com",
    "fakeemailgenerator.com",
    "mail-temp.com",
    "tempomail.fr",
    "tmail.ws",
    "meltmail.com",
    "tmail.rocks",
    "inboxbear.com",
    "inboxclean.com",
    // Firefox Relay hands out anonymous forwarding addresses.
    "relay.firefox.com",
];

/// Immutable set of known disposable domains.
///
/// Membership is an exact string match: `notmailinator.com` and
/// `sub.mailinator.com` are not disposable just because `mailinator.com` is.
#[derive(Debug, Clone, Default)]
pub struct DisposableDomains {
    domains: HashSet<String>,
}

impl DisposableDomains {
    /// Build a classifier from any list of domain names.
    ///
    /// Entries are normalized with [`normalize_domain`]; blank entries are
    /// dropped.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|domain| normalize_domain(domain.as_ref()))
                .filter(|domain| !domain.is_empty())
                .collect(),
        }
    }

    /// Classifier backed by [`BUILTIN_DISPOSABLE_DOMAINS`].
    pub fn builtin() -> Self {
        Self::new(BUILTIN_DISPOSABLE_DOMAINS.iter().copied())
    }

    /// Load a blocklist file with one domain per line.
    ///
    /// Empty lines and `#` comments (full-line or trailing) are skipped.
    /// Entries are trimmed and lower-cased.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DomainVerifyError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DomainVerifyError::file_error(
                path.to_string_lossy(),
                format!("Failed to read blocklist: {}", e),
            )
        })?;
        Ok(Self::new(parse_blocklist(&content)))
    }

    /// Return a new classifier containing the domains of both sets.
    pub fn merged_with(mut self, other: DisposableDomains) -> Self {
        self.domains.extend(other.domains);
        self
    }

    /// Whether `domain` is a known disposable domain. Case and surrounding
    /// whitespace are ignored; everything else must match exactly.
    pub fn is_disposable(&self, domain: &str) -> bool {
        self.domains.contains(&normalize_domain(domain))
    }

    /// Number of distinct domains in the blocklist.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

fn parse_blocklist(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect()
}
