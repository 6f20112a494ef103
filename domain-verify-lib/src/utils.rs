//! Utility functions for turning email addresses into domains.

/// Canonical form of a domain name: trimmed and lower-cased.
///
/// Every domain passes through this before it is classified, looked up or
/// stored in a blocklist.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().to_lowercase()
}

/// Extract the domain part of an email address.
///
/// The domain is everything after the last `@`, trimmed and lower-cased.
/// Returns `None` when the address has no `@` or nothing follows it.
///
/// # Examples
///
/// ```rust
/// use domain_verify_lib::extract_domain;
///
/// assert_eq!(extract_domain("Jane@Example.COM"), Some("example.com".to_string()));
/// assert_eq!(extract_domain("\"a@b\"@example.org"), Some("example.org".to_string()));
/// assert_eq!(extract_domain("not-an-email"), None);
/// ```
pub fn extract_domain(email: &str) -> Option<String> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    let domain = normalize_domain(domain);

    if domain.is_empty() {
        return None;
    }

    Some(domain)
}

/// Extract domains from a list of email addresses, keeping input order.
///
/// Addresses without a usable domain are skipped; duplicates are kept so
/// every remaining address yields exactly one domain.
pub fn extract_domains<I, S>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    emails
        .into_iter()
        .filter_map(|email| extract_domain(email.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("a@mailinator.com"), Some("mailinator.com".to_string()));
        assert_eq!(extract_domain("  b@example.com  "), Some("example.com".to_string()));
        assert_eq!(extract_domain("C@Example.Com"), Some("example.com".to_string()));
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain(" Mailinator.COM "), "mailinator.com");
        assert_eq!(normalize_domain("example.com"), "example.com");
        assert_eq!(normalize_domain("   "), "");
    }

    #[test]
    fn test_extract_domain_rejects_malformed() {
        assert_eq!(extract_domain(""), None);
        assert_eq!(extract_domain("plainaddress"), None);
        assert_eq!(extract_domain("user@"), None);
        assert_eq!(extract_domain("user@   "), None);
    }

    #[test]
    fn test_extract_domain_multiple_at_uses_last() {
        assert_eq!(extract_domain("a@b@example.com"), Some("example.com".to_string()));
        assert_eq!(extract_domain("@@example.com"), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_domain_keeps_malformed_hosts() {
        // Host syntax is the resolver's business; it will fail the lookup.
        assert_eq!(extract_domain("x@-bad-.com"), Some("-bad-.com".to_string()));
    }

    #[test]
    fn test_extract_domains_preserves_order_and_duplicates() {
        let emails = vec![
            "a@mailinator.com",
            "broken",
            "b@example.com",
            "c@example.com",
        ];
        assert_eq!(
            extract_domains(&emails),
            vec!["mailinator.com", "example.com", "example.com"]
        );
    }

    #[test]
    fn test_extract_domains_empty() {
        let emails: Vec<String> = Vec::new();
        assert!(extract_domains(&emails).is_empty());
    }
}
