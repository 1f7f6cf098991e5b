//! Breach checking against a k-anonymity range API.
//!
//! The password itself never leaves the process: it is SHA-1 hashed and only
//! the first five hex characters of the digest are handed to the lookup
//! service, which answers with every known-breached digest suffix in that
//! range. Matching the remaining 35 characters happens locally.
//!
//! The network transport is an external collaborator behind [`RangeLookup`];
//! this module owns the protocol logic only.

use ring::digest;
use thiserror::Error;

/// Length of the hash prefix sent to the range service.
pub const PREFIX_LEN: usize = 5;

/// Errors from a breach check.
#[derive(Error, Debug)]
pub enum BreachError {
    /// The range lookup transport failed (network error, bad status).
    #[error("range lookup failed: {0}")]
    Lookup(String),
}

/// Transport boundary: fetch the breached-suffix list for a hash prefix.
///
/// Implementations return the raw range response body - one
/// `SUFFIX:COUNT` pair per line.
pub trait RangeLookup {
    fn range(&self, prefix: &str) -> Result<String, BreachError>;
}

/// Uppercase-hex SHA-1 of a password, as used by the range protocol.
///
/// SHA-1 is broken for signatures but is what the k-anonymity protocol
/// speaks; it never protects anything here.
pub fn hash_password(password: &str) -> String {
    let digest = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, password.as_bytes());
    digest
        .as_ref()
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect()
}

/// Check a password against the breach corpus.
///
/// Returns `Some(count)` with the number of breach occurrences when the
/// password's hash suffix appears in the range response, `None` otherwise.
/// Blank passwords are never sent anywhere and report `None`.
pub fn check_password(
    lookup: &dyn RangeLookup,
    password: &str,
) -> Result<Option<u64>, BreachError> {
    if password.trim().is_empty() {
        return Ok(None);
    }

    let hash = hash_password(password);
    let (prefix, suffix) = hash.split_at(PREFIX_LEN);
    let body = lookup.range(prefix)?;

    Ok(find_suffix(&body, suffix))
}

/// Scan a range response for a digest suffix.
fn find_suffix(body: &str, suffix: &str) -> Option<u64> {
    body.lines().find_map(|line| {
        let (candidate, count) = line.trim().split_once(':')?;
        if candidate.eq_ignore_ascii_case(suffix) {
            Some(count.trim().parse().unwrap_or(1))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeLookup {
        body: &'static str,
    }

    impl RangeLookup for FakeLookup {
        fn range(&self, prefix: &str) -> Result<String, BreachError> {
            assert_eq!(prefix.len(), PREFIX_LEN);
            Ok(self.body.to_owned())
        }
    }

    struct FailingLookup;

    impl RangeLookup for FailingLookup {
        fn range(&self, _prefix: &str) -> Result<String, BreachError> {
            Err(BreachError::Lookup("connection refused".into()))
        }
    }

    #[test]
    fn test_hash_password_known_value() {
        // SHA-1("password"), the canonical range-API example.
        assert_eq!(
            hash_password("password"),
            "5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8"
        );
    }

    #[test]
    fn test_pwned_password_found_with_count() {
        // Suffix of SHA-1("password") after the 5-char prefix.
        let lookup = FakeLookup {
            body: "0018A45C4D1DEF81644B54AB7F969B88D65:1\n\
                   1E4C9B93F3F0682250B6CF8331B7EE68FD8:3730471\n\
                   011053FD0102E94D6AE2F8B83D76FAF94F6:1",
        };
        let count = check_password(&lookup, "password").unwrap();
        assert_eq!(count, Some(3_730_471));
    }

    #[test]
    fn test_clean_password_not_found() {
        let lookup = FakeLookup {
            body: "0018A45C4D1DEF81644B54AB7F969B88D65:1",
        };
        assert_eq!(check_password(&lookup, "password").unwrap(), None);
    }

    #[test]
    fn test_suffix_match_is_case_insensitive() {
        let lookup = FakeLookup {
            body: "1e4c9b93f3f0682250b6cf8331b7ee68fd8:42",
        };
        assert_eq!(check_password(&lookup, "password").unwrap(), Some(42));
    }

    #[test]
    fn test_blank_password_short_circuits() {
        // FailingLookup would error if contacted.
        assert_eq!(check_password(&FailingLookup, "").unwrap(), None);
        assert_eq!(check_password(&FailingLookup, "   ").unwrap(), None);
    }

    #[test]
    fn test_lookup_failure_propagates() {
        assert!(matches!(
            check_password(&FailingLookup, "password"),
            Err(BreachError::Lookup(_))
        ));
    }
}
