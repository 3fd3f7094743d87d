//! Semantic version comparison for update decisions.
//!
//! Versions are compared component-by-component as integers, so
//! "2.10.0" is newer than "2.9.9". Missing components count as zero
//! ("1.0" equals "1.0.0") and malformed components count as zero as
//! well. The comparator is total and never fails: it gates every
//! install decision and must not be able to take the updater down.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A dotted version string, e.g. "2.2.2" or "1.4.0-beta.3".
///
/// The original string is preserved for display and persistence;
/// ordering is by numeric components with any pre-release suffix
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Numeric components. "1.2.x" parses as [1, 2, 0]; a pre-release
    /// suffix like "3-beta" is truncated at the dash.
    fn components(&self) -> Vec<u64> {
        self.0
            .trim()
            .trim_start_matches('v')
            .split('.')
            .map(|part| {
                part.split('-')
                    .next()
                    .and_then(|p| p.parse::<u64>().ok())
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.components();
        let b = other.components();
        let len = a.len().max(b.len());
        for i in 0..len {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            match x.cmp(&y) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

/// Compare two version strings.
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::new(a).cmp(&Version::new(b))
}

/// Returns true if `candidate` is strictly newer than `current`.
pub fn is_newer(candidate: &Version, current: &Version) -> bool {
    candidate.cmp(current) == Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ordering() {
        assert_eq!(compare("2.8.0", "2.7.7"), Ordering::Greater);
        assert_eq!(compare("2.7.7", "2.8.0"), Ordering::Less);
        assert_eq!(compare("2.2.2", "2.2.2"), Ordering::Equal);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(compare("2.10.0", "2.9.9"), Ordering::Greater);
        assert_eq!(compare("10.0.0", "9.99.99"), Ordering::Greater);
    }

    #[test]
    fn test_missing_components_are_zero() {
        assert_eq!(compare("1.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare("1", "1.0.0"), Ordering::Equal);
        assert_eq!(compare("1.0.1", "1.0"), Ordering::Greater);
    }

    #[test]
    fn test_malformed_components_are_zero() {
        assert_eq!(compare("1.2.x", "1.2.0"), Ordering::Equal);
        assert_eq!(compare("x.y.z", "0.0.0"), Ordering::Equal);
    }

    #[test]
    fn test_prerelease_suffix_ignored() {
        assert_eq!(compare("1.4.0-beta.3", "1.4.0"), Ordering::Equal);
        assert_eq!(compare("1.4.1-rc1", "1.4.0"), Ordering::Greater);
    }

    #[test]
    fn test_leading_zeros_and_v_prefix() {
        assert_eq!(compare("01.02.03", "1.2.3"), Ordering::Equal);
        assert_eq!(compare("v2.0.0", "2.0.0"), Ordering::Equal);
    }

    #[test]
    fn test_eq_consistent_with_ord() {
        assert_eq!(Version::new("1.0"), Version::new("1.0.0"));
        assert_ne!(Version::new("1.0.1"), Version::new("1.0.0"));
    }

    #[test]
    fn test_is_newer() {
        assert!(is_newer(&"2.8.0".into(), &"2.7.7".into()));
        assert!(!is_newer(&"2.7.7".into(), &"2.7.7".into()));
        assert!(!is_newer(&"2.7.6".into(), &"2.7.7".into()));
    }
}
