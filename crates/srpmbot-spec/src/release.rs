//! Release tag parsing.

use std::fmt;

use crate::{SpecError, SpecResult};

/// The distribution macro appended to every generated release.
pub const DIST_MACRO: &str = "%{?dist}";

/// Start of the distribution macro in a release value.
const DIST_PREFIX: &str = "%{?dist";

/// A parsed `Release:` value such as `3.20240101git1a2b3c4d%{?dist}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseState {
    /// Dot-separated components before any snapshot marker (`["3"]`).
    numbers: Vec<String>,
    /// A previous snapshot component carrying the backend tag.
    snapshot: Option<String>,
    /// The distribution macro suffix, empty when absent.
    dist: String,
}

impl ReleaseState {
    /// Parses a release value, recognising snapshots produced by `backend_tag`.
    #[must_use]
    pub fn parse(value: &str, backend_tag: &str) -> Self {
        let value = value.trim();
        let (base, dist) = value
            .find(DIST_PREFIX)
            .map_or((value, ""), |pos| value.split_at(pos));

        let mut numbers: Vec<String> = base.split('.').map(String::from).collect();
        let snapshot = if !backend_tag.is_empty()
            && numbers.last().is_some_and(|last| last.contains(backend_tag))
        {
            numbers.pop()
        } else {
            None
        };

        Self {
            numbers,
            snapshot,
            dist: dist.to_string(),
        }
    }

    /// Returns the previous snapshot component, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Returns the distribution macro suffix.
    #[must_use]
    pub fn dist(&self) -> &str {
        &self.dist
    }

    /// Returns the release number with its trailing numeric component
    /// incremented. A non-numeric trailing component is left as is.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is left once the snapshot is dropped, or
    /// if the trailing number cannot be incremented within `u64`.
    pub fn bumped(&self) -> SpecResult<String> {
        let mut numbers = self.numbers.clone();
        let Some(last) = numbers.last_mut().filter(|last| !last.is_empty()) else {
            return Err(SpecError::InvalidRelease(self.to_string()));
        };

        if last.chars().all(|c| c.is_ascii_digit()) {
            let next = last
                .parse::<u64>()
                .ok()
                .and_then(|n| n.checked_add(1))
                .ok_or_else(|| SpecError::InvalidRelease(self.to_string()))?;
            *last = next.to_string();
        }

        Ok(numbers.join("."))
    }

    /// Composes the next release value for the given snapshot token
    /// (`<date><tag><commit>`).
    ///
    /// # Errors
    ///
    /// Returns an error if the release number cannot be advanced.
    pub fn next(&self, snapshot: &str) -> SpecResult<String> {
        let dist = if self.dist.is_empty() {
            DIST_MACRO
        } else {
            &self.dist
        };
        Ok(format!("{}.{snapshot}{dist}", self.bumped()?))
    }
}

impl fmt::Display for ReleaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.numbers.join("."))?;
        if let Some(snapshot) = &self.snapshot {
            write!(f, ".{snapshot}")?;
        }
        f.write_str(&self.dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let state = ReleaseState::parse("1%{?dist}", "git");
        assert_eq!(state.snapshot(), None);
        assert_eq!(state.dist(), "%{?dist}");
        assert_eq!(state.bumped().unwrap(), "2");
    }

    #[test]
    fn test_parse_snapshot() {
        let state = ReleaseState::parse("3.20240101git1a2b3c4d%{?dist}", "git");
        assert_eq!(state.snapshot(), Some("20240101git1a2b3c4d"));
        assert_eq!(state.bumped().unwrap(), "4");
    }

    #[test]
    fn test_snapshot_of_other_backend_is_not_dropped() {
        let state = ReleaseState::parse("3.20240101hg0123456789ab%{?dist}", "git");
        assert_eq!(state.snapshot(), None);
        // Trailing component is not numeric, so nothing is bumped.
        assert_eq!(state.bumped().unwrap(), "3.20240101hg0123456789ab");
    }

    #[test]
    fn test_bump_multi_component() {
        let state = ReleaseState::parse("0.5.12", "git");
        assert_eq!(state.bumped().unwrap(), "0.5.13");
        assert_eq!(state.dist(), "");
    }

    #[test]
    fn test_non_numeric_trailing_component() {
        let state = ReleaseState::parse("0.3.beta%{?dist}", "git");
        assert_eq!(state.bumped().unwrap(), "0.3.beta");
    }

    #[test]
    fn test_leading_zeroes() {
        let state = ReleaseState::parse("007", "git");
        assert_eq!(state.bumped().unwrap(), "8");
    }

    #[test]
    fn test_only_snapshot_is_invalid() {
        let state = ReleaseState::parse("20240101git1a2b3c4d%{?dist}", "git");
        assert!(matches!(state.bumped(), Err(SpecError::InvalidRelease(_))));
    }

    #[test]
    fn test_bump_at_u64_limit_is_invalid() {
        let state = ReleaseState::parse("18446744073709551615%{?dist}", "git");
        assert!(matches!(state.bumped(), Err(SpecError::InvalidRelease(_))));

        let state = ReleaseState::parse("1.99999999999999999999999", "git");
        assert!(matches!(state.bumped(), Err(SpecError::InvalidRelease(_))));

        let state = ReleaseState::parse("18446744073709551614", "git");
        assert_eq!(state.bumped().unwrap(), "18446744073709551615");
    }

    #[test]
    fn test_next_keeps_dist_variant() {
        let state = ReleaseState::parse("1%{?dist}.1", "git");
        assert_eq!(state.dist(), "%{?dist}.1");
        assert_eq!(
            state.next("20261018gitabcdef12").unwrap(),
            "2.20261018gitabcdef12%{?dist}.1"
        );
    }

    #[test]
    fn test_next_adds_dist_when_missing() {
        let state = ReleaseState::parse("5", "hg");
        assert_eq!(
            state.next("20261018hg0123456789ab").unwrap(),
            "6.20261018hg0123456789ab%{?dist}"
        );
    }

    #[test]
    fn test_display_round_trip() {
        let value = "2.20240101git1a2b3c4d%{?dist}";
        assert_eq!(ReleaseState::parse(value, "git").to_string(), value);
    }
}
