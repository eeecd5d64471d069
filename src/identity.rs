//! Identity tags correlating reconciliation results with local declarations.
//!
//! A tag is `<name>_<YYYYMMDDThhmmss>` in local wall-clock time. Two
//! operations on the same name within one second produce the same tag
//! unless [`IdentityStrategy::UniqueSuffix`] is selected.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Timestamp layout used in tags.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Tag name used for aggregate reads.
pub const AGGREGATE_TAG: &str = "config";

/// Length of the unique suffix appended by [`IdentityStrategy::UniqueSuffix`].
const SUFFIX_LEN: usize = 8;

/// How identity tags are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityStrategy {
    /// `<name>_<timestamp>`.
    #[default]
    Timestamp,
    /// `<name>_<timestamp>_<8 hex chars>`.
    UniqueSuffix,
}

/// An opaque identity tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceIdentity(String);

impl ResourceIdentity {
    /// Builds the tag for `name` at the given instant.
    #[must_use]
    pub fn at(name: &str, when: DateTime<Local>) -> Self {
        Self(format!("{name}_{}", when.format(TIMESTAMP_FORMAT)))
    }

    /// Builds the tag for `name` at the current time.
    #[must_use]
    pub fn now(name: &str) -> Self {
        Self::at(name, Local::now())
    }

    /// Builds a tag according to `strategy` at the current time.
    #[must_use]
    pub fn generate(name: &str, strategy: IdentityStrategy) -> Self {
        let base = Self::now(name);
        match strategy {
            IdentityStrategy::Timestamp => base,
            IdentityStrategy::UniqueSuffix => {
                let suffix = Uuid::new_v4().simple().to_string();
                Self(format!("{}_{}", base.0, &suffix[..SUFFIX_LEN]))
            }
        }
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the embedded timestamp back out of the tag.
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        // YYYYMMDDThhmmss is 15 characters
        const STAMP_LEN: usize = 15;

        let mut parts = self.0.rsplitn(2, '_');
        let last = parts.next()?;
        let stamp = if last.len() == STAMP_LEN {
            last
        } else {
            let rest = parts.next()?;
            rest.get(rest.len().checked_sub(STAMP_LEN)?..)?
        };
        NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResourceIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true if `tag` is `<name>_<8 digits>T<6 digits>`.
#[must_use]
pub fn is_timestamp_tag(tag: &str, name: &str) -> bool {
    let Some(stamp) = tag
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return false;
    };

    let bytes = stamp.as_bytes();
    bytes.len() == 15
        && bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'T'
        && bytes[9..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tag_format() {
        let when = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        let tag = ResourceIdentity::at("INT_SIZE", when);
        assert_eq!(tag.as_str(), "INT_SIZE_20240307T090501");
        assert!(is_timestamp_tag(tag.as_str(), "INT_SIZE"));
    }

    #[test]
    fn test_now_matches_pattern() {
        let tag = ResourceIdentity::now("EXP_LIMIT");
        assert!(is_timestamp_tag(tag.as_str(), "EXP_LIMIT"));
        assert!(!is_timestamp_tag(tag.as_str(), "INT_SIZE"));
    }

    #[test]
    fn test_timestamp_round_trip() {
        let when = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 58).unwrap();
        let tag = ResourceIdentity::at("RAND_MOD", when);
        assert_eq!(tag.timestamp(), Some(when.naive_local()));
    }

    #[test]
    fn test_unique_suffix() {
        let a = ResourceIdentity::generate("INT_SIZE", IdentityStrategy::UniqueSuffix);
        let b = ResourceIdentity::generate("INT_SIZE", IdentityStrategy::UniqueSuffix);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("INT_SIZE_"));
        assert!(a.timestamp().is_some());
        assert!(!is_timestamp_tag(a.as_str(), "INT_SIZE"));
    }

    #[test]
    fn test_rejects_malformed_tags() {
        assert!(!is_timestamp_tag("INT_SIZE_2024", "INT_SIZE"));
        assert!(!is_timestamp_tag("INT_SIZE-20240307T090501", "INT_SIZE"));
        assert!(!is_timestamp_tag("INT_SIZE_20240307X090501", "INT_SIZE"));
    }
}
