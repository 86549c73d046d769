//! Hierarchical object keys.
//!
//! # Invariants
//! - A key is one or more non-empty segments joined by `/`.
//! - No segment is `.`/`..` or contains a separator or control character,
//!   so a key can never address anything outside its backend root.

use std::fmt::{Display, Formatter};

/// Separator between key segments.
pub const KEY_SEPARATOR: char = '/';

/// Validated `/`-joined storage key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey(String);

/// Reason a key segment was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidKey {
    pub segment: String,
}

impl Display for InvalidKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid object key segment: `{}`", self.segment.escape_debug())
    }
}

impl std::error::Error for InvalidKey {}

impl ObjectKey {
    /// Builds a key from already-separated segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, InvalidKey>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut joined = String::new();
        for segment in segments {
            let segment = segment.as_ref();
            if !is_valid_segment(segment) {
                return Err(InvalidKey {
                    segment: segment.to_string(),
                });
            }
            if !joined.is_empty() {
                joined.push(KEY_SEPARATOR);
            }
            joined.push_str(segment);
        }
        if joined.is_empty() {
            return Err(InvalidKey {
                segment: String::new(),
            });
        }
        Ok(Self(joined))
    }

    /// Parses a `/`-joined key, validating every segment.
    pub fn parse(value: &str) -> Result<Self, InvalidKey> {
        Self::from_segments(value.split(KEY_SEPARATOR))
    }

    /// Returns a child key with one more segment.
    pub fn child(&self, segment: &str) -> Result<Self, InvalidKey> {
        if !is_valid_segment(segment) {
            return Err(InvalidKey {
                segment: segment.to_string(),
            });
        }
        Ok(Self(format!("{}{KEY_SEPARATOR}{segment}", self.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_SEPARATOR)
    }

    /// Last segment of the key.
    pub fn name(&self) -> &str {
        self.0
            .rsplit(KEY_SEPARATOR)
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Returns the segments below `prefix`, or `None` when `self` is not
    /// strictly nested under it.
    pub fn relative_to(&self, prefix: &ObjectKey) -> Option<Vec<&str>> {
        let rest = self.0.strip_prefix(prefix.as_str())?;
        let rest = rest.strip_prefix(KEY_SEPARATOR)?;
        Some(rest.split(KEY_SEPARATOR).collect())
    }

    /// Whether `self` equals `prefix` or is nested below it.
    pub fn starts_with(&self, prefix: &ObjectKey) -> bool {
        self == prefix || self.relative_to(prefix).is_some()
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment
            .chars()
            .any(|ch| ch == KEY_SEPARATOR || ch == '\\' || ch.is_control())
}

#[cfg(test)]
mod tests {
    use super::ObjectKey;

    #[test]
    fn parse_rejects_navigation_segments() {
        assert!(ObjectKey::parse("u1/../etc").is_err());
        assert!(ObjectKey::parse("u1/./x").is_err());
        assert!(ObjectKey::parse("u1//x").is_err());
        assert!(ObjectKey::parse("u1\\x").is_err());
        assert!(ObjectKey::parse("").is_err());
    }

    #[test]
    fn relative_to_requires_segment_boundary() {
        let prefix = ObjectKey::parse("u1").unwrap();
        let nested = ObjectKey::parse("u1/Math/week_3/a.pdf").unwrap();
        let sibling = ObjectKey::parse("u10/Math").unwrap();

        assert_eq!(
            nested.relative_to(&prefix),
            Some(vec!["Math", "week_3", "a.pdf"])
        );
        assert_eq!(sibling.relative_to(&prefix), None);
        assert!(!sibling.starts_with(&prefix));
        assert_eq!(nested.name(), "a.pdf");
    }
}
