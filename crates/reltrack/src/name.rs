//! Bounded byte-string identifiers.
//!
//! Entities and relation types are both named by short byte strings that
//! compare byte-wise. Anything past [`MAX_NAME_LEN`] bytes is dropped.

use std::borrow::Borrow;
use std::fmt;

use smallvec::SmallVec;

/// Longest name kept, in bytes.
pub const MAX_NAME_LEN: usize = 63;

/// An entity or relation-type identifier.
///
/// Ordering is plain lexicographic byte order, with no locale or UTF-8
/// awareness. Short names are stored inline.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Name(SmallVec<[u8; 24]>);

impl Name {
    /// Build a name from raw bytes, truncating past [`MAX_NAME_LEN`].
    #[must_use]
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        let kept = &bytes[..bytes.len().min(MAX_NAME_LEN)];
        Self(SmallVec::from_slice(kept))
    }

    /// The raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the name has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Borrow<[u8]> for Name {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Name {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for Name {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_long_names() {
        let long = "x".repeat(100);
        let name = Name::new(&long);
        assert_eq!(name.len(), MAX_NAME_LEN);
        assert_eq!(name, Name::new(&long[..MAX_NAME_LEN]));
    }

    #[test]
    fn test_byte_order() {
        // Uppercase sorts before lowercase, and quotes before both.
        let mut names = vec![Name::from("b"), Name::from("B"), Name::from("\"a\""), Name::from("ab")];
        names.sort();
        let rendered: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["\"a\"", "B", "ab", "b"]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert!(Name::from("rel") < Name::from("relation"));
    }
}
