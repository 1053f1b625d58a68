//! Hierarchical content names
//!
//! A [`Name`] is an ordered list of opaque [`Component`]s. Names are written
//! in URI form (`/prefix/video/0`); the root name `/` has no components.

use std::fmt::{self, Display, Write as _};
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NameError;

/// A single name component (generic, TLV type 8)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Component(Bytes);

impl Component {
    /// Create a component from raw bytes
    pub fn new(value: impl Into<Bytes>) -> Self {
        Self(value.into())
    }

    /// Create a component holding the decimal rendering of a sequence number
    pub fn from_sequence(seq: u32) -> Self {
        Self(Bytes::from(seq.to_string()))
    }

    /// Interpret this component as a decimal sequence number
    ///
    /// Only the canonical form written by [`from_sequence`](Self::from_sequence)
    /// is accepted: ASCII digits, no leading zero, fitting in 32 bits.
    pub fn to_sequence(&self) -> Result<u32, NameError> {
        let text = std::str::from_utf8(&self.0)
            .map_err(|_| NameError::NotASequenceNumber(self.to_string()))?;
        let canonical = match text.as_bytes() {
            [] => false,
            [b'0', _, ..] => false,
            digits => digits.iter().all(u8::is_ascii_digit),
        };
        if !canonical {
            return Err(NameError::NotASequenceNumber(self.to_string()));
        }
        text.parse::<u32>()
            .map_err(|_| NameError::NotASequenceNumber(self.to_string()))
    }

    /// Raw component value
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the component value in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the component value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn parse_escaped(text: &str) -> Result<Self, NameError> {
        let raw = text.as_bytes();
        let mut out = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'%' {
                let hex = raw
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| NameError::InvalidEscape(text.to_string()))?;
                out.push(hex);
                i += 3;
            } else {
                out.push(raw[i]);
                i += 1;
            }
        }
        Ok(Self(Bytes::from(out)))
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.0.iter() {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
                f.write_char(b as char)?;
            } else {
                write!(f, "%{:02X}", b)?;
            }
        }
        Ok(())
    }
}

impl From<&str> for Component {
    fn from(s: &str) -> Self {
        Self(Bytes::copy_from_slice(s.as_bytes()))
    }
}

/// Hierarchical name made of components
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The root name `/`
    pub fn root() -> Self {
        Self::default()
    }

    /// Append a component, returning the extended name
    pub fn append(mut self, component: impl Into<Component>) -> Self {
        self.components.push(component.into());
        self
    }

    /// Append a component in place
    pub fn push(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    /// Get a component by index
    ///
    /// Negative indices count from the end: `get(-1)` is the last component.
    pub fn get(&self, index: isize) -> Option<&Component> {
        let len = self.components.len() as isize;
        let idx = if index < 0 { len + index } else { index };
        if (0..len).contains(&idx) {
            self.components.get(idx as usize)
        } else {
            None
        }
    }

    /// Last component, if any
    pub fn last(&self) -> Option<&Component> {
        self.components.last()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if this is the root name
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Check if this name is a prefix of (or equal to) `other`
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.components.len() <= other.components.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }

    /// Iterate over components
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_char('/');
        }
        for c in &self.components {
            write!(f, "/{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let path = s.strip_prefix("ndn:").unwrap_or(s);
        if !path.starts_with('/') {
            return Err(NameError::InvalidUri(s.to_string()));
        }
        let components = path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(Component::parse_escaped)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { components })
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name: Name = "/a/b/c".parse().unwrap();
        assert_eq!(name.len(), 3);
        assert_eq!(name.to_string(), "/a/b/c");
    }

    #[test]
    fn test_root() {
        let name: Name = "/".parse().unwrap();
        assert!(name.is_empty());
        assert_eq!(name, Name::root());
        assert_eq!(name.to_string(), "/");
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!("a/b".parse::<Name>(), Err(NameError::InvalidUri(_))));
    }

    #[test]
    fn test_percent_escapes() {
        let name: Name = "/hello%20world".parse().unwrap();
        assert_eq!(name.get(0).unwrap().as_bytes(), b"hello world");
        assert_eq!(name.to_string(), "/hello%20world");
        assert!(matches!("/bad%2".parse::<Name>(), Err(NameError::InvalidEscape(_))));
    }

    #[test]
    fn test_negative_index() {
        let name: Name = "/a/b/c".parse().unwrap();
        assert_eq!(name.get(-1).unwrap().as_bytes(), b"c");
        assert_eq!(name.get(-3).unwrap().as_bytes(), b"a");
        assert!(name.get(-4).is_none());
        assert!(name.get(3).is_none());
        assert!(Name::root().get(-1).is_none());
    }

    #[test]
    fn test_sequence_component() {
        let c = Component::from_sequence(42);
        assert_eq!(c.as_bytes(), b"42");
        assert_eq!(c.to_sequence().unwrap(), 42);
    }

    #[test]
    fn test_sequence_rejects_garbage() {
        assert!(Component::from("abc").to_sequence().is_err());
        assert!(Component::from("").to_sequence().is_err());
        assert!(Component::from("+5").to_sequence().is_err());
        assert!(Component::from("01").to_sequence().is_err());
        assert!(Component::from("00").to_sequence().is_err());
        assert_eq!(Component::from("0").to_sequence().unwrap(), 0);
        assert!(Component::from("4294967296").to_sequence().is_err());
        assert_eq!(Component::from("4294967295").to_sequence().unwrap(), u32::MAX);
    }

    #[test]
    fn test_prefix() {
        let prefix: Name = "/a".parse().unwrap();
        let name: Name = "/a/1".parse().unwrap();
        let other: Name = "/b/1".parse().unwrap();
        assert!(prefix.is_prefix_of(&name));
        assert!(!prefix.is_prefix_of(&other));
        assert!(Name::root().is_prefix_of(&name));
        assert!(!name.is_prefix_of(&prefix));
    }
}
