//! Sequence-numbered Interest names

use icn_core::{Component, Name};

/// Builds `base/<seq>` names from a monotonically increasing counter
#[derive(Debug, Clone)]
pub struct NameBuilder {
    base: Name,
    next_seq: u32,
}

impl NameBuilder {
    pub fn new(base: Name) -> Self {
        Self { base, next_seq: 0 }
    }

    /// Build the next name and advance the counter
    ///
    /// Returns the sequence number that was used.
    pub fn next_name(&mut self) -> (u32, Name) {
        let seq = self.next_seq;
        let name = self.base.clone().append(Component::from_sequence(seq));
        self.next_seq = self.next_seq.wrapping_add(1);
        (seq, name)
    }

    /// Sequence number the next call to [`next_name`](Self::next_name) uses
    pub fn peek_sequence(&self) -> u32 {
        self.next_seq
    }

    pub fn base(&self) -> &Name {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_names() {
        let mut builder = NameBuilder::new("/a".parse().unwrap());
        let names: Vec<String> = (0..3).map(|_| builder.next_name().1.to_string()).collect();
        assert_eq!(names, vec!["/a/0", "/a/1", "/a/2"]);
        assert_eq!(builder.peek_sequence(), 3);
    }

    #[test]
    fn test_root_base() {
        let mut builder = NameBuilder::new(Name::root());
        let (seq, name) = builder.next_name();
        assert_eq!(seq, 0);
        assert_eq!(name.to_string(), "/0");
    }

    #[test]
    fn test_trailing_component_matches_sequence() {
        let mut builder = NameBuilder::new("/video/seg".parse().unwrap());
        let mut previous = None;
        for _ in 0..100 {
            let (seq, name) = builder.next_name();
            assert_eq!(name.get(-1).unwrap().to_sequence().unwrap(), seq);
            if let Some(prev) = previous {
                assert_eq!(seq, prev + 1);
            }
            previous = Some(seq);
        }
    }
}
