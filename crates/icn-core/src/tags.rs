//! Link-layer packet tags
//!
//! Tags travel with a packet inside one node and across simulated links but
//! are never part of the TLV wire image.

use derive_more::Display;

/// Number of forwarding hops a packet has traversed
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[display("{_0}")]
pub struct HopCountTag(pub u64);

impl HopCountTag {
    /// Tag value after one more hop
    pub fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Local annotations attached to an Interest or Data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketTags {
    /// Absent when the packet never crossed a hop-counted link
    pub hop_count: Option<HopCountTag>,
}

impl PacketTags {
    /// Record one more link traversal
    pub fn bump_hop_count(&mut self) {
        self.hop_count = Some(self.hop_count.unwrap_or_default().incremented());
    }
}
