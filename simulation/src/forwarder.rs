//! Per-node forwarding state
//!
//! A minimal forwarder: a FIB with longest-prefix match, a PIT that remembers
//! where each Interest came from so Data can retrace the path, and a face
//! table mapping link faces to the neighbour on the other end.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use icn_core::{FaceId, Name, NodeId, SimTime};
use tracing::trace;

/// Face connecting the forwarder to the local application
pub const APP_FACE: FaceId = FaceId(0);

/// One FIB entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub prefix: Name,
    pub face: FaceId,
    pub cost: u32,
}

/// Far end of a link face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub remote_node: NodeId,
    pub remote_face: FaceId,
    pub delay: Duration,
}

#[derive(Debug, Clone)]
struct PitEntry {
    in_faces: Vec<FaceId>,
    expires: SimTime,
}

#[derive(Debug)]
pub struct Forwarder {
    node: NodeId,
    fib: Vec<Route>,
    pit: HashMap<Name, PitEntry>,
    links: BTreeMap<FaceId, Link>,
    next_face: u32,
}

impl Forwarder {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            fib: Vec::new(),
            pit: HashMap::new(),
            links: BTreeMap::new(),
            next_face: APP_FACE.0 + 1,
        }
    }

    /// Reserve the next link face id
    pub fn allocate_face(&mut self) -> FaceId {
        let face = FaceId(self.next_face);
        self.next_face += 1;
        face
    }

    /// Attach a link to a face returned by [`allocate_face`](Self::allocate_face)
    pub fn connect(&mut self, face: FaceId, link: Link) {
        self.links.insert(face, link);
    }

    pub fn link(&self, face: FaceId) -> Option<&Link> {
        self.links.get(&face)
    }

    /// Add or update a FIB entry
    pub fn add_route(&mut self, prefix: Name, face: FaceId, cost: u32) {
        match self
            .fib
            .iter_mut()
            .find(|r| r.prefix == prefix && r.face == face)
        {
            Some(route) => route.cost = cost,
            None => self.fib.push(Route { prefix, face, cost }),
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.fib
    }

    /// Longest-prefix match, cheapest route among equals
    ///
    /// `exclude` is never returned, so an Interest is not sent back out of
    /// the face it arrived on.
    pub fn lookup(&self, name: &Name, exclude: FaceId) -> Option<FaceId> {
        self.fib
            .iter()
            .filter(|r| r.face != exclude && r.prefix.is_prefix_of(name))
            .max_by(|a, b| {
                a.prefix
                    .len()
                    .cmp(&b.prefix.len())
                    .then_with(|| b.cost.cmp(&a.cost))
            })
            .map(|r| r.face)
    }

    /// Record an incoming Interest and pick its next hop
    ///
    /// Expired PIT entries are purged on every call.
    pub fn on_interest(
        &mut self,
        name: &Name,
        lifetime: Duration,
        in_face: FaceId,
        now: SimTime,
    ) -> Option<FaceId> {
        self.purge_expired(now);
        let next_hop = self.lookup(name, in_face)?;

        let expires = now + lifetime;
        let entry = self.pit.entry(name.clone()).or_insert_with(|| PitEntry {
            in_faces: Vec::new(),
            expires,
        });
        if !entry.in_faces.contains(&in_face) {
            entry.in_faces.push(in_face);
        }
        entry.expires = entry.expires.max(expires);

        trace!(node = %self.node, %name, %in_face, %next_hop, "PIT insert");
        Some(next_hop)
    }

    /// Consume the PIT entry for `name`, returning the faces to send Data on
    ///
    /// Empty when the Data is unsolicited or the entry expired.
    pub fn on_data(&mut self, name: &Name, now: SimTime) -> Vec<FaceId> {
        match self.pit.remove(name) {
            Some(entry) if entry.expires >= now => entry.in_faces,
            _ => Vec::new(),
        }
    }

    /// Drop PIT entries whose lifetime ran out before `now`
    pub fn purge_expired(&mut self, now: SimTime) -> usize {
        let before = self.pit.len();
        self.pit.retain(|_, entry| entry.expires >= now);
        let purged = before - self.pit.len();
        if purged > 0 {
            trace!(node = %self.node, purged, "PIT entries expired");
        }
        purged
    }

    pub fn pit_len(&self) -> usize {
        self.pit.len()
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(uri: &str) -> Name {
        uri.parse().unwrap()
    }

    #[test]
    fn test_longest_prefix_match() {
        let mut fwd = Forwarder::new(NodeId(0));
        fwd.add_route(name("/"), FaceId(1), 0);
        fwd.add_route(name("/a"), FaceId(2), 0);
        fwd.add_route(name("/a/b"), FaceId(3), 0);

        assert_eq!(fwd.lookup(&name("/a/b/c"), APP_FACE), Some(FaceId(3)));
        assert_eq!(fwd.lookup(&name("/a/x"), APP_FACE), Some(FaceId(2)));
        assert_eq!(fwd.lookup(&name("/z"), APP_FACE), Some(FaceId(1)));
        // falls back to a shorter prefix when the best face is excluded
        assert_eq!(fwd.lookup(&name("/a/b/c"), FaceId(3)), Some(FaceId(2)));
    }

    #[test]
    fn test_cost_breaks_ties() {
        let mut fwd = Forwarder::new(NodeId(0));
        fwd.add_route(name("/a"), FaceId(1), 10);
        fwd.add_route(name("/a"), FaceId(2), 5);
        assert_eq!(fwd.lookup(&name("/a/0"), APP_FACE), Some(FaceId(2)));

        fwd.add_route(name("/a"), FaceId(1), 1);
        assert_eq!(fwd.routes().len(), 2);
        assert_eq!(fwd.lookup(&name("/a/0"), APP_FACE), Some(FaceId(1)));
    }

    #[test]
    fn test_no_route() {
        let mut fwd = Forwarder::new(NodeId(0));
        let hop = fwd.on_interest(&name("/a/0"), Duration::from_secs(2), APP_FACE, SimTime::ZERO);
        assert!(hop.is_none());
        assert_eq!(fwd.pit_len(), 0);
    }

    #[test]
    fn test_pit_round_trip() {
        let mut fwd = Forwarder::new(NodeId(0));
        let link = fwd.allocate_face();
        fwd.add_route(name("/a"), link, 0);

        let hop = fwd.on_interest(&name("/a/0"), Duration::from_secs(2), APP_FACE, SimTime::ZERO);
        assert_eq!(hop, Some(link));
        assert_eq!(fwd.on_data(&name("/a/0"), SimTime::from_millis(100)), vec![APP_FACE]);
        // entry consumed
        assert!(fwd.on_data(&name("/a/0"), SimTime::from_millis(100)).is_empty());
    }

    #[test]
    fn test_expired_pit_entry() {
        let mut fwd = Forwarder::new(NodeId(0));
        let link = fwd.allocate_face();
        fwd.add_route(name("/a"), link, 0);
        fwd.on_interest(&name("/a/0"), Duration::from_secs(2), APP_FACE, SimTime::ZERO);
        assert!(fwd.on_data(&name("/a/0"), SimTime::from_millis(2001)).is_empty());
    }

    #[test]
    fn test_unanswered_entries_purged() {
        let mut fwd = Forwarder::new(NodeId(0));
        let link = fwd.allocate_face();
        fwd.add_route(name("/a"), link, 0);

        for seq in 0..5u64 {
            let uri = format!("/a/{seq}");
            fwd.on_interest(&name(&uri), Duration::from_secs(2), APP_FACE, SimTime::from_millis(seq * 1000));
        }
        // entries from 0s and 1s expired before 4s; 2s is still live at its boundary
        assert_eq!(fwd.pit_len(), 3);

        assert_eq!(fwd.purge_expired(SimTime::from_millis(10_000)), 3);
        assert_eq!(fwd.pit_len(), 0);
    }

    #[test]
    fn test_faces() {
        let mut fwd = Forwarder::new(NodeId(0));
        let face = fwd.allocate_face();
        assert_eq!(face, FaceId(1));
        fwd.connect(
            face,
            Link {
                remote_node: NodeId(1),
                remote_face: FaceId(1),
                delay: Duration::from_millis(10),
            },
        );
        assert_eq!(fwd.link(face).unwrap().remote_node, NodeId(1));
        assert!(fwd.link(APP_FACE).is_none());
    }
}
