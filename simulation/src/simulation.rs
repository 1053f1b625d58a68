//! Discrete-event simulation engine
//!
//! Nodes each own a [`Forwarder`] and optionally run a [`Peer`]. Every
//! callback into a peer happens inside [`Simulation::run_until`], one event
//! at a time, with a [`NodeHost`] lending the peer the shared event queue and
//! its node's forwarder.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use icn_core::{Data, FaceId, Interest, Name, NodeId, SimTime};
use icn_logging::NodeContextGuard;
use icn_peer::{Peer, PeerConfig, PeerObserver, Responder};
use tracing::{debug, debug_span, info, trace};
use uuid::Uuid;

use crate::error::{SimError, SimResult};
use crate::forwarder::{APP_FACE, Forwarder, Link};
use crate::host::{NodeHost, SimEvent};
use crate::queue::EventQueue;
use crate::stats::{SimStats, StatsObserver};

struct SimNode {
    forwarder: Forwarder,
    peer: Option<Peer>,
}

/// The simulation state
pub struct Simulation {
    run_id: Uuid,
    queue: EventQueue<SimEvent>,
    nodes: Vec<SimNode>,
    stats: Rc<RefCell<SimStats>>,
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            queue: EventQueue::new(),
            nodes: Vec::new(),
            stats: Rc::new(RefCell::new(SimStats::default())),
        }
    }

    /// Consumer on node 0 and producer on node 1, joined by one link
    ///
    /// The consumer node gets a route toward the producer's prefix and both
    /// peers are started at time zero.
    pub fn two_node(
        consumer: PeerConfig,
        producer: PeerConfig,
        link_delay: Duration,
    ) -> SimResult<Self> {
        let mut sim = Self::new();
        let c = sim.add_node();
        let p = sim.add_node();
        let (c_face, _) = sim.add_link(c, p, link_delay)?;
        sim.add_route(c, producer.producer_prefix.clone(), c_face, 0)?;
        sim.install_peer(c, consumer)?;
        sim.install_peer(p, producer)?;
        sim.start_all();
        Ok(sim)
    }

    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SimNode {
            forwarder: Forwarder::new(id),
            peer: None,
        });
        id
    }

    /// Connect two nodes with a symmetric link
    ///
    /// Returns the face on `a` and the face on `b`.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, delay: Duration) -> SimResult<(FaceId, FaceId)> {
        let a_face = self.node_mut(a)?.forwarder.allocate_face();
        let b_face = self.node_mut(b)?.forwarder.allocate_face();
        self.node_mut(a)?.forwarder.connect(
            a_face,
            Link {
                remote_node: b,
                remote_face: b_face,
                delay,
            },
        );
        self.node_mut(b)?.forwarder.connect(
            b_face,
            Link {
                remote_node: a,
                remote_face: a_face,
                delay,
            },
        );
        debug!(%a, %a_face, %b, %b_face, ?delay, "Link added");
        Ok((a_face, b_face))
    }

    pub fn add_route(&mut self, node: NodeId, prefix: Name, face: FaceId, cost: u32) -> SimResult<()> {
        self.node_mut(node)?.forwarder.add_route(prefix, face, cost);
        Ok(())
    }

    /// Create a peer on `node`, attached to its application face
    pub fn install_peer(&mut self, node: NodeId, config: PeerConfig) -> SimResult<()> {
        let stats = self.stats.clone();
        let slot = self.node_mut(node)?;
        if slot.peer.is_some() {
            return Err(SimError::PeerExists(node));
        }
        let mut peer = Peer::new(node, APP_FACE, config)?;
        peer.add_observer(StatsObserver::new(stats));
        slot.peer = Some(peer);
        Ok(())
    }

    pub fn add_observer(&mut self, node: NodeId, observer: impl PeerObserver + 'static) -> SimResult<()> {
        let peer = self
            .node_mut(node)?
            .peer
            .as_mut()
            .ok_or(SimError::NoPeer(node))?;
        peer.add_observer(observer);
        Ok(())
    }

    pub fn start_peer(&mut self, node: NodeId) -> SimResult<()> {
        let index = self.index(node)?;
        self.start_index(index);
        Ok(())
    }

    pub fn start_all(&mut self) {
        for index in 0..self.nodes.len() {
            self.start_index(index);
        }
    }

    fn start_index(&mut self, index: usize) {
        let node = NodeId(index as u32);
        let _ctx = NodeContextGuard::new(node, self.run_id);
        let slot = &mut self.nodes[index];
        if let Some(peer) = &mut slot.peer {
            let mut host = NodeHost::new(node, &mut self.queue, &mut slot.forwarder);
            peer.start(&mut host);
        }
    }

    /// Stop the peer on `node` once the clock reaches `at`
    pub fn stop_peer_at(&mut self, node: NodeId, at: SimTime) -> SimResult<()> {
        self.index(node)?;
        let delay = at.saturating_duration_since(self.queue.now());
        self.queue.push(delay, SimEvent::StopPeer { node });
        Ok(())
    }

    /// Process every event up to and including `until`
    pub fn run_until(&mut self, until: SimTime) -> SimStats {
        info!(run_id = %self.run_id, from = %self.queue.now(), %until, "Running simulation");
        while let Some((at, event)) = self.queue.pop_until(until) {
            trace!(%at, ?event, "Dispatch");
            self.dispatch(event);
            self.stats.borrow_mut().events_processed += 1;
        }
        self.queue.advance_to(until);

        let stats = self.stats();
        info!(
            interests_sent = stats.interests_sent,
            data_received = stats.data_received,
            timeouts = stats.timeouts,
            mean_rtt = ?stats.mean_rtt(),
            "Simulation paused at {}",
            self.queue.now()
        );
        stats
    }

    fn dispatch(&mut self, event: SimEvent) {
        match event {
            SimEvent::Timer { node, timer } => self.with_peer(node, |peer, host| {
                peer.on_timer(timer, host);
            }),
            SimEvent::Interest {
                node,
                in_face,
                interest,
            } => self.forward_interest(node, in_face, interest),
            SimEvent::Data {
                node,
                in_face,
                data,
            } => self.forward_data(node, in_face, data),
            SimEvent::StopPeer { node } => self.with_peer(node, |peer, _| peer.stop()),
        }
    }

    fn forward_interest(&mut self, node: NodeId, in_face: FaceId, mut interest: Interest) {
        let now = self.queue.now();
        let Ok(index) = self.index(node) else { return };
        let forwarder = &mut self.nodes[index].forwarder;

        match forwarder.on_interest(interest.name(), interest.lifetime(), in_face, now) {
            None => {
                debug!(%node, name = %interest.name(), "No route, Interest dropped");
                self.stats.borrow_mut().interests_dropped += 1;
            }
            Some(APP_FACE) => self.with_peer(node, |peer, host| peer.on_interest(&interest, host)),
            Some(face) => {
                if let Some(link) = forwarder.link(face).copied() {
                    interest.tags.bump_hop_count();
                    self.queue.push(
                        link.delay,
                        SimEvent::Interest {
                            node: link.remote_node,
                            in_face: link.remote_face,
                            interest,
                        },
                    );
                }
            }
        }
    }

    fn forward_data(&mut self, node: NodeId, in_face: FaceId, data: Data) {
        let now = self.queue.now();
        let Ok(index) = self.index(node) else { return };
        let forwarder = &mut self.nodes[index].forwarder;

        let out_faces = forwarder.on_data(data.name(), now);
        if out_faces.is_empty() {
            debug!(%node, %in_face, name = %data.name(), "Unsolicited Data dropped");
            self.stats.borrow_mut().data_dropped += 1;
            return;
        }

        for face in out_faces {
            if face == APP_FACE {
                self.with_peer(node, |peer, host| {
                    peer.on_data(&data, host);
                });
            } else if let Some(link) = self.nodes[index].forwarder.link(face).copied() {
                let mut data = data.clone();
                data.tags.bump_hop_count();
                self.queue.push(
                    link.delay,
                    SimEvent::Data {
                        node: link.remote_node,
                        in_face: link.remote_face,
                        data,
                    },
                );
            }
        }
    }

    /// Run `f` against the peer on `node` with a host bound to that node
    fn with_peer(&mut self, node: NodeId, f: impl FnOnce(&mut Peer, &mut NodeHost<'_>)) {
        let Ok(index) = self.index(node) else { return };
        let _ctx = NodeContextGuard::new(node, self.run_id);
        let _span = debug_span!("node", %node).entered();

        let slot = &mut self.nodes[index];
        match &mut slot.peer {
            Some(peer) => {
                let mut host = NodeHost::new(node, &mut self.queue, &mut slot.forwarder);
                f(peer, &mut host);
            }
            None => trace!(%node, "No peer installed"),
        }
    }

    fn index(&self, node: NodeId) -> SimResult<usize> {
        let index = node.0 as usize;
        if index < self.nodes.len() {
            Ok(index)
        } else {
            Err(SimError::UnknownNode(node))
        }
    }

    fn node_mut(&mut self, node: NodeId) -> SimResult<&mut SimNode> {
        self.nodes
            .get_mut(node.0 as usize)
            .ok_or(SimError::UnknownNode(node))
    }

    /// Snapshot of the counters so far
    pub fn stats(&self) -> SimStats {
        self.stats.borrow().clone()
    }

    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn peer(&self, node: NodeId) -> Option<&Peer> {
        self.nodes.get(node.0 as usize)?.peer.as_ref()
    }

    pub fn forwarder(&self, node: NodeId) -> Option<&Forwarder> {
        self.nodes.get(node.0 as usize).map(|n| &n.forwarder)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icn_peer::{ObservedEvent, RecordingObserver};

    fn name(uri: &str) -> Name {
        uri.parse().unwrap()
    }

    fn pair(link_ms: u64) -> Simulation {
        Simulation::two_node(
            PeerConfig::consumer_only(name("/prefix")).with_nonce_seed(1),
            PeerConfig::producer_only(name("/prefix")),
            Duration::from_millis(link_ms),
        )
        .unwrap()
    }

    #[test]
    fn test_two_node_exchange() {
        let mut sim = pair(10);
        let stats = sim.run_until(SimTime::from_millis(5500));

        assert_eq!(stats.interests_sent, 5);
        assert_eq!(stats.data_sent, 5);
        assert_eq!(stats.data_received, 5);
        assert_eq!(stats.rtt_samples, 5);
        assert_eq!(stats.mean_rtt(), Some(Duration::from_millis(20)));
        assert_eq!(stats.max_hop_count, 1);
        assert_eq!(stats.timeouts, 0);
        assert_eq!(sim.now(), SimTime::from_millis(5500));
    }

    #[test]
    fn test_producer_route_registered() {
        let sim = pair(10);
        let routes = sim.forwarder(NodeId(1)).unwrap().routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].face, APP_FACE);
        assert_eq!(routes[0].prefix, name("/prefix"));
    }

    #[test]
    fn test_hop_count_reported() {
        let mut sim = pair(5);
        let recorder = RecordingObserver::new();
        sim.add_observer(NodeId(0), recorder.clone()).unwrap();
        sim.run_until(SimTime::from_millis(1100));

        let events = recorder.events();
        assert!(events.iter().any(|e| matches!(
            e,
            ObservedEvent::FullDelay { seq: 0, hop_count: 1, .. }
        )));
    }

    #[test]
    fn test_unrouted_interests_dropped() {
        let mut sim = Simulation::two_node(
            PeerConfig::consumer_only(name("/elsewhere")),
            PeerConfig::producer_only(name("/prefix")),
            Duration::from_millis(10),
        )
        .unwrap();
        let stats = sim.run_until(SimTime::from_millis(3500));

        assert_eq!(stats.interests_sent, 3);
        assert_eq!(stats.interests_dropped, 3);
        assert_eq!(stats.data_received, 0);
        // requests expire after the 2s lifetime
        assert_eq!(stats.timeouts, 1);
    }

    #[test]
    fn test_stopped_consumer_keeps_emitting() {
        let mut sim = pair(10);
        sim.stop_peer_at(NodeId(0), SimTime::from_millis(2500)).unwrap();
        let stats = sim.run_until(SimTime::from_millis(5500));

        assert!(!sim.peer(NodeId(0)).unwrap().is_active());
        assert_eq!(stats.interests_sent, 5);
        assert_eq!(stats.data_sent, 5);
        // replies after the stop are ignored and their requests expire
        assert_eq!(stats.data_received, 2);
        assert_eq!(stats.rtt_samples, 2);
        assert_eq!(stats.timeouts, 1);
    }

    #[test]
    fn test_unknown_node() {
        let mut sim = Simulation::new();
        assert!(matches!(
            sim.install_peer(NodeId(4), PeerConfig::default()),
            Err(SimError::UnknownNode(NodeId(4)))
        ));
    }

    #[test]
    fn test_duplicate_peer() {
        let mut sim = Simulation::new();
        let node = sim.add_node();
        sim.install_peer(node, PeerConfig::default()).unwrap();
        assert!(matches!(
            sim.install_peer(node, PeerConfig::default()),
            Err(SimError::PeerExists(_))
        ));
    }
}
