//! Adapter exposing the event queue and forwarder to one node's peer

use std::time::Duration;

use icn_core::{Data, FaceId, Interest, Name, NodeId, SimTime};
use icn_peer::{PeerTimer, RouteRegistrar, Scheduler, TimerHandle, Transport};
use tracing::warn;

use crate::forwarder::{APP_FACE, Forwarder};
use crate::queue::EventQueue;

/// Everything that can happen in the simulated network
#[derive(Debug)]
pub enum SimEvent {
    /// A peer timer expired
    Timer { node: NodeId, timer: PeerTimer },
    /// An Interest reached `node` through `in_face`
    Interest {
        node: NodeId,
        in_face: FaceId,
        interest: Interest,
    },
    /// A Data packet reached `node` through `in_face`
    Data {
        node: NodeId,
        in_face: FaceId,
        data: Data,
    },
    /// Stop the peer on `node`
    StopPeer { node: NodeId },
}

/// The host a peer sees while the simulation runs one of its callbacks
///
/// Packets handed to the transport enter the node's forwarder through the
/// application face at the current instant.
pub struct NodeHost<'a> {
    node: NodeId,
    queue: &'a mut EventQueue<SimEvent>,
    forwarder: &'a mut Forwarder,
}

impl<'a> NodeHost<'a> {
    pub fn new(node: NodeId, queue: &'a mut EventQueue<SimEvent>, forwarder: &'a mut Forwarder) -> Self {
        Self {
            node,
            queue,
            forwarder,
        }
    }
}

impl Scheduler for NodeHost<'_> {
    fn now(&self) -> SimTime {
        self.queue.now()
    }

    fn schedule(&mut self, delay: Duration, timer: PeerTimer) -> TimerHandle {
        self.queue.push_timer(
            delay,
            SimEvent::Timer {
                node: self.node,
                timer,
            },
        )
    }
}

impl Transport for NodeHost<'_> {
    fn deliver_interest(&mut self, interest: Interest) {
        self.queue.push(
            Duration::ZERO,
            SimEvent::Interest {
                node: self.node,
                in_face: APP_FACE,
                interest,
            },
        );
    }

    fn deliver_data(&mut self, data: Data) {
        self.queue.push(
            Duration::ZERO,
            SimEvent::Data {
                node: self.node,
                in_face: APP_FACE,
                data,
            },
        );
    }
}

impl RouteRegistrar for NodeHost<'_> {
    fn add_route(&mut self, node: NodeId, prefix: &Name, face: FaceId, cost: u32) {
        if node != self.node {
            warn!(host = %self.node, %node, %prefix, "Route for another node ignored");
            return;
        }
        self.forwarder.add_route(prefix.clone(), face, cost);
    }
}
