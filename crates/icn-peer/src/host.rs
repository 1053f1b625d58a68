//! Collaborator interfaces provided by the host
//!
//! The peer never advances time or moves packets itself. Whatever runs it
//! (the discrete-event simulation, a test double) implements these traits.

use std::time::Duration;

use icn_core::{Data, FaceId, Interest, Name, NodeId, SimTime};

use crate::timer::{PeerTimer, TimerHandle};

/// Source of time and timed callbacks
pub trait Scheduler {
    /// Current simulated time
    fn now(&self) -> SimTime;

    /// Arm `timer` to fire after `delay`
    ///
    /// When it fires the host calls [`Peer::on_timer`](crate::Peer::on_timer).
    fn schedule(&mut self, delay: Duration, timer: PeerTimer) -> TimerHandle;

    /// Cancel whatever `handle` refers to and arm a new timer in its place
    fn reschedule(&mut self, handle: &mut TimerHandle, delay: Duration, timer: PeerTimer) {
        handle.cancel();
        *handle = self.schedule(delay, timer);
    }
}

/// Packet delivery toward the forwarding layer
///
/// Fire-and-forget: delivery failures are the transport's business.
pub trait Transport {
    fn deliver_interest(&mut self, interest: Interest);

    fn deliver_data(&mut self, data: Data);
}

/// FIB registration
pub trait RouteRegistrar {
    /// Route Interests under `prefix` on `node` to `face`
    fn add_route(&mut self, node: NodeId, prefix: &Name, face: FaceId, cost: u32);
}

/// Everything a full peer needs from its host
pub trait PeerHost: Scheduler + Transport + RouteRegistrar {}

impl<T: Scheduler + Transport + RouteRegistrar + ?Sized> PeerHost for T {}
