//! The peer entity and its two capability interfaces

use icn_core::{Data, FaceId, Interest, NodeId};
use tracing::{debug, info, trace};

use crate::config::PeerConfig;
use crate::consumer::ConsumerRole;
use crate::error::PeerError;
use crate::gate::ActivityGate;
use crate::host::{PeerHost, Scheduler, Transport};
use crate::observer::{ObserverSet, PeerObserver};
use crate::producer::ProducerRole;
use crate::timer::PeerTimer;
use crate::tracker::RttSample;

/// Consumer capability: periodic Interest emission
pub trait Emitter {
    /// Emit one Interest for the next sequence number and re-arm the send
    /// timer
    ///
    /// Not gated by start/stop.
    fn emit_next_interest<H: Scheduler + Transport + ?Sized>(&mut self, host: &mut H);

    /// Arm the send timer; a no-op while one is already pending
    fn schedule_next_interest<H: Scheduler + ?Sized>(&mut self, host: &mut H);
}

/// Producer capability: answering Interests
pub trait Responder {
    /// Reply to an Interest that the forwarding layer routed to this peer
    fn on_interest<H: Transport + ?Sized>(&mut self, interest: &Interest, host: &mut H);
}

/// One node's application: a consumer, a producer, or both
#[derive(Debug)]
pub struct Peer {
    node: NodeId,
    app_face: FaceId,
    gate: ActivityGate,
    consumer: Option<ConsumerRole>,
    producer: Option<ProducerRole>,
    observers: ObserverSet,
    route_registered: bool,
}

impl Peer {
    /// Create a stopped peer running on `node`, attached through `app_face`
    pub fn new(node: NodeId, app_face: FaceId, config: PeerConfig) -> Result<Self, PeerError> {
        config.validate()?;
        Ok(Self {
            node,
            app_face,
            gate: ActivityGate::default(),
            consumer: config.consumer_enabled.then(|| ConsumerRole::new(&config)),
            producer: config.producer_enabled.then(|| ProducerRole::new(&config)),
            observers: ObserverSet::default(),
            route_registered: false,
        })
    }

    /// Register an observer notified of everything this peer does
    pub fn add_observer(&mut self, observer: impl PeerObserver + 'static) {
        self.observers.add(Box::new(observer));
    }

    /// Open the gate, register the producer route and arm the first send
    ///
    /// The route is registered on the first start only.
    pub fn start<H: PeerHost + ?Sized>(&mut self, host: &mut H) {
        self.gate.open();

        if let Some(producer) = &self.producer {
            if !self.route_registered {
                host.add_route(self.node, producer.prefix(), self.app_face, 0);
                self.route_registered = true;
                debug!(node = %self.node, prefix = %producer.prefix(), face = %self.app_face, "Route registered");
            }
        }

        if let Some(consumer) = &mut self.consumer {
            consumer.schedule_next_interest(host);
            consumer.arm_check_timer(host);
        }

        info!(node = %self.node, "Peer started");
    }

    /// Close the gate for incoming packets
    ///
    /// Emission is not gated, so the send timer keeps running.
    pub fn stop(&mut self) {
        self.gate.close();
        info!(node = %self.node, "Peer stopped");
    }

    /// Data routed to this peer
    ///
    /// Returns the RTT sample if the Data satisfied a tracked request.
    pub fn on_data<H: Scheduler + ?Sized>(&mut self, data: &Data, host: &mut H) -> Option<RttSample> {
        if !self.gate.is_open() {
            trace!(node = %self.node, name = %data.name(), "Inactive, ignoring Data");
            return None;
        }

        let node = self.node;
        self.observers.each(|o| o.on_data_received(node, data));
        info!(%node, "< DATA for {}", data.name());

        let consumer = self.consumer.as_mut()?;
        consumer.on_data(node, data, &mut self.observers, host)
    }

    /// A timer armed through [`Scheduler::schedule`] fired
    ///
    /// Timers run whether or not the peer is active: a stopped consumer keeps
    /// emitting and its outstanding requests still expire.
    pub fn on_timer<H: Scheduler + Transport + ?Sized>(&mut self, timer: PeerTimer, host: &mut H) {
        trace!(node = %self.node, %timer, active = self.gate.is_open(), "Timer fired");
        match timer {
            PeerTimer::SendInterest => self.emit_next_interest(host),
            PeerTimer::RetransmitCheck => {
                let node = self.node;
                if let Some(consumer) = &mut self.consumer {
                    consumer.check_expired(node, &mut self.observers, host);
                }
            }
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn app_face(&self) -> FaceId {
        self.app_face
    }

    pub fn is_active(&self) -> bool {
        self.gate.is_open()
    }

    pub fn consumer(&self) -> Option<&ConsumerRole> {
        self.consumer.as_ref()
    }

    pub fn producer(&self) -> Option<&ProducerRole> {
        self.producer.as_ref()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Emitter for Peer {
    fn emit_next_interest<H: Scheduler + Transport + ?Sized>(&mut self, host: &mut H) {
        let node = self.node;
        match &mut self.consumer {
            Some(consumer) => consumer.emit_next_interest(node, &mut self.observers, host),
            None => trace!(%node, "Consumer role disabled, nothing to emit"),
        }
    }

    fn schedule_next_interest<H: Scheduler + ?Sized>(&mut self, host: &mut H) {
        if let Some(consumer) = &mut self.consumer {
            consumer.schedule_next_interest(host);
        }
    }
}

impl Responder for Peer {
    fn on_interest<H: Transport + ?Sized>(&mut self, interest: &Interest, host: &mut H) {
        let node = self.node;
        self.observers.each(|o| o.on_interest_received(node, interest));

        if !self.gate.is_open() {
            trace!(%node, name = %interest.name(), "Inactive, ignoring Interest");
            return;
        }

        match &self.producer {
            Some(producer) => producer.respond(node, interest, &mut self.observers, host),
            None => trace!(%node, "Producer role disabled, Interest dropped"),
        }
    }
}
