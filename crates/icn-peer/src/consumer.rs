//! Consumer role: Interest emission and response tracking

use std::time::Duration;

use icn_core::{Data, Interest, NodeId, SimTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::PeerConfig;
use crate::host::{Scheduler, Transport};
use crate::naming::NameBuilder;
use crate::observer::ObserverSet;
use crate::timer::{PeerTimer, TimerHandle};
use crate::tracker::{ResponseTracker, RttSample};

/// State owned by the consumer half of a peer
#[derive(Debug)]
pub struct ConsumerRole {
    names: NameBuilder,
    interest_lifetime: Duration,
    send_interval: Duration,
    retransmissions: bool,
    max_retransmissions: u32,
    retx_check_interval: Duration,
    rng: StdRng,
    send_timer: TimerHandle,
    check_timer: TimerHandle,
    /// When `check_timer` is due, while it is pending
    check_at: Option<SimTime>,
    tracker: ResponseTracker,
}

impl ConsumerRole {
    pub fn new(config: &PeerConfig) -> Self {
        let rng = match config.nonce_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            names: NameBuilder::new(config.interest_name.clone()),
            interest_lifetime: config.interest_lifetime,
            send_interval: config.send_interval,
            retransmissions: config.retransmissions,
            max_retransmissions: config.max_retransmissions,
            retx_check_interval: config.retx_check_interval,
            rng,
            send_timer: TimerHandle::default(),
            check_timer: TimerHandle::default(),
            check_at: None,
            tracker: ResponseTracker::new(),
        }
    }

    /// Build, record and send the next Interest, then re-arm the send timer
    pub(crate) fn emit_next_interest<H: Scheduler + Transport + ?Sized>(
        &mut self,
        node: NodeId,
        observers: &mut ObserverSet,
        host: &mut H,
    ) {
        let (seq, name) = self.names.next_name();
        let interest = Interest::new(name, self.rng.random()).with_lifetime(self.interest_lifetime);

        info!(%node, seq, nonce = interest.nonce(), "> Interest for {}", interest.name());
        observers.each(|o| o.on_interest_sent(node, &interest));

        let now = host.now();
        let deadline = now + self.request_timeout();
        self.tracker.record_sent(seq, interest.clone(), now, deadline);

        host.deliver_interest(interest);

        self.schedule_next_interest(host);
        self.arm_check_timer(host);
    }

    /// Arm the send timer unless it is already pending
    pub(crate) fn schedule_next_interest<H: Scheduler + ?Sized>(&mut self, host: &mut H) {
        if self.send_timer.is_pending() {
            trace!("send timer already pending");
            return;
        }
        self.send_timer = host.schedule(self.send_interval, PeerTimer::SendInterest);
        trace!(delay = ?self.send_interval, "send timer armed");
    }

    /// Arm the expiry check for the earliest outstanding deadline
    ///
    /// Checks are spaced at least `retx_check_interval` apart. A pending
    /// check due later than the new deadline is moved forward.
    pub(crate) fn arm_check_timer<H: Scheduler + ?Sized>(&mut self, host: &mut H) {
        let Some(deadline) = self.tracker.next_deadline() else {
            return;
        };
        let now = host.now();
        let at = deadline.max(now + self.retx_check_interval);
        if self.check_timer.is_pending() && self.check_at.is_some_and(|armed| armed <= at) {
            return;
        }

        let delay = at.saturating_duration_since(now);
        host.reschedule(&mut self.check_timer, delay, PeerTimer::RetransmitCheck);
        self.check_at = Some(at);
        trace!(?delay, "expiry check armed");
    }

    /// Match Data against outstanding requests and report delays
    pub(crate) fn on_data<H: Scheduler + ?Sized>(
        &mut self,
        node: NodeId,
        data: &Data,
        observers: &mut ObserverSet,
        host: &mut H,
    ) -> Option<RttSample> {
        let sample = self.tracker.on_data(data, host.now())?;

        debug!(%node, seq = sample.seq, hop_count = sample.hop_count, "Hop count");
        observers.each(|o| {
            o.on_last_retransmitted_interest_data_delay(
                node,
                sample.seq,
                sample.last_delay,
                sample.hop_count,
            );
            o.on_first_interest_data_delay(
                node,
                sample.seq,
                sample.full_delay,
                sample.retx_count,
                sample.hop_count,
            );
        });

        Some(sample)
    }

    /// Handle requests whose deadline passed
    ///
    /// Without retransmission every expired request is abandoned. With it,
    /// the Interest is sent again under a fresh nonce until the retry budget
    /// runs out.
    pub(crate) fn check_expired<H: Scheduler + Transport + ?Sized>(
        &mut self,
        node: NodeId,
        observers: &mut ObserverSet,
        host: &mut H,
    ) {
        let now = host.now();
        for seq in self.tracker.expired(now) {
            observers.each(|o| o.on_timeout(node, seq));

            let retx_count = self.tracker.get(seq).map_or(0, |r| r.retx_count);
            if !self.retransmissions || retx_count >= self.max_retransmissions {
                debug!(%node, seq, retx_count, "Abandoning request");
                self.tracker.abandon(seq);
                continue;
            }

            self.tracker.rtt_mut().increase_multiplier();
            let deadline = now + self.tracker.rtt().retransmit_timeout();
            let nonce = self.rng.random();
            if let Some(interest) = self.tracker.retransmit(seq, nonce, now, deadline) {
                info!(%node, seq, retx = retx_count + 1, "> Interest for {} (retransmission)", interest.name());
                observers.each(|o| o.on_interest_sent(node, &interest));
                host.deliver_interest(interest);
            }
        }

        self.arm_check_timer(host);
    }

    fn request_timeout(&self) -> Duration {
        if self.retransmissions {
            self.tracker.rtt().retransmit_timeout()
        } else {
            self.interest_lifetime
        }
    }

    pub fn tracker(&self) -> &ResponseTracker {
        &self.tracker
    }

    pub fn send_timer(&self) -> &TimerHandle {
        &self.send_timer
    }

    pub fn check_timer(&self) -> &TimerHandle {
        &self.check_timer
    }

    /// Sequence number of the next Interest
    pub fn next_sequence(&self) -> u32 {
        self.names.peek_sequence()
    }
}
