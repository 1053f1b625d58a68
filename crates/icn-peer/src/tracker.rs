//! Outstanding-request bookkeeping for the consumer role
//!
//! Every emitted Interest is recorded under its sequence number until the
//! matching Data arrives, the request is abandoned, or it is retransmitted.
//! Satisfied requests yield an [`RttSample`] and feed the [`RttEstimator`].

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use icn_core::{Data, Interest, SimTime};
use tracing::warn;

use crate::rtt::RttEstimator;

/// State kept for one unanswered Interest
#[derive(Debug, Clone)]
pub struct OutstandingRequest {
    /// Time of the first transmission
    pub first_sent: SimTime,
    /// Time of the latest (re)transmission
    pub last_sent: SimTime,
    /// Number of retransmissions so far
    pub retx_count: u32,
    /// When the request is considered lost
    pub deadline: SimTime,
    /// The Interest as last sent
    pub interest: Interest,
}

/// Measurement produced when Data satisfies a tracked request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RttSample {
    pub seq: u32,
    /// Delay since the latest transmission
    pub last_delay: Duration,
    /// Delay since the first transmission
    pub full_delay: Duration,
    pub retx_count: u32,
    /// Hops the Data traversed, 0 if it carried no hop-count tag
    pub hop_count: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ResponseTracker {
    outstanding: BTreeMap<u32, OutstandingRequest>,
    retransmitted: BTreeSet<u32>,
    rtt: RttEstimator,
}

impl ResponseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first transmission of `seq`
    ///
    /// A sequence that is already tracked is replaced.
    pub fn record_sent(&mut self, seq: u32, interest: Interest, now: SimTime, deadline: SimTime) {
        self.retransmitted.remove(&seq);
        self.outstanding.insert(
            seq,
            OutstandingRequest {
                first_sent: now,
                last_sent: now,
                retx_count: 0,
                deadline,
                interest,
            },
        );
    }

    /// Match incoming Data against the outstanding requests
    ///
    /// Returns `None` without touching any state when the trailing name
    /// component is not a sequence number or the sequence is not tracked.
    pub fn on_data(&mut self, data: &Data, now: SimTime) -> Option<RttSample> {
        let seq = match data.name().last().map(|c| c.to_sequence()) {
            Some(Ok(seq)) => seq,
            Some(Err(err)) => {
                warn!(name = %data.name(), %err, "Data name does not end in a sequence number");
                return None;
            }
            None => {
                warn!("Data with an empty name");
                return None;
            }
        };

        let request = self.outstanding.remove(&seq)?;
        let was_retransmitted = self.retransmitted.remove(&seq);

        let sample = RttSample {
            seq,
            last_delay: now.saturating_duration_since(request.last_sent),
            full_delay: now.saturating_duration_since(request.first_sent),
            retx_count: request.retx_count,
            hop_count: data.tags.hop_count.map_or(0, |h| h.0),
        };

        // A reply to a retransmitted Interest cannot be attributed to one send
        if !was_retransmitted {
            self.rtt.add_sample(sample.last_delay);
        }
        self.rtt.reset_multiplier();

        Some(sample)
    }

    /// Sequences whose deadline is at or before `now`, in ascending order
    pub fn expired(&self, now: SimTime) -> Vec<u32> {
        self.outstanding
            .iter()
            .filter(|(_, req)| req.deadline <= now)
            .map(|(seq, _)| *seq)
            .collect()
    }

    /// Earliest deadline among the outstanding requests
    pub fn next_deadline(&self) -> Option<SimTime> {
        self.outstanding.values().map(|req| req.deadline).min()
    }

    /// Prepare a retransmission of `seq` with a fresh nonce
    ///
    /// Returns the Interest to send, or `None` if `seq` is not tracked.
    pub fn retransmit(
        &mut self,
        seq: u32,
        nonce: u32,
        now: SimTime,
        deadline: SimTime,
    ) -> Option<Interest> {
        let request = self.outstanding.get_mut(&seq)?;
        request.interest.refresh_nonce(nonce);
        request.retx_count += 1;
        request.last_sent = now;
        request.deadline = deadline;
        self.retransmitted.insert(seq);
        Some(request.interest.clone())
    }

    /// Stop tracking `seq`
    pub fn abandon(&mut self, seq: u32) -> Option<OutstandingRequest> {
        self.retransmitted.remove(&seq);
        self.outstanding.remove(&seq)
    }

    pub fn get(&self, seq: u32) -> Option<&OutstandingRequest> {
        self.outstanding.get(&seq)
    }

    pub fn contains(&self, seq: u32) -> bool {
        self.outstanding.contains_key(&seq)
    }

    /// Whether `seq` has been retransmitted since it was recorded
    pub fn is_retransmitted(&self, seq: u32) -> bool {
        self.retransmitted.contains(&seq)
    }

    /// Tracked sequence numbers in ascending order
    pub fn outstanding(&self) -> impl Iterator<Item = u32> + '_ {
        self.outstanding.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn rtt(&self) -> &RttEstimator {
        &self.rtt
    }

    pub fn rtt_mut(&mut self) -> &mut RttEstimator {
        &mut self.rtt
    }
}
