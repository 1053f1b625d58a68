//! Simulation statistics

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use icn_core::{Data, Interest, NodeId};
use icn_peer::PeerObserver;
use serde::Serialize;

/// Counters collected over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    pub interests_sent: u64,
    pub interests_received: u64,
    pub data_sent: u64,
    pub data_received: u64,
    pub rtt_samples: u64,
    pub timeouts: u64,
    /// Interests with no FIB route
    pub interests_dropped: u64,
    /// Data with no matching PIT entry
    pub data_dropped: u64,
    pub events_processed: u64,
    /// Sum of first-transmission delays over all samples
    pub total_rtt: Duration,
    pub max_hop_count: u64,
}

impl SimStats {
    /// Mean delay from first transmission to Data
    pub fn mean_rtt(&self) -> Option<Duration> {
        let samples = u32::try_from(self.rtt_samples).ok().filter(|n| *n > 0)?;
        Some(self.total_rtt / samples)
    }

    /// Fraction of sent Interests that were answered
    pub fn satisfaction_ratio(&self) -> f64 {
        if self.interests_sent == 0 {
            return 0.0;
        }
        self.rtt_samples as f64 / self.interests_sent as f64
    }
}

/// Observer feeding peer activity into shared [`SimStats`]
#[derive(Debug, Clone)]
pub struct StatsObserver {
    stats: Rc<RefCell<SimStats>>,
}

impl StatsObserver {
    pub fn new(stats: Rc<RefCell<SimStats>>) -> Self {
        Self { stats }
    }
}

impl PeerObserver for StatsObserver {
    fn on_interest_sent(&mut self, _node: NodeId, _interest: &Interest) {
        self.stats.borrow_mut().interests_sent += 1;
    }

    fn on_data_sent(&mut self, _node: NodeId, _data: &Data) {
        self.stats.borrow_mut().data_sent += 1;
    }

    fn on_interest_received(&mut self, _node: NodeId, _interest: &Interest) {
        self.stats.borrow_mut().interests_received += 1;
    }

    fn on_data_received(&mut self, _node: NodeId, _data: &Data) {
        self.stats.borrow_mut().data_received += 1;
    }

    fn on_first_interest_data_delay(
        &mut self,
        _node: NodeId,
        _seq: u32,
        delay: Duration,
        _retx_count: u32,
        hop_count: u64,
    ) {
        let mut stats = self.stats.borrow_mut();
        stats.rtt_samples += 1;
        stats.total_rtt += delay;
        stats.max_hop_count = stats.max_hop_count.max(hop_count);
    }

    fn on_timeout(&mut self, _node: NodeId, _seq: u32) {
        self.stats.borrow_mut().timeouts += 1;
    }
}
