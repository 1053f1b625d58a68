//! Observer hooks for tracing peer activity
//!
//! Observers are pure notification sinks. Every hook has a no-op default so
//! an implementation only overrides what it cares about.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use icn_core::{Data, Interest, Name, NodeId};

/// Receives notifications about what a peer sends and receives
pub trait PeerObserver {
    fn on_interest_sent(&mut self, _node: NodeId, _interest: &Interest) {}

    fn on_data_sent(&mut self, _node: NodeId, _data: &Data) {}

    fn on_interest_received(&mut self, _node: NodeId, _interest: &Interest) {}

    fn on_data_received(&mut self, _node: NodeId, _data: &Data) {}

    /// Delay between the latest (re)transmission of `seq` and its Data
    fn on_last_retransmitted_interest_data_delay(
        &mut self,
        _node: NodeId,
        _seq: u32,
        _delay: Duration,
        _hop_count: u64,
    ) {
    }

    /// Delay between the first transmission of `seq` and its Data
    fn on_first_interest_data_delay(
        &mut self,
        _node: NodeId,
        _seq: u32,
        _delay: Duration,
        _retx_count: u32,
        _hop_count: u64,
    ) {
    }

    /// An outstanding request for `seq` passed its deadline
    fn on_timeout(&mut self, _node: NodeId, _seq: u32) {}
}

/// Fan-out over registered observers
#[derive(Default)]
pub(crate) struct ObserverSet {
    observers: Vec<Box<dyn PeerObserver>>,
}

impl ObserverSet {
    pub(crate) fn add(&mut self, observer: Box<dyn PeerObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn each(&mut self, mut f: impl FnMut(&mut dyn PeerObserver)) {
        for observer in &mut self.observers {
            f(observer.as_mut());
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// A recorded observer notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    InterestSent {
        node: NodeId,
        name: Name,
        nonce: u32,
    },
    DataSent {
        node: NodeId,
        name: Name,
        content_len: usize,
    },
    InterestReceived {
        node: NodeId,
        name: Name,
    },
    DataReceived {
        node: NodeId,
        name: Name,
    },
    LastDelay {
        node: NodeId,
        seq: u32,
        delay: Duration,
        hop_count: u64,
    },
    FullDelay {
        node: NodeId,
        seq: u32,
        delay: Duration,
        retx_count: u32,
        hop_count: u64,
    },
    Timeout {
        node: NodeId,
        seq: u32,
    },
}

/// Observer that appends every notification to a shared log
///
/// Clones share the same log, so one clone can be registered on a peer and
/// another kept to read the events back.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<ObservedEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.borrow().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<ObservedEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of recorded events matching `pred`
    pub fn count(&self, pred: impl Fn(&ObservedEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: ObservedEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl PeerObserver for RecordingObserver {
    fn on_interest_sent(&mut self, node: NodeId, interest: &Interest) {
        self.push(ObservedEvent::InterestSent {
            node,
            name: interest.name().clone(),
            nonce: interest.nonce(),
        });
    }

    fn on_data_sent(&mut self, node: NodeId, data: &Data) {
        self.push(ObservedEvent::DataSent {
            node,
            name: data.name().clone(),
            content_len: data.content().len(),
        });
    }

    fn on_interest_received(&mut self, node: NodeId, interest: &Interest) {
        self.push(ObservedEvent::InterestReceived {
            node,
            name: interest.name().clone(),
        });
    }

    fn on_data_received(&mut self, node: NodeId, data: &Data) {
        self.push(ObservedEvent::DataReceived {
            node,
            name: data.name().clone(),
        });
    }

    fn on_last_retransmitted_interest_data_delay(
        &mut self,
        node: NodeId,
        seq: u32,
        delay: Duration,
        hop_count: u64,
    ) {
        self.push(ObservedEvent::LastDelay {
            node,
            seq,
            delay,
            hop_count,
        });
    }

    fn on_first_interest_data_delay(
        &mut self,
        node: NodeId,
        seq: u32,
        delay: Duration,
        retx_count: u32,
        hop_count: u64,
    ) {
        self.push(ObservedEvent::FullDelay {
            node,
            seq,
            delay,
            retx_count,
            hop_count,
        });
    }

    fn on_timeout(&mut self, node: NodeId, seq: u32) {
        self.push(ObservedEvent::Timeout { node, seq });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Silent;

    impl PeerObserver for Silent {}

    #[test]
    fn test_clones_share_log() {
        let recorder = RecordingObserver::new();
        let mut set = ObserverSet::default();
        set.add(Box::new(recorder.clone()));
        set.add(Box::new(Silent));
        assert_eq!(set.len(), 2);

        set.each(|o| o.on_timeout(NodeId(1), 4));
        set.each(|o| o.on_timeout(NodeId(1), 5));

        assert_eq!(
            recorder.count(|e| matches!(e, ObservedEvent::Timeout { .. })),
            2
        );
        assert_eq!(
            recorder.take()[0],
            ObservedEvent::Timeout {
                node: NodeId(1),
                seq: 4
            }
        );
        assert!(recorder.events().is_empty());
    }
}
