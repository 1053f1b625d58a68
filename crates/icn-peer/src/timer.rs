//! Timer handles shared between a peer and its scheduler
//!
//! A [`TimerHandle`] is owned by whoever armed the timer. The scheduler keeps
//! a clone next to the queued event; both see the same state, so the owner
//! can ask [`TimerHandle::is_pending`] or [`TimerHandle::cancel`] without any
//! global registry.

use std::cell::Cell;
use std::rc::Rc;

use derive_more::Display;

/// Timers a peer can arm
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerTimer {
    /// Emit the next Interest
    #[display("send-interest")]
    SendInterest,
    /// Look for outstanding requests whose deadline passed
    #[display("retransmit-check")]
    RetransmitCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Pending,
    Fired,
    Cancelled,
}

/// Handle to one scheduled timer
///
/// The default handle refers to no timer and is never pending.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    state: Option<Rc<Cell<TimerState>>>,
}

impl TimerHandle {
    /// Create a handle for a freshly queued timer (called by schedulers)
    pub fn pending() -> Self {
        Self {
            state: Some(Rc::new(Cell::new(TimerState::Pending))),
        }
    }

    /// True while the timer is queued and neither fired nor cancelled
    pub fn is_pending(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.get() == TimerState::Pending)
    }

    /// True if the timer was cancelled before it fired
    pub fn is_cancelled(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(|s| s.get() == TimerState::Cancelled)
    }

    /// Cancel the timer; no effect once it has fired
    pub fn cancel(&self) {
        if let Some(state) = &self.state {
            if state.get() == TimerState::Pending {
                state.set(TimerState::Cancelled);
            }
        }
    }

    /// Mark the timer as fired (called by schedulers)
    ///
    /// Returns false if it was cancelled, in which case the callback must
    /// not run.
    pub fn fire(&self) -> bool {
        match &self.state {
            Some(state) if state.get() == TimerState::Pending => {
                state.set(TimerState::Fired);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_display() {
        assert_eq!(PeerTimer::SendInterest.to_string(), "send-interest");
        assert_eq!(PeerTimer::RetransmitCheck.to_string(), "retransmit-check");
    }

    #[test]
    fn test_default_not_pending() {
        let handle = TimerHandle::default();
        assert!(!handle.is_pending());
        assert!(!handle.fire());
    }

    #[test]
    fn test_shared_state() {
        let owner = TimerHandle::pending();
        let queued = owner.clone();
        assert!(owner.is_pending());
        assert!(queued.fire());
        assert!(!owner.is_pending());
        // firing twice is a no-op
        assert!(!queued.fire());
    }

    #[test]
    fn test_cancel() {
        let owner = TimerHandle::pending();
        let queued = owner.clone();
        owner.cancel();
        assert!(!owner.is_pending());
        assert!(owner.is_cancelled());
        assert!(!queued.fire());
    }

    #[test]
    fn test_cancel_after_fire() {
        let owner = TimerHandle::pending();
        assert!(owner.clone().fire());
        owner.cancel();
        assert!(!owner.is_cancelled());
    }
}
