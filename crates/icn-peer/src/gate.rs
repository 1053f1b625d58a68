//! Start/stop gate for packet handling

/// Whether the peer currently processes incoming Interests and Data
///
/// Closed until the peer is started. Closing the gate does not touch timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityGate {
    active: bool,
}

impl ActivityGate {
    pub fn open(&mut self) {
        self.active = true;
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn is_open(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_until_opened() {
        let mut gate = ActivityGate::default();
        assert!(!gate.is_open());
        gate.open();
        assert!(gate.is_open());
        gate.close();
        assert!(!gate.is_open());
    }
}
