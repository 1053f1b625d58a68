//! Simulated time

use std::fmt::{self, Display};
use std::ops::Add;
use std::time::Duration;

/// A point in simulated time, measured from the start of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(Duration);

impl SimTime {
    /// Simulation start
    pub const ZERO: SimTime = SimTime(Duration::ZERO);

    /// Create from an offset since simulation start
    pub fn from_duration(since_start: Duration) -> Self {
        Self(since_start)
    }

    /// Create from milliseconds since simulation start
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Offset since simulation start
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future
    pub fn saturating_duration_since(&self, earlier: SimTime) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0.saturating_add(rhs))
    }
}

impl Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{:.6}s", self.0.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let t = SimTime::from_millis(1500);
        let later = t + Duration::from_millis(250);
        assert_eq!(later.saturating_duration_since(t), Duration::from_millis(250));
        assert_eq!(t.saturating_duration_since(later), Duration::ZERO);
        assert_eq!(later.to_string(), "+1.750000s");
    }
}
