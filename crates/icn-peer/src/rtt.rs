//! Mean/deviation round-trip estimator
//!
//! Smooths RTT samples into an estimate and a mean deviation and derives the
//! retransmission timeout from them, with exponential back-off.

use std::time::Duration;

/// Estimate used before the first sample
pub const INITIAL_ESTIMATE: Duration = Duration::from_secs(1);
/// Lower bound on the retransmission timeout
pub const MIN_RTO: Duration = Duration::from_millis(200);
/// Upper bound on the retransmission timeout
pub const MAX_RTO: Duration = Duration::from_secs(200);
/// Largest back-off multiplier
pub const MAX_MULTIPLIER: u32 = 64;
/// Weight of a new sample
pub const GAIN: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct RttEstimator {
    estimate: f64,
    variance: f64,
    samples: u64,
    multiplier: u32,
}

impl RttEstimator {
    pub fn new() -> Self {
        Self {
            estimate: INITIAL_ESTIMATE.as_secs_f64(),
            variance: 0.0,
            samples: 0,
            multiplier: 1,
        }
    }

    /// Feed one round-trip measurement
    pub fn add_sample(&mut self, rtt: Duration) {
        let m = rtt.as_secs_f64();
        if self.samples == 0 {
            self.estimate = m;
            self.variance = m / 2.0;
        } else {
            let err = m - self.estimate;
            self.estimate += GAIN * err;
            self.variance += GAIN * (err.abs() - self.variance);
        }
        self.samples += 1;
    }

    /// Timeout after which an unanswered Interest is considered lost
    pub fn retransmit_timeout(&self) -> Duration {
        let rto = (self.estimate + 4.0 * self.variance) * self.multiplier as f64;
        let rto = Duration::try_from_secs_f64(rto).unwrap_or(MAX_RTO);
        rto.clamp(MIN_RTO, MAX_RTO)
    }

    /// Double the back-off multiplier after a timeout
    pub fn increase_multiplier(&mut self) {
        self.multiplier = (self.multiplier * 2).min(MAX_MULTIPLIER);
    }

    /// Clear back-off after a successful exchange
    pub fn reset_multiplier(&mut self) {
        self.multiplier = 1;
    }

    pub fn estimate(&self) -> Duration {
        Duration::from_secs_f64(self.estimate)
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }
}

impl Default for RttEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_timeout() {
        let rtt = RttEstimator::new();
        assert_eq!(rtt.retransmit_timeout(), INITIAL_ESTIMATE);
    }

    #[test]
    fn test_first_sample() {
        let mut rtt = RttEstimator::new();
        rtt.add_sample(Duration::from_millis(100));
        assert_eq!(rtt.samples(), 1);
        assert_eq!(rtt.estimate(), Duration::from_millis(100));
        // 100ms + 4 * 50ms
        assert_eq!(rtt.retransmit_timeout(), Duration::from_millis(300));
    }

    #[test]
    fn test_converges() {
        let mut rtt = RttEstimator::new();
        for _ in 0..200 {
            rtt.add_sample(Duration::from_millis(40));
        }
        let est = rtt.estimate().as_secs_f64();
        assert!((est - 0.040).abs() < 1e-6);
        assert_eq!(rtt.retransmit_timeout(), MIN_RTO);
    }

    #[test]
    fn test_backoff() {
        let mut rtt = RttEstimator::new();
        rtt.add_sample(Duration::from_millis(100));
        rtt.increase_multiplier();
        assert_eq!(rtt.retransmit_timeout(), Duration::from_millis(600));
        for _ in 0..20 {
            rtt.increase_multiplier();
        }
        assert_eq!(rtt.multiplier(), MAX_MULTIPLIER);
        rtt.reset_multiplier();
        assert_eq!(rtt.retransmit_timeout(), Duration::from_millis(300));
    }
}
