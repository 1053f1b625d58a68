//! Configuration for a peer

use std::time::Duration;

use icn_core::Name;

use crate::error::PeerError;

/// Configuration for a [`Peer`](crate::Peer)
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Prefix this peer answers Interests for
    pub producer_prefix: Name,
    /// Base name this peer issues Interests under
    pub interest_name: Name,
    /// Postfix for response names; stored but not applied to replies
    pub postfix: Name,
    /// Size of the filler payload in every Data, in bytes
    pub payload_size: usize,
    /// Lifetime set on every emitted Interest
    pub interest_lifetime: Duration,
    /// Freshness of produced Data; zero means unlimited
    pub freshness: Duration,
    /// Value placed in the placeholder signature (0 = no check expected)
    pub signature: u32,
    /// Key locator for produced Data; the root name means "not set"
    pub key_locator: Name,
    /// Interval between two emitted Interests
    pub send_interval: Duration,
    /// Run the consumer role
    pub consumer_enabled: bool,
    /// Run the producer role
    pub producer_enabled: bool,
    /// Re-express Interests whose Data did not arrive in time
    pub retransmissions: bool,
    /// Retransmissions per sequence before the request is abandoned
    pub max_retransmissions: u32,
    /// How often outstanding requests are checked for expiry
    pub retx_check_interval: Duration,
    /// Seed for the nonce generator (random when unset)
    pub nonce_seed: Option<u64>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            producer_prefix: Name::root(),
            interest_name: Name::root(),
            postfix: Name::root(),
            payload_size: 1024,
            interest_lifetime: Duration::from_secs(2),
            freshness: Duration::ZERO,
            signature: 0,
            key_locator: Name::root(),
            send_interval: Duration::from_secs(1),
            consumer_enabled: true,
            producer_enabled: true,
            retransmissions: false,
            max_retransmissions: 3,
            retx_check_interval: Duration::from_millis(50),
            nonce_seed: None,
        }
    }
}

impl PeerConfig {
    /// Configuration for a peer that only produces Data
    pub fn producer_only(prefix: Name) -> Self {
        Self {
            producer_prefix: prefix,
            consumer_enabled: false,
            ..Default::default()
        }
    }

    /// Configuration for a peer that only consumes Data
    pub fn consumer_only(interest_name: Name) -> Self {
        Self {
            interest_name,
            producer_enabled: false,
            ..Default::default()
        }
    }

    pub fn with_producer_prefix(mut self, prefix: Name) -> Self {
        self.producer_prefix = prefix;
        self
    }

    pub fn with_interest_name(mut self, name: Name) -> Self {
        self.interest_name = name;
        self
    }

    pub fn with_postfix(mut self, postfix: Name) -> Self {
        self.postfix = postfix;
        self
    }

    pub fn with_payload_size(mut self, size: usize) -> Self {
        self.payload_size = size;
        self
    }

    pub fn with_interest_lifetime(mut self, lifetime: Duration) -> Self {
        self.interest_lifetime = lifetime;
        self
    }

    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn with_signature(mut self, signature: u32) -> Self {
        self.signature = signature;
        self
    }

    pub fn with_key_locator(mut self, key_locator: Name) -> Self {
        self.key_locator = key_locator;
        self
    }

    pub fn with_send_interval(mut self, interval: Duration) -> Self {
        self.send_interval = interval;
        self
    }

    /// Enable retransmission with the given retry budget
    pub fn with_retransmissions(mut self, max_retransmissions: u32) -> Self {
        self.retransmissions = true;
        self.max_retransmissions = max_retransmissions;
        self
    }

    pub fn with_retx_check_interval(mut self, interval: Duration) -> Self {
        self.retx_check_interval = interval;
        self
    }

    pub fn with_nonce_seed(mut self, seed: u64) -> Self {
        self.nonce_seed = Some(seed);
        self
    }

    /// Check settings that would stall or disable the peer
    pub fn validate(&self) -> Result<(), PeerError> {
        if !self.consumer_enabled && !self.producer_enabled {
            return Err(PeerError::NoRoleEnabled);
        }
        if self.consumer_enabled && self.send_interval.is_zero() {
            return Err(PeerError::ZeroSendInterval);
        }
        if self.consumer_enabled && self.retx_check_interval.is_zero() {
            return Err(PeerError::ZeroRetxCheckInterval);
        }
        Ok(())
    }
}
