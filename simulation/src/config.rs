//! Scenario configuration
//!
//! Loaded in three layers: built-in defaults, then an optional TOML file,
//! then `ICNSIM_*` environment variables. Durations are written as `*_ms`
//! integers and names as URI strings.
//!
//! ```toml
//! duration_ms = 10000
//! link_delay_ms = 10
//!
//! [consumer]
//! interest_name = "/prefix"
//! send_interval_ms = 1000
//!
//! [producer]
//! prefix = "/prefix"
//! payload_size = 1024
//! key_locator = "/prefix/KEY/1"
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use icn_core::{Name, SimTime};
use icn_peer::PeerConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "ICNSIM_";

/// Two-node scenario description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Simulated time to run for
    pub duration_ms: u64,
    /// One-way delay of the link between the nodes
    pub link_delay_ms: u64,
    /// Seed for the consumer's nonces (random when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub consumer: ConsumerSection,
    pub producer: ProducerSection,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            duration_ms: 10_000,
            link_delay_ms: 10,
            seed: None,
            consumer: ConsumerSection::default(),
            producer: ProducerSection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumerSection {
    pub interest_name: Name,
    pub interest_lifetime_ms: u64,
    pub send_interval_ms: u64,
    pub retransmissions: bool,
    pub max_retransmissions: u32,
    pub retx_check_interval_ms: u64,
}

impl Default for ConsumerSection {
    fn default() -> Self {
        let peer = PeerConfig::default();
        Self {
            interest_name: default_prefix(),
            interest_lifetime_ms: millis(peer.interest_lifetime),
            send_interval_ms: millis(peer.send_interval),
            retransmissions: peer.retransmissions,
            max_retransmissions: peer.max_retransmissions,
            retx_check_interval_ms: millis(peer.retx_check_interval),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProducerSection {
    pub prefix: Name,
    pub postfix: Name,
    pub payload_size: usize,
    /// Zero means the Data never goes stale
    pub freshness_ms: u64,
    pub signature: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_locator: Option<Name>,
}

impl Default for ProducerSection {
    fn default() -> Self {
        let peer = PeerConfig::default();
        Self {
            prefix: default_prefix(),
            postfix: peer.postfix,
            payload_size: peer.payload_size,
            freshness_ms: millis(peer.freshness),
            signature: peer.signature,
            key_locator: None,
        }
    }
}

fn default_prefix() -> Name {
    Name::root().append("prefix")
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl ScenarioConfig {
    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `ICNSIM_*` overrides read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let env = EnvReader { lookup };
        env.set("DURATION_MS", &mut self.duration_ms)?;
        env.set("LINK_DELAY_MS", &mut self.link_delay_ms)?;
        if let Some(seed) = env.get::<u64>("SEED")? {
            self.seed = Some(seed);
        }
        env.set("INTEREST_NAME", &mut self.consumer.interest_name)?;
        env.set("INTEREST_LIFETIME_MS", &mut self.consumer.interest_lifetime_ms)?;
        env.set("SEND_INTERVAL_MS", &mut self.consumer.send_interval_ms)?;
        env.set("RETRANSMISSIONS", &mut self.consumer.retransmissions)?;
        env.set("PREFIX", &mut self.producer.prefix)?;
        env.set("PAYLOAD_SIZE", &mut self.producer.payload_size)?;
        env.set("FRESHNESS_MS", &mut self.producer.freshness_ms)?;
        env.set("SIGNATURE", &mut self.producer.signature)?;
        if let Some(key_locator) = env.get::<Name>("KEY_LOCATOR")? {
            self.producer.key_locator = Some(key_locator);
        }
        Ok(())
    }

    pub fn duration(&self) -> SimTime {
        SimTime::from_millis(self.duration_ms)
    }

    pub fn link_delay(&self) -> Duration {
        Duration::from_millis(self.link_delay_ms)
    }

    /// Peer configuration for the consumer node
    pub fn consumer_config(&self) -> PeerConfig {
        let c = &self.consumer;
        let mut config = PeerConfig::consumer_only(c.interest_name.clone())
            .with_interest_lifetime(Duration::from_millis(c.interest_lifetime_ms))
            .with_send_interval(Duration::from_millis(c.send_interval_ms))
            .with_retx_check_interval(Duration::from_millis(c.retx_check_interval_ms));
        if c.retransmissions {
            config = config.with_retransmissions(c.max_retransmissions);
        }
        if let Some(seed) = self.seed {
            config = config.with_nonce_seed(seed);
        }
        config
    }

    /// Peer configuration for the producer node
    pub fn producer_config(&self) -> PeerConfig {
        let p = &self.producer;
        let mut config = PeerConfig::producer_only(p.prefix.clone())
            .with_postfix(p.postfix.clone())
            .with_payload_size(p.payload_size)
            .with_freshness(Duration::from_millis(p.freshness_ms))
            .with_signature(p.signature);
        if let Some(key_locator) = &p.key_locator {
            config = config.with_key_locator(key_locator.clone());
        }
        config
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn get<T: FromStr>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let var = format!("{ENV_PREFIX}{key}");
        match (self.lookup)(&var) {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidEnv { var, value }),
        }
    }

    fn set<T: FromStr>(&self, key: &str, slot: &mut T) -> Result<(), ConfigError> {
        if let Some(value) = self.get(key)? {
            *slot = value;
        }
        Ok(())
    }
}
