//! Simulation error types

use std::path::PathBuf;

use icn_core::NodeId;
use icn_peer::PeerError;
use thiserror::Error;

/// Errors loading a scenario configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: String, value: String },
}

/// Errors building or running a simulation
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("No peer installed on {0}")]
    NoPeer(NodeId),

    #[error("{0} already runs a peer")]
    PeerExists(NodeId),

    #[error("Peer rejected: {0}")]
    Peer(#[from] PeerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type SimResult<T> = Result<T, SimError>;
