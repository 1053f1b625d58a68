//! Peer error types

use thiserror::Error;

/// Errors raised when constructing a peer
///
/// Packet handlers never fail; only configuration is checked up front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    #[error("Send interval must be greater than zero")]
    ZeroSendInterval,

    #[error("Retransmission check interval must be greater than zero")]
    ZeroRetxCheckInterval,

    #[error("Both consumer and producer roles are disabled")]
    NoRoleEnabled,
}
