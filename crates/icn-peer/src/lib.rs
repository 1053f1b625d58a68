//! # ICN Peer
//!
//! One participant in an Interest/Data exchange that acts as a consumer and
//! a producer at the same time.
//!
//! The peer owns no clock, socket or event loop. The host drives it:
//!
//! - timers armed through [`Scheduler`] come back as [`Peer::on_timer`]
//! - packets addressed to the peer arrive through [`Responder::on_interest`]
//!   and [`Peer::on_data`]
//! - outgoing packets leave through [`Transport`]
//!
//! ## Roles
//!
//! - **Consumer** ([`Emitter`]): emits one Interest per tick under
//!   `interest_name/<seq>` and tracks outstanding requests until the matching
//!   Data arrives, feeding round-trip samples into an [`RttEstimator`].
//! - **Producer** ([`Responder`]): answers any Interest with a Data packet of
//!   `payload_size` bytes carrying a placeholder signature.
//!
//! Either role can be disabled in [`PeerConfig`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use icn_peer::{FaceId, NodeId, Peer, PeerConfig, PeerTimer};
//!
//! let config = PeerConfig::default().with_interest_name("/a".parse()?);
//! let mut peer = Peer::new(NodeId(0), FaceId(0), config)?;
//! peer.start(&mut host);
//! // host fires PeerTimer::SendInterest after one second
//! peer.on_timer(PeerTimer::SendInterest, &mut host);
//! ```

pub mod config;
pub mod consumer;
pub mod error;
pub mod gate;
pub mod host;
pub mod naming;
pub mod observer;
pub mod peer;
pub mod producer;
pub mod rtt;
pub mod timer;
pub mod tracker;

pub use config::PeerConfig;
pub use consumer::ConsumerRole;
pub use error::PeerError;
pub use gate::ActivityGate;
pub use host::{PeerHost, RouteRegistrar, Scheduler, Transport};
pub use icn_core::{FaceId, NodeId};
pub use naming::NameBuilder;
pub use observer::{ObservedEvent, PeerObserver, RecordingObserver};
pub use peer::{Emitter, Peer, Responder};
pub use producer::ProducerRole;
pub use rtt::RttEstimator;
pub use timer::{PeerTimer, TimerHandle};
pub use tracker::{OutstandingRequest, ResponseTracker, RttSample};
