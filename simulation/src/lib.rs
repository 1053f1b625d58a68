//! # ICN Simulation
//!
//! A discrete-event harness that runs [`icn_peer::Peer`]s over simulated
//! links so the Interest/Data exchange can be observed end to end.
//!
//! ## Architecture
//!
//! - **Queue** (`queue.rs`): time-ordered events; cancelled timers are skipped
//! - **Forwarder** (`forwarder.rs`): per-node FIB, PIT and link faces
//! - **Host** (`host.rs`): the scheduler/transport/registrar a peer sees
//! - **Simulation** (`simulation.rs`): node table and event dispatch
//! - **Config** (`config.rs`): TOML scenarios with `ICNSIM_*` overrides
//!
//! ## Example
//!
//! ```rust,ignore
//! use icn_simulation::*;
//!
//! let config = ScenarioConfig::default();
//! let mut sim = Simulation::two_node(
//!     config.consumer_config(),
//!     config.producer_config(),
//!     config.link_delay(),
//! )?;
//! let stats = sim.run_until(config.duration());
//! println!("mean RTT: {:?}", stats.mean_rtt());
//! ```

pub mod config;
pub mod error;
pub mod forwarder;
pub mod host;
pub mod queue;
pub mod simulation;
pub mod stats;

pub use config::{ConsumerSection, ProducerSection, ScenarioConfig};
pub use error::{ConfigError, SimError, SimResult};
pub use forwarder::{APP_FACE, Forwarder, Link, Route};
pub use host::{NodeHost, SimEvent};
pub use queue::EventQueue;
pub use simulation::Simulation;
pub use stats::{SimStats, StatsObserver};
