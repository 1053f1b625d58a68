//! # ICN Core
//!
//! Packet model shared by every part of the ICN peer stack.
//!
//! Nothing in this crate performs I/O or keeps time on its own. The peer
//! logic in `icn-peer` builds packets with these types and hands them to
//! whatever transport and scheduler the host provides.
//!
//! ## Key Types
//!
//! - [`Name`] / [`Component`]: hierarchical content names
//! - [`Interest`]: a named request carrying a nonce and a lifetime
//! - [`Data`]: a named reply carrying content, freshness and signature metadata
//! - [`PacketTags`]: link-layer annotations such as the hop count
//! - [`SimTime`]: simulated monotonic time
//! - [`NodeId`] / [`FaceId`]: where packets come from and go to

pub mod error;
pub mod identity;
pub mod name;
pub mod packet;
pub mod tags;
pub mod time;
pub mod tlv;

// Re-export main types
pub use error::*;
pub use identity::*;
pub use name::*;
pub use packet::*;
pub use tags::*;
pub use time::*;
