//! Node and face identifiers

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifier of a node in the network
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display("node{_0}")]
pub struct NodeId(pub u32);

/// Identifier of a face (an attachment point for packets) on a node
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[display("face{_0}")]
pub struct FaceId(pub u32);
