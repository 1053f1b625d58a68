//! Node context injection for simulation logging
//!
//! Thread-local storage for the node currently being driven, so every span
//! opened while a node handles an event can be attributed to it.

use std::cell::RefCell;

use icn_core::NodeId;
use uuid::Uuid;

/// Node context stored in thread-local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeContextData {
    pub node: NodeId,
    /// Unique id of this simulation run
    pub run_id: Uuid,
}

thread_local! {
    static NODE_CONTEXT: RefCell<Option<NodeContextData>> = const { RefCell::new(None) };
}

/// RAII guard for node context
///
/// Sets the node for the current thread and restores the previous one when
/// dropped, so guards nest.
///
/// ```ignore
/// let _guard = NodeContextGuard::new(NodeId(3), run_id);
/// tracing::info!("handling Interest"); // attributed to node3
/// ```
#[derive(Debug)]
pub struct NodeContextGuard {
    previous: Option<NodeContextData>,
}

impl NodeContextGuard {
    pub fn new(node: NodeId, run_id: Uuid) -> Self {
        let previous = NODE_CONTEXT.with(|ctx| ctx.borrow_mut().replace(NodeContextData { node, run_id }));
        Self { previous }
    }

    /// Current node context (if any)
    pub fn current() -> Option<NodeContextData> {
        NODE_CONTEXT.with(|ctx| ctx.borrow().clone())
    }

    pub fn current_node() -> Option<NodeId> {
        Self::current().map(|ctx| ctx.node)
    }
}

impl Drop for NodeContextGuard {
    fn drop(&mut self) {
        NODE_CONTEXT.with(|ctx| *ctx.borrow_mut() = self.previous.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_context_guard() {
        assert!(NodeContextGuard::current().is_none());

        let run_id = Uuid::new_v4();
        {
            let _guard = NodeContextGuard::new(NodeId(1), run_id);
            let ctx = NodeContextGuard::current().unwrap();
            assert_eq!(ctx.node, NodeId(1));
            assert_eq!(ctx.run_id, run_id);
        }

        assert!(NodeContextGuard::current().is_none());
    }

    #[test]
    fn test_nested_contexts() {
        let run_id = Uuid::new_v4();
        {
            let _a = NodeContextGuard::new(NodeId(0), run_id);
            {
                let _b = NodeContextGuard::new(NodeId(1), run_id);
                assert_eq!(NodeContextGuard::current_node(), Some(NodeId(1)));
            }
            assert_eq!(NodeContextGuard::current_node(), Some(NodeId(0)));
        }
        assert!(NodeContextGuard::current_node().is_none());
    }
}
