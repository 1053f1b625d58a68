//! Custom tracing layers

use tracing::{Subscriber, span};
use tracing_subscriber::{
    layer::{Context, Layer},
    registry::LookupSpan,
};

use crate::context::{NodeContextData, NodeContextGuard};

/// Layer that tags new spans with the active node context
///
/// Spans opened while a [`NodeContextGuard`] is alive carry a
/// [`NodeContextExtension`] that later layers can read.
#[derive(Debug, Default)]
pub struct NodeContextLayer;

impl NodeContextLayer {
    pub fn new() -> Self {
        Self
    }
}

/// Extension data stored on spans
#[derive(Debug, Clone)]
pub struct NodeContextExtension {
    pub data: NodeContextData,
}

impl<S> Layer<S> for NodeContextLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, _attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        if let Some(node_ctx) = NodeContextGuard::current() {
            span.extensions_mut()
                .insert(NodeContextExtension { data: node_ctx });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use icn_core::NodeId;
    use tracing_subscriber::{Registry, layer::SubscriberExt};
    use uuid::Uuid;

    use super::*;

    /// Records the node attached to every entered span
    #[derive(Clone, Default)]
    struct Probe {
        seen: Arc<Mutex<Vec<Option<NodeId>>>>,
    }

    impl<S> Layer<S> for Probe
    where
        S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    {
        fn on_enter(&self, id: &span::Id, ctx: Context<'_, S>) {
            let node = ctx.span(id).and_then(|span| {
                span.extensions()
                    .get::<NodeContextExtension>()
                    .map(|ext| ext.data.node)
            });
            self.seen.lock().unwrap().push(node);
        }
    }

    #[test]
    fn test_spans_carry_node() {
        let probe = Probe::default();
        let subscriber = Registry::default()
            .with(NodeContextLayer::new())
            .with(probe.clone());

        tracing::subscriber::with_default(subscriber, || {
            {
                let _guard = NodeContextGuard::new(NodeId(4), Uuid::new_v4());
                let _span = tracing::info_span!("handle").entered();
            }
            let _span = tracing::info_span!("idle").entered();
        });

        assert_eq!(*probe.seen.lock().unwrap(), vec![Some(NodeId(4)), None]);
    }
}
