//! Atomic hot-swap indirection for the live router.
//!
//! Reload builds a whole new [`Router`] and publishes it here; in-flight
//! resolutions keep the snapshot they loaded. The chain and registry inside a
//! router are never mutated.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::routing::router::Router;

/// Shared handle to the current router.
#[derive(Debug)]
pub struct RouterHandle {
    current: ArcSwap<Router>,
}

impl RouterHandle {
    pub fn new(router: Router) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// The live router. Callers hold the returned `Arc` for as long as one
    /// resolution needs a consistent view.
    pub fn current(&self) -> Arc<Router> {
        self.current.load_full()
    }

    /// Publish a replacement router. Takes effect for subsequent `current()`
    /// calls; existing snapshots stay valid.
    pub fn install(&self, router: Router) {
        let routes = router.routes().len();
        let queues = router.queues().len();
        self.current.store(Arc::new(router));
        metrics::record_reload();
        tracing::info!(routes, queues, "routing table swapped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::registry::{QueueDescriptor, QueueRegistry};
    use serde_json::{json, Map};
    use std::collections::HashMap;

    #[test]
    fn test_install_swaps_for_subsequent_loads() {
        let handle = RouterHandle::new(Router::new(Vec::new(), QueueRegistry::default()));
        let before = handle.current();
        assert!(before
            .expand_destination(
                Map::from_iter([("queue".to_string(), json!("jobs"))])
            )
            .is_err());

        let mut queues = HashMap::new();
        queues.insert(
            "jobs".to_string(),
            QueueDescriptor {
                exchange: Some("work".to_string()),
                binding_key: Some("jobs".to_string()),
                ..Default::default()
            },
        );
        handle.install(Router::new(Vec::new(), queues));

        let after = handle.current();
        let dest = after
            .expand_destination(Map::from_iter([("queue".to_string(), json!("jobs"))]))
            .unwrap();
        assert_eq!(dest["exchange"], json!("work"));

        // The old snapshot is untouched by the swap.
        assert!(before
            .expand_destination(
                Map::from_iter([("queue".to_string(), json!("jobs"))])
            )
            .is_err());
    }
}
