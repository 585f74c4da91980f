//! Destination resolution.
//!
//! # Responsibilities
//! - Walk the prepared route chain, first match wins
//! - Merge caller options with the matched destination spec
//! - Expand shorthand queue references into full broker parameters
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Chain matching consults static tables only; opaque units pass through
//! - Explicit no-match falls back to the caller's options, never an error
//! - A null field is "no opinion": it never overrides a concrete value from
//!   a lower-precedence source, but survives pass-through untouched

use serde_json::{Map, Value};

use crate::config::schema::RouterConfig;
use crate::observability::metrics;
use crate::routing::error::{PrepareError, RouteError, RouteResult};
use crate::routing::prepare::prepare;
use crate::routing::registry::{QueueDescriptor, QueueRegistry};
use crate::routing::route::{DestinationSpec, PolicyRegistry, ResolvedDestination, Route};

/// Resolves task identifiers to broker destinations.
///
/// Holds an ordered route chain and a queue registry snapshot, both frozen at
/// construction. Concurrent callers can share a `Router` freely; every call
/// allocates its own result.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    queues: QueueRegistry,
    create_missing: bool,
    default_exchange_type: String,
}

impl Router {
    /// Create a router over a prepared chain and registry snapshot.
    pub fn new(routes: Vec<Route>, queues: impl Into<QueueRegistry>) -> Self {
        Self {
            routes,
            queues: queues.into(),
            create_missing: false,
            default_exchange_type: "direct".to_string(),
        }
    }

    /// Allow auto-provisioning a destination for unregistered queue names.
    pub fn create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }

    /// Exchange type used for auto-provisioned destinations.
    pub fn default_exchange_type(mut self, exchange_type: impl Into<String>) -> Self {
        self.default_exchange_type = exchange_type.into();
        self
    }

    /// Build a router from a loaded configuration.
    ///
    /// Reference entries resolve against `policies`; unknown names fail here,
    /// at startup.
    pub fn from_config(
        config: &RouterConfig,
        policies: &PolicyRegistry,
    ) -> Result<Self, PrepareError> {
        let routes = prepare(config.raw_routes(), policies)?;
        Ok(Router::new(routes, config.queues.clone())
            .create_missing(config.create_missing)
            .default_exchange_type(config.default_exchange_type.clone()))
    }

    /// The prepared route chain, in priority order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The queue registry snapshot.
    pub fn queues(&self) -> &QueueRegistry {
        &self.queues
    }

    /// Resolve the destination for one task dispatch.
    ///
    /// The first static table answering for `task` wins; later entries are
    /// never consulted. Without a match the caller's options stand alone, so
    /// an empty chain and no `queue` key hand back `options` unchanged.
    pub fn route(
        &self,
        options: DestinationSpec,
        task: &str,
        args: &[Value],
        kwargs: &Map<String, Value>,
    ) -> RouteResult<ResolvedDestination> {
        let matched = self.lookup_route(task, args, kwargs);
        metrics::record_resolution(matched.is_some());
        let merged = match matched {
            Some(spec) => {
                tracing::debug!(task, "route chain matched");
                merge_explicit(options, spec.clone())
            }
            None => {
                tracing::trace!(task, "no route matched, using caller options");
                options
            }
        };
        self.expand_destination(merged)
    }

    /// Replace a shorthand `queue` reference with the queue's parameters.
    ///
    /// Fields already present in `spec` win over registry-derived ones unless
    /// they are null. The `queue` key never survives expansion. A spec
    /// without a `queue` key is already fully specified and passes through
    /// unchanged.
    pub fn expand_destination(&self, mut spec: DestinationSpec) -> RouteResult<ResolvedDestination> {
        let queue = match spec.remove("queue") {
            None => return Ok(spec),
            Some(Value::Null) => return Ok(spec),
            Some(Value::String(name)) if name.is_empty() => return Ok(spec),
            Some(Value::String(name)) => name,
            Some(other) => return Err(RouteError::InvalidQueueName(other)),
        };

        let fields = match self.queues.lookup(&queue) {
            Some(descriptor) => descriptor.fields(),
            None if self.create_missing => {
                tracing::debug!(queue = %queue, "auto-provisioning destination for unregistered queue");
                QueueDescriptor::synthesized(&queue, &self.default_exchange_type).fields()
            }
            None => {
                metrics::record_queue_not_found();
                return Err(RouteError::QueueNotFound(queue));
            }
        };
        Ok(merge_explicit(fields, spec))
    }

    fn lookup_route(
        &self,
        task: &str,
        _args: &[Value],
        _kwargs: &Map<String, Value>,
    ) -> Option<&DestinationSpec> {
        self.routes
            .iter()
            .filter_map(|route| route.as_map())
            .find_map(|map| map.route_for_task(task))
    }
}

/// Overlay `explicit` onto `base`.
///
/// Non-null explicit values replace the base value; null explicit values are
/// carried only where the base has no opinion. This keeps publish flags like
/// `immediate = false` intact while letting `exchange = null` pick up the
/// queue's exchange.
fn merge_explicit(base: Map<String, Value>, explicit: Map<String, Value>) -> Map<String, Value> {
    let mut merged = base;
    for (key, value) in explicit {
        if value.is_null() {
            merged.entry(key).or_insert(Value::Null);
        } else {
            merged.insert(key, value);
        }
    }
    merged
}
