//! Route variants: the resolution units the router walks.
//!
//! # Responsibilities
//! - Match a task identifier against a static table (`MapRoute`)
//! - Carry externally supplied routing strategies (`RoutePolicy`)
//! - Materialize referenced policies lazily, at most once (`ExternalRoute`)
//!
//! # Design Decisions
//! - Heterogeneous configuration collapses to one closed variant set at
//!   preparation time; dispatch matches on `Route`, never on raw shapes
//! - Policy references resolve through an explicit registry, no ambient lookup
//! - A route that declines to answer returns `None`; that is not an error

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};

/// Partial or complete broker parameters, possibly holding a shorthand
/// `queue` reference.
pub type DestinationSpec = Map<String, Value>;

/// The merged mapping handed back to the publish path. Created fresh per
/// resolution call.
pub type ResolvedDestination = Map<String, Value>;

/// An externally supplied routing strategy.
///
/// `args`/`kwargs` are the task invocation payload, passed through so a
/// strategy can inspect them; the built-in `MapRoute` ignores both.
pub trait RoutePolicy: Send + Sync + fmt::Debug {
    /// Return the destination for `task`, or `None` to decline.
    fn route_for_task(
        &self,
        task: &str,
        args: &[Value],
        kwargs: &Map<String, Value>,
    ) -> Option<DestinationSpec>;
}

/// Static table mapping task identifiers to destination specs.
#[derive(Debug, Clone, Default)]
pub struct MapRoute {
    table: HashMap<String, DestinationSpec>,
}

impl MapRoute {
    pub fn new(table: HashMap<String, DestinationSpec>) -> Self {
        Self { table }
    }

    /// Exact-match lookup. `None` means "try the next route in the chain".
    pub fn route_for_task(&self, task: &str) -> Option<&DestinationSpec> {
        self.table.get(task)
    }

    /// Task identifiers this table answers for.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(|task| task.as_str())
    }
}

impl RoutePolicy for MapRoute {
    fn route_for_task(
        &self,
        task: &str,
        _args: &[Value],
        _kwargs: &Map<String, Value>,
    ) -> Option<DestinationSpec> {
        MapRoute::route_for_task(self, task).cloned()
    }
}

/// Factory producing a policy on demand.
pub type PolicyFactory = Arc<dyn Fn() -> Arc<dyn RoutePolicy> + Send + Sync>;

/// A named policy reference, materialized on first use and memoized.
pub struct ExternalRoute {
    name: String,
    factory: PolicyFactory,
    resolved: OnceLock<Arc<dyn RoutePolicy>>,
}

impl ExternalRoute {
    pub fn new(name: impl Into<String>, factory: PolicyFactory) -> Self {
        Self {
            name: name.into(),
            factory,
            resolved: OnceLock::new(),
        }
    }

    /// The reference name this route was prepared from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Materialize the referenced policy. Runs the factory at most once.
    pub fn resolve(&self) -> &Arc<dyn RoutePolicy> {
        self.resolved.get_or_init(|| (self.factory)())
    }

    /// Whether the reference has been materialized yet.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

impl fmt::Debug for ExternalRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalRoute")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// A resolution unit in the prepared chain.
#[derive(Debug)]
pub enum Route {
    /// Static task table; the only variant the built-in router matches on.
    Map(MapRoute),
    /// Referenced policy, materialized lazily.
    External(ExternalRoute),
    /// Caller-supplied unit, passed through unchanged and never introspected.
    Opaque(Arc<dyn RoutePolicy>),
}

impl Route {
    pub fn as_map(&self) -> Option<&MapRoute> {
        match self {
            Route::Map(map) => Some(map),
            _ => None,
        }
    }
}

enum PolicyEntry {
    Ready(Arc<dyn RoutePolicy>),
    Deferred(PolicyFactory),
}

/// Explicit name → policy table consulted when preparing reference entries.
///
/// Policies registered ready-made are handed out as-is; policies registered
/// through a factory stay unbuilt until a prepared route first needs them.
#[derive(Default)]
pub struct PolicyRegistry {
    entries: HashMap<String, PolicyEntry>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready policy under `name`.
    pub fn register(&mut self, name: impl Into<String>, policy: Arc<dyn RoutePolicy>) {
        self.entries.insert(name.into(), PolicyEntry::Ready(policy));
    }

    /// Register a factory built on first use.
    pub fn register_deferred<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn RoutePolicy> + Send + Sync + 'static,
    {
        self.entries
            .insert(name.into(), PolicyEntry::Deferred(Arc::new(factory)));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Resolve `name` into a route, or `None` if unregistered.
    pub(crate) fn route_for(&self, name: &str) -> Option<Route> {
        match self.entries.get(name)? {
            PolicyEntry::Ready(policy) => Some(Route::Opaque(Arc::clone(policy))),
            PolicyEntry::Deferred(factory) => {
                Some(Route::External(ExternalRoute::new(name, Arc::clone(factory))))
            }
        }
    }
}

impl fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyRegistry")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
