//! Route preparation: raw configuration entries → ordered route chain.
//!
//! Raw entries come in three shapes: a task→destination table, a string
//! reference to a registered policy, or a policy object handed in directly.
//! Preparation collapses them into the closed [`Route`] variant set once, in
//! input order; that order is the chain priority at dispatch time.
//!
//! Unknown references fail here, so a bad configuration is rejected at
//! startup instead of on the first matching dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::error::PrepareError;
use crate::routing::route::{DestinationSpec, MapRoute, PolicyRegistry, Route, RoutePolicy};

/// A raw route entry, before preparation.
#[derive(Debug, Clone)]
pub enum RawRoute {
    /// Task identifier → destination spec table.
    Table(HashMap<String, DestinationSpec>),
    /// Name of a policy registered in the [`PolicyRegistry`].
    Reference(String),
    /// A policy object, passed through unchanged.
    Policy(Arc<dyn RoutePolicy>),
}

impl From<HashMap<String, DestinationSpec>> for RawRoute {
    fn from(table: HashMap<String, DestinationSpec>) -> Self {
        RawRoute::Table(table)
    }
}

impl From<&str> for RawRoute {
    fn from(reference: &str) -> Self {
        RawRoute::Reference(reference.to_string())
    }
}

impl From<String> for RawRoute {
    fn from(reference: String) -> Self {
        RawRoute::Reference(reference)
    }
}

impl From<Arc<dyn RoutePolicy>> for RawRoute {
    fn from(policy: Arc<dyn RoutePolicy>) -> Self {
        RawRoute::Policy(policy)
    }
}

/// An ordered sequence of raw entries. A single entry converts to a
/// one-element sequence, so callers can pass one route without wrapping it.
#[derive(Debug, Clone, Default)]
pub struct RawRoutes(pub Vec<RawRoute>);

impl From<Vec<RawRoute>> for RawRoutes {
    fn from(entries: Vec<RawRoute>) -> Self {
        RawRoutes(entries)
    }
}

impl From<RawRoute> for RawRoutes {
    fn from(entry: RawRoute) -> Self {
        RawRoutes(vec![entry])
    }
}

impl From<HashMap<String, DestinationSpec>> for RawRoutes {
    fn from(table: HashMap<String, DestinationSpec>) -> Self {
        RawRoutes(vec![RawRoute::Table(table)])
    }
}

impl From<&str> for RawRoutes {
    fn from(reference: &str) -> Self {
        RawRoutes(vec![RawRoute::Reference(reference.to_string())])
    }
}

impl FromIterator<RawRoute> for RawRoutes {
    fn from_iter<I: IntoIterator<Item = RawRoute>>(iter: I) -> Self {
        RawRoutes(iter.into_iter().collect())
    }
}

/// Normalize raw entries into the ordered route chain.
///
/// Ordering is preserved exactly; references are resolved against
/// `policies`, with deferred registrations staying unbuilt until first use.
pub fn prepare(
    raw: impl Into<RawRoutes>,
    policies: &PolicyRegistry,
) -> Result<Vec<Route>, PrepareError> {
    let RawRoutes(entries) = raw.into();
    let mut routes = Vec::with_capacity(entries.len());
    for entry in entries {
        routes.push(match entry {
            RawRoute::Table(table) => Route::Map(MapRoute::new(table)),
            RawRoute::Reference(name) => policies
                .route_for(&name)
                .ok_or(PrepareError::UnknownReference(name))?,
            RawRoute::Policy(policy) => Route::Opaque(policy),
        });
    }
    Ok(routes)
}
