//! Routing error definitions.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while resolving a destination.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A destination referenced a queue name missing from the registry.
    #[error("queue {0:?} is not defined in the queue registry")]
    QueueNotFound(String),

    /// A destination carried a `queue` value that is not a string.
    #[error("queue reference must be a string, got {0}")]
    InvalidQueueName(Value),
}

/// Errors that can occur while preparing the route chain.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// A route entry referenced a policy name that is not registered.
    #[error("route policy {0:?} is not registered")]
    UnknownReference(String),
}

/// Result type for resolution operations.
pub type RouteResult<T> = Result<T, RouteError>;
