//! Task Routing Resolver Library
//!
//! Maps a task identifier plus caller-supplied publish options to a concrete
//! message-broker destination (exchange, exchange type, routing key, extras).
//!
//! # Architecture Overview
//!
//! ```text
//! configuration (TOML / programmatic)
//!     → config   (load, validate, watch)
//!     → routing  (prepare chain, freeze Router, resolve per dispatch)
//!     → ResolvedDestination handed to the publish pipeline
//! ```
//!
//! Transport, broker connections, and payload encoding are collaborators of
//! the publish pipeline, not part of this crate.

pub mod config;
pub mod observability;
pub mod routing;

pub use config::{load_config, ConfigError, RouterConfig};
pub use routing::{
    prepare, DestinationSpec, MapRoute, PolicyRegistry, PrepareError, QueueDescriptor,
    QueueRegistry, RawRoute, ResolvedDestination, Route, RouteError, RoutePolicy, Router,
    RouterHandle,
};
