//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Task dispatch (task id, publish options, payload)
//!     → router.rs (chain walk, merge, queue expansion)
//!     → registry.rs (queue name → broker descriptor)
//!     → Return: ResolvedDestination or QueueNotFound
//!
//! Chain compilation (at startup / reload):
//!     raw entries (tables, references, policy objects)
//!     → prepare.rs (normalize to Route variants, resolve references)
//!     → Freeze as immutable Router
//!     → handle.rs (atomic swap on reload)
//! ```
//!
//! # Design Decisions
//! - Chain compiled once, immutable at runtime
//! - Deterministic: same task id always resolves the same way
//! - First match wins (chain order is priority)
//! - No-match is an answer, not an error

pub mod error;
pub mod handle;
pub mod prepare;
pub mod registry;
pub mod route;
pub mod router;

pub use error::{PrepareError, RouteError, RouteResult};
pub use handle::RouterHandle;
pub use prepare::{prepare, RawRoute, RawRoutes};
pub use registry::{QueueDescriptor, QueueRegistry};
pub use route::{
    DestinationSpec, ExternalRoute, MapRoute, PolicyFactory, PolicyRegistry, ResolvedDestination,
    Route, RoutePolicy,
};
pub use router::Router;
