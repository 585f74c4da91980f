//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Resolution path produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging with field syntax for machine parsing
//! - Metrics are cheap (facade counters, no-ops without a recorder)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
