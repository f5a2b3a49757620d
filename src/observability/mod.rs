//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! session actions / RPC client produce:
//!     → logging.rs (structured log events, one span per action)
//!     → metrics.rs (counters, gauges)
//!     → analytics.rs (process-wide analytics app, initialized once)
//! ```

pub mod analytics;
pub mod logging;
pub mod metrics;
