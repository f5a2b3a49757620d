//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! request
//!     → server.rs (request ID, trace span, timeout)
//!     → handlers.rs (decode body, call GoalSession)
//!     → response.rs (GritError → status + JSON body)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use handlers::AppState;
pub use server::{build_router, GritServer};
