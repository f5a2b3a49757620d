//! Habit commitment goals minted as NFTs.

pub mod blockchain;
pub mod config;
pub mod error;
pub mod goal;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod session;

pub use config::schema::GritConfig;
pub use error::{GritError, GritResult};
pub use goal::{GoalRecord, GoalRequest, GoalStatus};
pub use http::GritServer;
pub use lifecycle::Shutdown;
pub use session::GoalSession;
