//! Goal domain: the normalized record of a minted goal token.
//!
//! # Data Flow
//! ```text
//! user input → request.rs (GoalRequest, pending mint)
//! getMetadatas entry → raw.rs (RawGoalMetadata, lossless numeric decode)
//!     → record.rs (GoalRecord + derived status)
//!     → view.rs (GoalView for CLI / HTTP output)
//! ```
//!
//! Derived states are evaluated against a [`TimeSource`] so callers can pin
//! the clock.

pub mod clock;
pub mod raw;
pub mod record;
pub mod request;
pub mod view;

pub use clock::{FixedTimeSource, SystemTimeSource, TimeSource};
pub use raw::{decode_token_id, DecodeError, RawGoalMetadata, WideInt};
pub use record::{GoalRecord, GoalStatus, TokenRef, DEFAULT_DATE_FORMAT};
pub use request::GoalRequest;
pub use view::GoalView;
