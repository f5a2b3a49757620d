//! Mutual exclusion around user-triggered actions.
//!
//! Only one action (connect, mint, refresh, achieve) may be in flight at a
//! time. A second action is refused immediately with `Busy` rather than
//! queued, so a double submit never sends two transactions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::{GritError, GritResult};

#[derive(Debug, Clone, Default)]
pub struct ActionGuard {
    lock: Arc<Mutex<()>>,
}

impl ActionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard for `action`, or fail with `Busy`.
    pub fn try_begin(&self, action: &'static str) -> GritResult<ActionPermit> {
        let held = self.lock.clone().try_lock_owned().map_err(|_| {
            tracing::warn!(action, "Action refused: another action is in progress");
            GritError::Busy
        })?;

        Ok(ActionPermit {
            _held: held,
            action,
            id: Uuid::new_v4(),
            started: Instant::now(),
        })
    }

    /// Whether an action currently holds the guard.
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

/// Proof that the guard is held; released on drop.
#[derive(Debug)]
pub struct ActionPermit {
    _held: OwnedMutexGuard<()>,
    action: &'static str,
    id: Uuid,
    started: Instant,
}

impl ActionPermit {
    pub fn action(&self) -> &'static str {
        self.action
    }

    /// Correlation id for the action's log span.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
