//! Serializable snapshot of a goal for display.

use chrono::Local;
use serde::Serialize;

use crate::goal::record::{GoalRecord, GoalStatus};

/// A goal record with its derived state resolved at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalView {
    pub token_id: Option<u64>,
    pub name: String,
    pub description: String,
    pub image: String,
    pub created_at: Option<u64>,
    pub due_date: u64,
    pub due_date_display: String,
    pub achieved_at: Option<u64>,
    pub status: GoalStatus,
    /// Whether the achieve action is still offered.
    pub can_achieve: bool,
}

impl GoalView {
    pub fn new(record: &GoalRecord, now: u64, date_format: &str) -> Self {
        Self {
            token_id: record.token_id(),
            name: record.name().to_string(),
            description: record.description().to_string(),
            image: record.image().to_string(),
            created_at: record.created_at(),
            due_date: record.due_date(),
            due_date_display: record.formatted_due_date_in(&Local, date_format),
            achieved_at: record.achieved_at(),
            status: record.status_at(now),
            can_achieve: record.token_id().is_some() && !record.is_achieved(),
        }
    }

    pub fn from_records(records: &[GoalRecord], now: u64, date_format: &str) -> Vec<Self> {
        records
            .iter()
            .map(|record| Self::new(record, now, date_format))
            .collect()
    }
}
