//! View state: the connected account and its goals.
//!
//! Both values are swapped atomically as a whole. Readers get a consistent
//! `Arc` snapshot that later refreshes never mutate.

use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::{ArcSwap, ArcSwapOption};

use crate::goal::GoalRecord;

#[derive(Debug, Default)]
pub struct ViewState {
    account: ArcSwapOption<Address>,
    goals: ArcSwap<Vec<GoalRecord>>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self) -> Option<Address> {
        self.account.load().as_deref().copied()
    }

    pub fn set_account(&self, account: Option<Address>) {
        self.account.store(account.map(Arc::new));
    }

    pub fn goals(&self) -> Arc<Vec<GoalRecord>> {
        self.goals.load_full()
    }

    /// Replace the whole goal collection.
    pub fn replace_goals(&self, goals: Vec<GoalRecord>) {
        self.goals.store(Arc::new(goals));
    }

    pub fn find_goal(&self, token_id: u64) -> Option<GoalRecord> {
        self.goals
            .load()
            .iter()
            .find(|g| g.token_id() == Some(token_id))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{RawGoalMetadata, WideInt};

    fn record(id: u64) -> GoalRecord {
        let raw = RawGoalMetadata {
            name: Some(format!("goal {id}")),
            description: Some("d".into()),
            image_svg: Some(String::new()),
            created_at: Some(WideInt::Unsigned(1)),
            due_date: Some(WideInt::Unsigned(2)),
            achieved_at: Some(WideInt::Unsigned(0)),
        };
        GoalRecord::from_external_response(&raw, id).unwrap()
    }

    #[test]
    fn test_replace_does_not_touch_old_snapshot() {
        let state = ViewState::new();
        state.replace_goals(vec![record(1), record(2)]);
        let before = state.goals();

        state.replace_goals(vec![record(3)]);
        assert_eq!(before.len(), 2);
        assert_eq!(state.goals().len(), 1);
        assert!(state.find_goal(1).is_none());
        assert_eq!(state.find_goal(3).unwrap().token_id(), Some(3));
    }

    #[test]
    fn test_account() {
        let state = ViewState::new();
        assert_eq!(state.account(), None);
        state.set_account(Some(Address::ZERO));
        assert_eq!(state.account(), Some(Address::ZERO));
        state.set_account(None);
        assert_eq!(state.account(), None);
    }
}
