//! Mint request built from user input.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{GritError, GritResult};

/// Goal the user wants to mint, before any transaction is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRequest {
    name: String,
    description: String,
    due_date: u64,
}

impl GoalRequest {
    /// Create a request with an explicit due timestamp (seconds).
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        due_date: u64,
    ) -> GritResult<Self> {
        let name = name.into();
        let description = description.into();

        if name.trim().is_empty() {
            return Err(GritError::InvalidRequest("goal name is required".into()));
        }
        if description.trim().is_empty() {
            return Err(GritError::InvalidRequest(
                "goal description is required".into(),
            ));
        }

        Ok(Self {
            name,
            description,
            due_date,
        })
    }

    /// Create a request from a `YYYY-MM-DD` date, taken as midnight UTC.
    pub fn from_calendar_date(
        name: impl Into<String>,
        description: impl Into<String>,
        date: &str,
    ) -> GritResult<Self> {
        let due_date = parse_calendar_date(date)?;
        Self::new(name, description, due_date)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> u64 {
        self.due_date
    }
}

/// Parse `YYYY-MM-DD` into the Unix timestamp of that day's UTC midnight.
pub fn parse_calendar_date(date: &str) -> GritResult<u64> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
        GritError::InvalidRequest(format!("invalid due date '{}': {}", date, e))
    })?;

    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| GritError::InvalidRequest(format!("invalid due date '{}'", date)))?
        .and_utc()
        .timestamp();

    u64::try_from(midnight).map_err(|_| {
        GritError::InvalidRequest(format!("due date '{}' is before 1970-01-01", date))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_date() {
        let request =
            GoalRequest::from_calendar_date("Lose 5kg", "diet", "2023-11-15").unwrap();
        assert_eq!(request.due_date(), 1_700_006_400);
        assert_eq!(request.name(), "Lose 5kg");
    }

    #[test]
    fn test_rejects_blank_fields() {
        assert!(matches!(
            GoalRequest::new("  ", "diet", 1),
            Err(GritError::InvalidRequest(_))
        ));
        assert!(matches!(
            GoalRequest::new("Lose 5kg", "", 1),
            Err(GritError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_rejects_bad_dates() {
        for bad in ["", "2023-13-01", "2023/11/15", "1969-12-31", "tomorrow"] {
            assert!(
                parse_calendar_date(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(parse_calendar_date("1970-01-01").unwrap(), 0);
    }
}
