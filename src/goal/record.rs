//! Goal record value object.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::goal::clock::{SystemTimeSource, TimeSource};
use crate::goal::raw::{DecodeError, RawGoalMetadata};
use crate::goal::request::GoalRequest;

/// Date format used when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

/// Identity of a goal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum TokenRef {
    /// Mint request not yet submitted or confirmed.
    Pending,
    /// Minted token with its on-chain id.
    Confirmed(u64),
}

impl TokenRef {
    pub fn id(&self) -> Option<u64> {
        match self {
            TokenRef::Pending => None,
            TokenRef::Confirmed(id) => Some(*id),
        }
    }
}

/// Derived display state. Exactly one holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "Achieved")]
    Achieved,
    #[serde(rename = "Expired")]
    Expired,
    #[serde(rename = "In Progress")]
    InProgress,
}

impl GoalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GoalStatus::Achieved => "Achieved",
            GoalStatus::Expired => "Expired",
            GoalStatus::InProgress => "In Progress",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Client-side view of one goal token.
///
/// Records are immutable: a state change on-chain is observed by fetching
/// the owner's goals again and replacing the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalRecord {
    token: TokenRef,
    name: String,
    description: String,
    image: String,
    created_at: Option<u64>,
    due_date: u64,
    achieved_at: Option<u64>,
}

impl GoalRecord {
    /// Build the record for a mint request that has not been sent yet.
    pub fn pending(request: &GoalRequest) -> Self {
        Self {
            token: TokenRef::Pending,
            name: request.name().to_string(),
            description: request.description().to_string(),
            image: String::new(),
            created_at: None,
            due_date: request.due_date(),
            achieved_at: None,
        }
    }

    /// Normalize one `getMetadatas` entry for `token_id`.
    ///
    /// Timestamps must convert to `u64` without loss. A raw `achievedAt` of
    /// zero means the goal is not achieved.
    pub fn from_external_response(
        raw: &RawGoalMetadata,
        token_id: u64,
    ) -> Result<Self, DecodeError> {
        let created_at = RawGoalMetadata::required_u64(&raw.created_at, "createdAt")?;
        let due_date = RawGoalMetadata::required_u64(&raw.due_date, "dueDate")?;
        let achieved_at = RawGoalMetadata::required_u64(&raw.achieved_at, "achievedAt")?;

        Ok(Self {
            token: TokenRef::Confirmed(token_id),
            name: RawGoalMetadata::required_text(&raw.name, "name")?,
            description: RawGoalMetadata::required_text(&raw.description, "description")?,
            image: RawGoalMetadata::required_text(&raw.image_svg, "imageSVG")?,
            created_at: Some(created_at),
            due_date,
            achieved_at: (achieved_at > 0).then_some(achieved_at),
        })
    }

    pub fn token(&self) -> TokenRef {
        self.token
    }

    pub fn token_id(&self) -> Option<u64> {
        self.token.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// SVG payload or URI rendered by the contract.
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn created_at(&self) -> Option<u64> {
        self.created_at
    }

    pub fn due_date(&self) -> u64 {
        self.due_date
    }

    pub fn achieved_at(&self) -> Option<u64> {
        self.achieved_at
    }

    pub fn is_achieved(&self) -> bool {
        self.achieved_at.is_some()
    }

    /// Due date strictly before `now`.
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.due_date < now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTimeSource.now())
    }

    /// Achieved wins over expired, expired wins over in progress.
    pub fn status_at(&self, now: u64) -> GoalStatus {
        if self.is_achieved() {
            GoalStatus::Achieved
        } else if self.is_expired_at(now) {
            GoalStatus::Expired
        } else {
            GoalStatus::InProgress
        }
    }

    pub fn status_label(&self) -> &'static str {
        self.status_at(SystemTimeSource.now()).label()
    }

    /// Due date as a calendar date in the local timezone.
    pub fn formatted_due_date(&self) -> String {
        self.formatted_due_date_in(&Local, DEFAULT_DATE_FORMAT)
    }

    /// Due date rendered in `tz` with a strftime `format`.
    ///
    /// An invalid format falls back to [`DEFAULT_DATE_FORMAT`]; a timestamp
    /// outside the calendar range is rendered as raw seconds.
    pub fn formatted_due_date_in<Tz>(&self, tz: &Tz, format: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let format = if is_valid_date_format(format) {
            format
        } else {
            DEFAULT_DATE_FORMAT
        };

        i64::try_from(self.due_date)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|utc| utc.with_timezone(tz).format(format).to_string())
            .unwrap_or_else(|| self.due_date.to_string())
    }
}

/// True when `format` parses as a strftime pattern chrono can render.
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::raw::WideInt;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    const CREATED: u64 = 1_700_000_000;
    const DUE: u64 = 1_700_003_600;

    fn raw(achieved_at: u64) -> RawGoalMetadata {
        RawGoalMetadata {
            name: Some("Lose 5kg".into()),
            description: Some("diet".into()),
            image_svg: Some("<svg/>".into()),
            created_at: Some(WideInt::Unsigned(CREATED)),
            due_date: Some(WideInt::Unsigned(DUE)),
            achieved_at: Some(WideInt::Unsigned(achieved_at)),
        }
    }

    #[test]
    fn test_expired_scenario() {
        let record = GoalRecord::from_external_response(&raw(0), 7).unwrap();
        assert_eq!(record.token_id(), Some(7));
        assert!(!record.is_achieved());
        assert!(record.is_expired_at(1_700_003_700));
        assert_eq!(record.status_at(1_700_003_700), GoalStatus::Expired);
        assert_eq!(record.status_at(1_700_003_700).label(), "Expired");
    }

    #[test]
    fn test_achieved_after_due_date() {
        let record = GoalRecord::from_external_response(&raw(1_700_003_650), 7).unwrap();
        assert!(record.is_achieved());
        assert!(record.is_expired_at(1_700_003_700));
        assert_eq!(record.status_at(1_700_003_700), GoalStatus::Achieved);
        assert_eq!(record.status_label(), "Achieved");
    }

    #[test]
    fn test_due_date_boundary_is_in_progress() {
        let record = GoalRecord::from_external_response(&raw(0), 1).unwrap();
        assert!(!record.is_expired_at(DUE));
        assert_eq!(record.status_at(DUE), GoalStatus::InProgress);
        assert_eq!(record.status_at(DUE + 1), GoalStatus::Expired);
    }

    #[test]
    fn test_missing_due_date_fails() {
        let mut response = raw(0);
        response.due_date = None;
        let err = GoalRecord::from_external_response(&response, 7).unwrap_err();
        assert_eq!(err, DecodeError::MissingField { field: "dueDate" });
    }

    #[test]
    fn test_missing_text_fails() {
        let mut response = raw(0);
        response.image_svg = None;
        let err = GoalRecord::from_external_response(&response, 7).unwrap_err();
        assert_eq!(err, DecodeError::MissingField { field: "imageSVG" });
    }

    #[test]
    fn test_pending_record() {
        let request = GoalRequest::new("Wake up at 8", "every morning", DUE).unwrap();
        let record = GoalRecord::pending(&request);
        assert_eq!(record.token(), TokenRef::Pending);
        assert_eq!(record.token_id(), None);
        assert_eq!(record.created_at(), None);
        assert!(!record.is_achieved());
        assert_eq!(record.due_date(), DUE);
    }

    #[test]
    fn test_formatted_due_date_is_parametrized() {
        let record = GoalRecord::from_external_response(&raw(0), 7).unwrap();
        // 1700003600 = 2023-11-14T23:13:20Z
        assert_eq!(record.formatted_due_date_in(&Utc, "%Y-%m-%d"), "2023-11-14");
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(record.formatted_due_date_in(&tokyo, "%Y/%m/%d"), "2023/11/15");
        assert_eq!(record.formatted_due_date_in(&Utc, "%Q"), "2023/11/14");
        assert!(!record.formatted_due_date().is_empty());
    }

    #[test]
    fn test_date_format_validation() {
        assert!(is_valid_date_format("%Y/%m/%d"));
        assert!(is_valid_date_format("%x"));
        assert!(!is_valid_date_format("%Q"));
    }

    proptest! {
        #[test]
        fn prop_achieved_takes_precedence(
            achieved in 1u64..=u64::MAX,
            due in any::<u64>(),
            now in any::<u64>(),
        ) {
            let mut response = raw(achieved);
            response.due_date = Some(WideInt::Unsigned(due));
            let record = GoalRecord::from_external_response(&response, 1).unwrap();
            prop_assert!(record.is_achieved());
            prop_assert_eq!(record.status_at(now), GoalStatus::Achieved);
        }

        #[test]
        fn prop_unachieved_status_follows_clock(due in any::<u64>(), now in any::<u64>()) {
            let mut response = raw(0);
            response.due_date = Some(WideInt::Unsigned(due));
            let record = GoalRecord::from_external_response(&response, 1).unwrap();
            prop_assert!(!record.is_achieved());
            let expected = if due < now { GoalStatus::Expired } else { GoalStatus::InProgress };
            prop_assert_eq!(record.status_at(now), expected);
        }

        #[test]
        fn prop_fields_survive_decoding(
            token_id in any::<u64>(),
            name in ".*",
            description in ".*",
            created in any::<u64>(),
            due in any::<u64>(),
            achieved in any::<u64>(),
        ) {
            let response = RawGoalMetadata {
                name: Some(name.clone()),
                description: Some(description.clone()),
                image_svg: Some("data:image/svg+xml;base64,PHN2Zy8+".into()),
                created_at: Some(WideInt::from(alloy::primitives::U256::from(created))),
                due_date: Some(WideInt::Text(due.to_string())),
                achieved_at: Some(WideInt::Unsigned(achieved)),
            };
            let record = GoalRecord::from_external_response(&response, token_id).unwrap();
            prop_assert_eq!(record.token_id(), Some(token_id));
            prop_assert_eq!(record.name(), name.as_str());
            prop_assert_eq!(record.description(), description.as_str());
            prop_assert_eq!(record.image(), "data:image/svg+xml;base64,PHN2Zy8+");
            prop_assert_eq!(record.created_at(), Some(created));
            prop_assert_eq!(record.due_date(), due);
            prop_assert_eq!(record.achieved_at(), (achieved > 0).then_some(achieved));
        }
    }
}
