use chrono::{DateTime, Utc};

use crate::error::RotationError;

/// Tag written onto every copy this automation makes. Only snapshots carrying
/// it are ever considered for deletion.
pub const MARKER_TAG_KEY: &str = "lambda_automatic";
pub const MARKER_TAG_VALUE: &str = "true";
pub const MANUAL_SNAPSHOT_TYPE: &str = "manual";
pub const HOURS_PER_DAY: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub identifier: String,
    pub arn: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub snapshot_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTag {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub days: u32,
}

impl SnapshotSummary {
    /// Listing is already filtered server side; an absent type is taken as
    /// manual, any other type is never a candidate.
    pub fn is_manual(&self) -> bool {
        matches!(
            self.snapshot_type.as_deref(),
            None | Some(MANUAL_SNAPSHOT_TYPE)
        )
    }
}

impl SnapshotTag {
    pub fn marker() -> Self {
        Self {
            key: MARKER_TAG_KEY.to_string(),
            value: Some(MARKER_TAG_VALUE.to_string()),
        }
    }
}

impl RetentionPolicy {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    pub fn parse(raw: &str) -> Result<Self, RotationError> {
        let invalid = |reason: &str| RotationError::InvalidConfig {
            name: crate::config::RETENTION_DAYS_VAR,
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("value cannot be empty"));
        }

        let days: i64 = trimmed
            .parse()
            .map_err(|_| invalid("expected a whole number of days"))?;
        let days = u32::try_from(days)
            .map_err(|_| invalid("days must be a non-negative 32-bit integer"))?;
        Ok(Self::new(days))
    }

    /// Inclusive: a snapshot exactly `days` old is expired.
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        age_in_days(created_at, now) >= i64::from(self.days)
    }
}

/// Whole days elapsed, truncated toward zero from whole hours.
pub fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_hours() / HOURS_PER_DAY
}

/// Presence of the marker key is enough; its value is not inspected.
pub fn has_marker_tag(tags: &[SnapshotTag]) -> bool {
    tags.iter().any(|tag| tag.key == MARKER_TAG_KEY)
}
