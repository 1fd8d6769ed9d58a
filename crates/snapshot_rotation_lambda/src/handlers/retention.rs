use chrono::{DateTime, Utc};
use serde_json::json;

use crate::adapters::snapshot_store::SnapshotStore;
use crate::logging::{log_info, log_warn};
use crate::runtime::error::RotationError;
use crate::runtime::retention::{age_in_days, has_marker_tag, RetentionPolicy, SnapshotSummary};

const COMPONENT: &str = "retention_sweep";
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Deletes every manual snapshot that is at least `policy.days` old and
/// carries the marker tag. Returns the deleted identifiers in listing order.
/// The first failing call aborts the rest of the sweep.
pub fn sweep_expired_snapshots(
    store: &impl SnapshotStore,
    policy: RetentionPolicy,
    now: DateTime<Utc>,
) -> Result<Vec<String>, RotationError> {
    let snapshots = store
        .list_manual_snapshots()
        .map_err(|message| RotationError::ListSnapshots { message })?;

    log_info(
        COMPONENT,
        "sweep_started",
        json!({
            "retention_days": policy.days,
            "manual_snapshots": snapshots.len(),
        }),
    );

    let mut deleted = Vec::new();
    for snapshot in &snapshots {
        let Some((arn, created_at)) = candidate(snapshot) else {
            continue;
        };

        if !policy.is_expired(created_at, now) {
            continue;
        }

        let tags = store
            .list_tags(arn)
            .map_err(|message| RotationError::ListTags {
                arn: arn.to_string(),
                message,
            })?;
        if !has_marker_tag(&tags) {
            continue;
        }

        store
            .delete_snapshot(&snapshot.identifier)
            .map_err(|message| RotationError::Delete {
                identifier: snapshot.identifier.clone(),
                message,
            })?;
        log_info(
            COMPONENT,
            "snapshot_deleted",
            json!({
                "snapshot_identifier": snapshot.identifier.clone(),
                "created_at": created_at.format(CREATED_AT_FORMAT).to_string(),
                "age_days": age_in_days(created_at, now),
            }),
        );
        deleted.push(snapshot.identifier.clone());
    }

    log_info(
        COMPONENT,
        "sweep_completed",
        json!({
            "retention_days": policy.days,
            "deleted_snapshots": deleted.clone(),
        }),
    );
    Ok(deleted)
}

/// A snapshot can only be judged with an ARN (for its tags) and a creation
/// time. Anything else is left alone.
fn candidate(snapshot: &SnapshotSummary) -> Option<(&str, DateTime<Utc>)> {
    if !snapshot.is_manual() {
        return None;
    }

    match (snapshot.arn.as_deref(), snapshot.created_at) {
        (Some(arn), Some(created_at)) if !snapshot.identifier.is_empty() => {
            Some((arn, created_at))
        }
        _ => {
            log_warn(
                COMPONENT,
                "snapshot_skipped",
                json!({
                    "snapshot_identifier": snapshot.identifier.clone(),
                    "has_arn": snapshot.arn.is_some(),
                    "has_created_at": snapshot.created_at.is_some(),
                }),
            );
            None
        }
    }
}
