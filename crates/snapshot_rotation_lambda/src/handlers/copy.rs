use std::time::{Duration, Instant};

use serde_json::json;

use crate::adapters::snapshot_store::SnapshotStore;
use crate::logging::log_info;
use crate::runtime::contract::{CopiedSnapshot, CopySnapshotInput};
use crate::runtime::error::RotationError;
use crate::runtime::retention::SnapshotTag;

const COMPONENT: &str = "copy_handler";

/// Requests the copy, then blocks until the provider reports the target as
/// available or the waiter gives up.
pub fn copy_snapshot(
    store: &impl SnapshotStore,
    input: &CopySnapshotInput,
    max_wait: Duration,
) -> Result<CopiedSnapshot, RotationError> {
    let started_at = Instant::now();
    log_info(
        COMPONENT,
        "copy_requested",
        json!({
            "source_arn": input.source_arn.clone(),
            "target_identifier": input.target_identifier.clone(),
            "reencrypt": input.kms_key_id.is_some(),
        }),
    );

    let copy_error = |message: String| RotationError::Copy {
        source_arn: input.source_arn.clone(),
        target_identifier: input.target_identifier.clone(),
        message,
    };

    let arn = store
        .copy_snapshot(input)
        .map_err(copy_error)?
        .ok_or_else(|| copy_error("copy response did not include a snapshot ARN".to_string()))?;

    store
        .wait_until_available(&input.target_identifier, max_wait)
        .map_err(|message| RotationError::Wait {
            identifier: input.target_identifier.clone(),
            message,
        })?;

    log_info(
        COMPONENT,
        "copy_available",
        json!({
            "snapshot_identifier": input.target_identifier.clone(),
            "snapshot_arn": arn.clone(),
            "duration_ms": started_at.elapsed().as_millis(),
        }),
    );

    Ok(CopiedSnapshot {
        identifier: input.target_identifier.clone(),
        arn,
    })
}

/// Marks a copy as owned by this automation so the retention sweep may
/// delete it later.
pub fn tag_snapshot(store: &impl SnapshotStore, arn: &str) -> Result<(), RotationError> {
    store
        .add_tags(arn, &[SnapshotTag::marker()])
        .map_err(|message| RotationError::Tag {
            arn: arn.to_string(),
            message,
        })?;

    log_info(COMPONENT, "snapshot_tagged", json!({ "snapshot_arn": arn }));
    Ok(())
}
