use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::adapters::snapshot_store::SnapshotStore;
use crate::handlers::copy::{copy_snapshot, tag_snapshot};
use crate::handlers::retention::sweep_expired_snapshots;
use crate::logging::log_info;
use crate::runtime::config::{RotationConfig, RETENTION_DAYS_VAR};
use crate::runtime::contract::{
    decode_notification, CopySnapshotInput, InvocationResponse, RecordOutcome,
};
use crate::runtime::error::RotationError;

const COMPONENT: &str = "notification_handler";

/// Runs the configured pipeline for every record, strictly one after another.
/// Every record's attributes are validated before any copy is requested, and
/// the first failure aborts the invocation.
pub fn handle_notification(
    event: Value,
    config: &RotationConfig,
    store: &impl SnapshotStore,
    clock: &dyn Fn() -> DateTime<Utc>,
) -> Result<InvocationResponse, RotationError> {
    let notification = decode_notification(event)?;
    let requests = notification
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| record.snapshot_request(index))
        .collect::<Result<Vec<_>, _>>()?;

    let retention = match (config.pipeline.sweep, config.retention) {
        (true, None) => {
            return Err(RotationError::MissingConfig {
                name: RETENTION_DAYS_VAR,
            })
        }
        (true, Some(policy)) => Some(policy),
        (false, _) => None,
    };

    let mut outcomes = Vec::with_capacity(requests.len());
    for (record, request) in notification.records.iter().zip(&requests) {
        log_info(
            COMPONENT,
            "record_received",
            json!({
                "event_source": record.event_source.clone(),
                "timestamp": record.sns.timestamp.clone(),
                "message": record.sns.message.clone(),
            }),
        );

        let input = CopySnapshotInput::new(request, config.kms_key_id.as_deref());
        let copied = copy_snapshot(store, &input, config.wait_timeout)?;

        if config.pipeline.tag_copies {
            tag_snapshot(store, &copied.arn)?;
        }

        let deleted_snapshots = match retention {
            Some(policy) => sweep_expired_snapshots(store, policy, clock())?,
            None => Vec::new(),
        };

        outcomes.push(RecordOutcome {
            source_arn: request.source_arn.clone(),
            snapshot_identifier: copied.identifier,
            snapshot_arn: copied.arn,
            tagged: config.pipeline.tag_copies,
            deleted_snapshots,
        });
    }

    Ok(InvocationResponse::ok(outcomes))
}
