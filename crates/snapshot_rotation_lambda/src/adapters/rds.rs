use std::future::Future;
use std::time::Duration;

use aws_sdk_rds::client::Waiters;
use aws_sdk_rds::config::Region;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::primitives::DateTime as AwsDateTime;
use aws_sdk_rds::types::{DbClusterSnapshot, Tag};
use chrono::{DateTime, Utc};

use crate::adapters::snapshot_store::SnapshotStore;
use crate::runtime::contract::CopySnapshotInput;
use crate::runtime::retention::{SnapshotSummary, SnapshotTag, MANUAL_SNAPSHOT_TYPE};

/// [`SnapshotStore`] backed by the RDS control plane for a single region.
#[derive(Debug, Clone)]
pub struct RdsSnapshotStore {
    client: aws_sdk_rds::Client,
}

impl RdsSnapshotStore {
    pub fn new(client: aws_sdk_rds::Client) -> Self {
        Self { client }
    }

    pub async fn for_region(region: &str) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self::new(aws_sdk_rds::Client::new(&aws_config))
    }
}

impl SnapshotStore for RdsSnapshotStore {
    fn copy_snapshot(&self, input: &CopySnapshotInput) -> Result<Option<String>, String> {
        block_on(async {
            self.client
                .copy_db_cluster_snapshot()
                .source_db_cluster_snapshot_identifier(&input.source_arn)
                .target_db_cluster_snapshot_identifier(&input.target_identifier)
                .set_kms_key_id(input.kms_key_id.clone())
                .send()
                .await
                .map(|output| {
                    output
                        .db_cluster_snapshot()
                        .and_then(DbClusterSnapshot::db_cluster_snapshot_arn)
                        .map(str::to_string)
                })
                .map_err(|error| DisplayErrorContext(&error).to_string())
        })
    }

    fn wait_until_available(&self, identifier: &str, max_wait: Duration) -> Result<(), String> {
        block_on(async {
            self.client
                .wait_until_db_cluster_snapshot_available()
                .db_cluster_snapshot_identifier(identifier)
                .wait(max_wait)
                .await
                .map(|_| ())
                .map_err(|error| DisplayErrorContext(&error).to_string())
        })
    }

    fn add_tags(&self, arn: &str, tags: &[SnapshotTag]) -> Result<(), String> {
        let tags = tags
            .iter()
            .map(|tag| {
                Tag::builder()
                    .key(&tag.key)
                    .set_value(tag.value.clone())
                    .build()
            })
            .collect::<Vec<_>>();

        block_on(async {
            self.client
                .add_tags_to_resource()
                .resource_name(arn)
                .set_tags(Some(tags))
                .send()
                .await
                .map(|_| ())
                .map_err(|error| DisplayErrorContext(&error).to_string())
        })
    }

    fn list_manual_snapshots(&self) -> Result<Vec<SnapshotSummary>, String> {
        block_on(async {
            let mut snapshots = Vec::new();
            let mut marker: Option<String> = None;
            loop {
                let output = self
                    .client
                    .describe_db_cluster_snapshots()
                    .snapshot_type(MANUAL_SNAPSHOT_TYPE)
                    .set_marker(marker.take())
                    .send()
                    .await
                    .map_err(|error| DisplayErrorContext(&error).to_string())?;

                snapshots.extend(output.db_cluster_snapshots().iter().map(snapshot_summary));

                match output.marker() {
                    Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                    _ => break,
                }
            }
            Ok::<_, String>(snapshots)
        })
    }

    fn list_tags(&self, arn: &str) -> Result<Vec<SnapshotTag>, String> {
        block_on(async {
            self.client
                .list_tags_for_resource()
                .resource_name(arn)
                .send()
                .await
                .map(|output| {
                    output
                        .tag_list()
                        .iter()
                        .filter_map(|tag| {
                            tag.key().map(|key| SnapshotTag {
                                key: key.to_string(),
                                value: tag.value().map(str::to_string),
                            })
                        })
                        .collect()
                })
                .map_err(|error| DisplayErrorContext(&error).to_string())
        })
    }

    fn delete_snapshot(&self, identifier: &str) -> Result<(), String> {
        block_on(async {
            self.client
                .delete_db_cluster_snapshot()
                .db_cluster_snapshot_identifier(identifier)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| DisplayErrorContext(&error).to_string())
        })
    }
}

/// The handlers are synchronous; SDK futures are driven on the current
/// multi-threaded runtime.
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn snapshot_summary(snapshot: &DbClusterSnapshot) -> SnapshotSummary {
    SnapshotSummary {
        identifier: snapshot
            .db_cluster_snapshot_identifier()
            .unwrap_or_default()
            .to_string(),
        arn: snapshot.db_cluster_snapshot_arn().map(str::to_string),
        created_at: snapshot.snapshot_create_time().and_then(to_utc),
        snapshot_type: snapshot.snapshot_type().map(str::to_string),
    }
}

fn to_utc(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}
