use std::time::Duration;

use crate::runtime::contract::CopySnapshotInput;
use crate::runtime::retention::{SnapshotSummary, SnapshotTag};

/// Control-plane calls the handlers need. Implementations block until the
/// provider answers; errors are reported as display strings and classified by
/// the caller.
pub trait SnapshotStore {
    /// Requests the copy and returns the new snapshot's ARN when the provider
    /// reports one.
    fn copy_snapshot(&self, input: &CopySnapshotInput) -> Result<Option<String>, String>;

    fn wait_until_available(&self, identifier: &str, max_wait: Duration) -> Result<(), String>;

    fn add_tags(&self, arn: &str, tags: &[SnapshotTag]) -> Result<(), String>;

    /// Every manual cluster snapshot visible to the account, across all pages.
    fn list_manual_snapshots(&self) -> Result<Vec<SnapshotSummary>, String>;

    fn list_tags(&self, arn: &str) -> Result<Vec<SnapshotTag>, String>;

    fn delete_snapshot(&self, identifier: &str) -> Result<(), String>;
}
