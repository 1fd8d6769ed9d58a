use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use crate::adapters::snapshot_store::SnapshotStore;
use crate::runtime::contract::CopySnapshotInput;
use crate::runtime::retention::{SnapshotSummary, SnapshotTag};

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Copy(CopySnapshotInput),
    Wait(String, Duration),
    AddTags(String, Vec<SnapshotTag>),
    ListSnapshots,
    ListTags(String),
    Delete(String),
}

/// In-memory store that records every call. Listing returns the configured
/// snapshots verbatim, without the provider's server-side type filter.
#[derive(Default)]
pub struct FakeStore {
    calls: Mutex<Vec<StoreCall>>,
    snapshots: Vec<SnapshotSummary>,
    tags: HashMap<String, Vec<SnapshotTag>>,
    omit_copy_arn: bool,
    copy_error: Option<String>,
    wait_error: Option<String>,
    tag_error: Option<String>,
    list_error: Option<String>,
    list_tags_error: Option<String>,
    delete_errors: HashMap<String, String>,
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn manual_snapshot(identifier: &str, age_days: i64) -> SnapshotSummary {
    SnapshotSummary {
        identifier: identifier.to_string(),
        arn: Some(FakeStore::copy_arn(identifier)),
        created_at: Some(fixed_now() - chrono::Duration::days(age_days)),
        snapshot_type: Some("manual".to_string()),
    }
}

pub fn automated_snapshot(identifier: &str, age_days: i64) -> SnapshotSummary {
    SnapshotSummary {
        snapshot_type: Some("automated".to_string()),
        ..manual_snapshot(identifier, age_days)
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy_arn(identifier: &str) -> String {
        format!("arn:aws:rds:us-east-1:123:cluster-snapshot:{identifier}")
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotSummary, tags: &[SnapshotTag]) -> Self {
        if let Some(arn) = snapshot.arn.clone() {
            self.tags.insert(arn, tags.to_vec());
        }
        self.snapshots.push(snapshot);
        self
    }

    pub fn without_copy_arn(mut self) -> Self {
        self.omit_copy_arn = true;
        self
    }

    pub fn failing_copy(mut self, message: &str) -> Self {
        self.copy_error = Some(message.to_string());
        self
    }

    pub fn failing_wait(mut self, message: &str) -> Self {
        self.wait_error = Some(message.to_string());
        self
    }

    pub fn failing_tag(mut self, message: &str) -> Self {
        self.tag_error = Some(message.to_string());
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn failing_list_tags(mut self, message: &str) -> Self {
        self.list_tags_error = Some(message.to_string());
        self
    }

    pub fn failing_delete(mut self, identifier: &str, message: &str) -> Self {
        self.delete_errors
            .insert(identifier.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete(identifier) => Some(identifier),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    fn fail_with(error: &Option<String>) -> Result<(), String> {
        match error {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}

impl SnapshotStore for FakeStore {
    fn copy_snapshot(&self, input: &CopySnapshotInput) -> Result<Option<String>, String> {
        self.record(StoreCall::Copy(input.clone()));
        Self::fail_with(&self.copy_error)?;
        if self.omit_copy_arn {
            return Ok(None);
        }
        Ok(Some(Self::copy_arn(&input.target_identifier)))
    }

    fn wait_until_available(&self, identifier: &str, max_wait: Duration) -> Result<(), String> {
        self.record(StoreCall::Wait(identifier.to_string(), max_wait));
        Self::fail_with(&self.wait_error)
    }

    fn add_tags(&self, arn: &str, tags: &[SnapshotTag]) -> Result<(), String> {
        self.record(StoreCall::AddTags(arn.to_string(), tags.to_vec()));
        Self::fail_with(&self.tag_error)
    }

    fn list_manual_snapshots(&self) -> Result<Vec<SnapshotSummary>, String> {
        self.record(StoreCall::ListSnapshots);
        Self::fail_with(&self.list_error)?;
        Ok(self.snapshots.clone())
    }

    fn list_tags(&self, arn: &str) -> Result<Vec<SnapshotTag>, String> {
        self.record(StoreCall::ListTags(arn.to_string()));
        Self::fail_with(&self.list_tags_error)?;
        Ok(self.tags.get(arn).cloned().unwrap_or_default())
    }

    fn delete_snapshot(&self, identifier: &str) -> Result<(), String> {
        self.record(StoreCall::Delete(identifier.to_string()));
        match self.delete_errors.get(identifier) {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }
}
