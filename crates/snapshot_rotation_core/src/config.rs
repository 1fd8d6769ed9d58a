use std::time::Duration;

use crate::error::RotationError;
use crate::retention::RetentionPolicy;

pub const REGION_VAR: &str = "REGION";
pub const KMS_KEY_ID_VAR: &str = "KMS_KEY_ID";
pub const RETENTION_DAYS_VAR: &str = "RETENTION_DAYS";
pub const WAIT_TIMEOUT_SECS_VAR: &str = "SNAPSHOT_WAIT_TIMEOUT_SECS";
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 1_800;

/// Which operations run after the copy. Each deployed function picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    pub tag_copies: bool,
    pub sweep: bool,
}

impl Pipeline {
    pub const fn copy_only() -> Self {
        Self {
            tag_copies: false,
            sweep: false,
        }
    }

    pub const fn rotation() -> Self {
        Self {
            tag_copies: true,
            sweep: true,
        }
    }
}

/// Resolved once at the start of an invocation and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    pub region: String,
    pub kms_key_id: Option<String>,
    pub retention: Option<RetentionPolicy>,
    pub wait_timeout: Duration,
    pub pipeline: Pipeline,
}

impl RotationConfig {
    pub fn from_env(pipeline: Pipeline) -> Result<Self, RotationError> {
        Self::from_lookup(pipeline, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        pipeline: Pipeline,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, RotationError> {
        let region = non_blank(lookup(REGION_VAR))
            .ok_or(RotationError::MissingConfig { name: REGION_VAR })?;

        let kms_key_id = non_blank(lookup(KMS_KEY_ID_VAR));

        let retention = if pipeline.sweep {
            let raw = lookup(RETENTION_DAYS_VAR).ok_or(RotationError::MissingConfig {
                name: RETENTION_DAYS_VAR,
            })?;
            Some(RetentionPolicy::parse(&raw)?)
        } else {
            None
        };

        let wait_timeout = match non_blank(lookup(WAIT_TIMEOUT_SECS_VAR)) {
            Some(raw) => parse_wait_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
        };

        Ok(Self {
            region,
            kms_key_id,
            retention,
            wait_timeout,
            pipeline,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn parse_wait_timeout(raw: &str) -> Result<Duration, RotationError> {
    match raw.parse::<u64>() {
        Ok(0) | Err(_) => Err(RotationError::InvalidConfig {
            name: WAIT_TIMEOUT_SECS_VAR,
            value: raw.to_string(),
            reason: "expected a positive number of seconds".to_string(),
        }),
        Ok(seconds) => Ok(Duration::from_secs(seconds)),
    }
}
