use thiserror::Error;

/// Every failure an invocation can hit. None of them are retried here; the
/// trigger's own redelivery policy is the only recovery path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    #[error("invalid notification event: {0}")]
    InvalidEvent(String),

    #[error("missing message attribute '{attribute}' in record {record_index}")]
    MissingAttribute {
        record_index: usize,
        attribute: &'static str,
    },

    #[error("malformed message attribute '{attribute}' in record {record_index}: {reason}")]
    MalformedAttribute {
        record_index: usize,
        attribute: &'static str,
        reason: String,
    },

    #[error("{name} must be configured")]
    MissingConfig { name: &'static str },

    #[error("invalid {name} value '{value}': {reason}")]
    InvalidConfig {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("error occurred while copying snapshot {source_arn} to {target_identifier}: {message}")]
    Copy {
        source_arn: String,
        target_identifier: String,
        message: String,
    },

    #[error("error occurred while waiting for snapshot {identifier} to become available: {message}")]
    Wait { identifier: String, message: String },

    #[error("error tagging snapshot {arn}: {message}")]
    Tag { arn: String, message: String },

    #[error("unable to list snapshots: {message}")]
    ListSnapshots { message: String },

    #[error("unable to get tags for snapshot {arn}: {message}")]
    ListTags { arn: String, message: String },

    #[error("unable to delete snapshot {identifier}: {message}")]
    Delete { identifier: String, message: String },
}

impl RotationError {
    /// Short operation label used in structured log lines.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::InvalidEvent(_)
            | Self::MissingAttribute { .. }
            | Self::MalformedAttribute { .. } => "decode_notification",
            Self::MissingConfig { .. } | Self::InvalidConfig { .. } => "load_config",
            Self::Copy { .. } => "copy_snapshot",
            Self::Wait { .. } => "wait_for_snapshot",
            Self::Tag { .. } => "tag_snapshot",
            Self::ListSnapshots { .. } => "list_snapshots",
            Self::ListTags { .. } => "list_tags",
            Self::Delete { .. } => "delete_snapshot",
        }
    }
}
