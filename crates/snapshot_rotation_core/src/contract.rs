use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RotationError;

pub const SNAPSHOT_ARN_ATTRIBUTE: &str = "snapshot_arn";
pub const SNAPSHOT_IDENTIFIER_ATTRIBUTE: &str = "snapshot_identifier";
pub const STRING_ATTRIBUTE_TYPE: &str = "String";
pub const RESPONSE_STATUS_OK: &str = "ok";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnsNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnsRecord {
    #[serde(rename = "EventSource", default)]
    pub event_source: String,
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

/// The SNS envelope. Attributes stay untyped here and are validated one by
/// one in [`SnsRecord::snapshot_request`] so failures can name the attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnsMessage {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: String,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "MessageAttributes", default)]
    pub message_attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub source_arn: String,
    pub target_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySnapshotInput {
    pub source_arn: String,
    pub target_identifier: String,
    pub kms_key_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopiedSnapshot {
    pub identifier: String,
    pub arn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordOutcome {
    pub source_arn: String,
    pub snapshot_identifier: String,
    pub snapshot_arn: String,
    pub tagged: bool,
    pub deleted_snapshots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvocationResponse {
    pub status: String,
    pub records: Vec<RecordOutcome>,
}

impl InvocationResponse {
    pub fn ok(records: Vec<RecordOutcome>) -> Self {
        Self {
            status: RESPONSE_STATUS_OK.to_string(),
            records,
        }
    }
}

impl CopySnapshotInput {
    pub fn new(request: &SnapshotRequest, kms_key_id: Option<&str>) -> Self {
        Self {
            source_arn: request.source_arn.clone(),
            target_identifier: request.target_identifier.clone(),
            kms_key_id: kms_key_id.map(str::to_string),
        }
    }
}

pub fn decode_notification(event: Value) -> Result<SnsNotification, RotationError> {
    if !event.is_object() {
        return Err(RotationError::InvalidEvent(
            "notification payload must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(event).map_err(|error| RotationError::InvalidEvent(error.to_string()))
}

impl SnsRecord {
    pub fn snapshot_request(&self, record_index: usize) -> Result<SnapshotRequest, RotationError> {
        let attributes = &self.sns.message_attributes;
        Ok(SnapshotRequest {
            source_arn: string_attribute(attributes, SNAPSHOT_ARN_ATTRIBUTE, record_index)?,
            target_identifier: string_attribute(
                attributes,
                SNAPSHOT_IDENTIFIER_ATTRIBUTE,
                record_index,
            )?,
        })
    }
}

fn string_attribute(
    attributes: &BTreeMap<String, Value>,
    attribute: &'static str,
    record_index: usize,
) -> Result<String, RotationError> {
    let malformed = |reason: &str| RotationError::MalformedAttribute {
        record_index,
        attribute,
        reason: reason.to_string(),
    };

    let Some(raw) = attributes.get(attribute) else {
        return Err(RotationError::MissingAttribute {
            record_index,
            attribute,
        });
    };

    let Some(object) = raw.as_object() else {
        return Err(malformed("expected an attribute object with Type and Value"));
    };

    if let Some(kind) = object.get("Type") {
        match kind.as_str() {
            Some(STRING_ATTRIBUTE_TYPE) => {}
            Some(other) => {
                return Err(malformed(&format!(
                    "expected a {STRING_ATTRIBUTE_TYPE} attribute, found {other}"
                )))
            }
            None => return Err(malformed("attribute Type must be a string")),
        }
    }

    let value = object
        .get("Value")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("attribute Value must be a string"))?
        .trim();
    if value.is_empty() {
        return Err(malformed("attribute Value cannot be empty"));
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_event() -> Value {
        json!({
            "Records": [
                {
                    "EventSource": "aws:sns",
                    "EventVersion": "1.0",
                    "Sns": {
                        "Type": "Notification",
                        "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
                        "Timestamp": "2026-10-19T06:00:00.000Z",
                        "Message": "snapshot ready for copy",
                        "MessageAttributes": {
                            "snapshot_arn": {
                                "Type": "String",
                                "Value": "arn:aws:rds:us-east-1:123:cluster-snapshot:src"
                            },
                            "snapshot_identifier": {
                                "Type": "String",
                                "Value": "target-1"
                            }
                        }
                    }
                }
            ]
        })
    }

    fn first_record(event: Value) -> SnsRecord {
        decode_notification(event)
            .expect("event should decode")
            .records
            .remove(0)
    }

    #[test]
    fn extracts_snapshot_request_from_attributes() {
        let record = first_record(sample_event());
        let request = record.snapshot_request(0).expect("attributes should validate");

        assert_eq!(record.event_source, "aws:sns");
        assert_eq!(record.sns.message, "snapshot ready for copy");
        assert_eq!(
            request.source_arn,
            "arn:aws:rds:us-east-1:123:cluster-snapshot:src"
        );
        assert_eq!(request.target_identifier, "target-1");
    }

    #[test]
    fn rejects_non_object_payload() {
        let error = decode_notification(json!(["not", "an", "event"]))
            .expect_err("array payload should fail");
        assert!(matches!(error, RotationError::InvalidEvent(_)));
    }

    #[test]
    fn rejects_record_without_sns_envelope() {
        let error = decode_notification(json!({"Records": [{"EventSource": "aws:sns"}]}))
            .expect_err("record without Sns should fail");
        assert!(error.to_string().contains("invalid notification event"));
    }

    #[test]
    fn missing_attribute_is_named() {
        let mut event = sample_event();
        event["Records"][0]["Sns"]["MessageAttributes"]
            .as_object_mut()
            .expect("attributes object")
            .remove("snapshot_identifier");

        let error = first_record(event)
            .snapshot_request(0)
            .expect_err("missing identifier should fail");
        assert_eq!(
            error,
            RotationError::MissingAttribute {
                record_index: 0,
                attribute: SNAPSHOT_IDENTIFIER_ATTRIBUTE,
            }
        );
    }

    #[test]
    fn blank_attribute_value_is_malformed() {
        let mut event = sample_event();
        event["Records"][0]["Sns"]["MessageAttributes"]["snapshot_arn"]["Value"] = json!("   ");

        let error = first_record(event)
            .snapshot_request(0)
            .expect_err("blank arn should fail");
        assert!(matches!(
            error,
            RotationError::MalformedAttribute {
                attribute: SNAPSHOT_ARN_ATTRIBUTE,
                ..
            }
        ));
    }

    #[test]
    fn non_string_attribute_type_is_malformed() {
        let mut event = sample_event();
        event["Records"][0]["Sns"]["MessageAttributes"]["snapshot_identifier"] =
            json!({"Type": "Number", "Value": "42"});

        let error = first_record(event)
            .snapshot_request(0)
            .expect_err("numeric attribute should fail");
        assert!(error.to_string().contains("found Number"));
    }

    #[test]
    fn bare_string_attribute_is_malformed() {
        let mut event = sample_event();
        event["Records"][0]["Sns"]["MessageAttributes"]["snapshot_arn"] = json!("arn:aws:rds");

        let error = first_record(event)
            .snapshot_request(0)
            .expect_err("attribute without envelope should fail");
        assert!(matches!(error, RotationError::MalformedAttribute { .. }));
    }

    #[test]
    fn copy_input_carries_optional_key() {
        let request = SnapshotRequest {
            source_arn: "arn:src".to_string(),
            target_identifier: "target".to_string(),
        };

        assert_eq!(CopySnapshotInput::new(&request, None).kms_key_id, None);
        assert_eq!(
            CopySnapshotInput::new(&request, Some("alias/backup")).kms_key_id,
            Some("alias/backup".to_string())
        );
    }
}
