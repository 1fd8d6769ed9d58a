use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

use crate::adapters::rds::RdsSnapshotStore;
use crate::handlers::notification::handle_notification;
use crate::logging::{init_logging, log_error};
use crate::runtime::config::{Pipeline, RotationConfig};
use crate::runtime::contract::InvocationResponse;
use crate::runtime::error::RotationError;

const COMPONENT: &str = "lambda_entry";

/// Serves SNS invocations with the given pipeline until the runtime shuts
/// down. Shared by every deployed function binary.
pub async fn run(pipeline: Pipeline) -> Result<(), Error> {
    init_logging();
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        handle_request(event, pipeline)
    }))
    .await
}

async fn handle_request(event: LambdaEvent<Value>, pipeline: Pipeline) -> Result<Value, Error> {
    match process(event.payload, pipeline).await {
        Ok(response) => serde_json::to_value(response)
            .map_err(|error| Error::from(format!("failed to serialize handler response: {error}"))),
        Err(error) => {
            log_error(
                COMPONENT,
                "invocation_failed",
                json!({
                    "operation": error.operation(),
                    "error": error.to_string(),
                }),
            );
            // Any failure terminates the process; the trigger redelivers.
            std::process::exit(1);
        }
    }
}

async fn process(payload: Value, pipeline: Pipeline) -> Result<InvocationResponse, RotationError> {
    let config = RotationConfig::from_env(pipeline)?;
    let store = RdsSnapshotStore::for_region(&config.region).await;
    handle_notification(payload, &config, &store, &Utc::now)
}
