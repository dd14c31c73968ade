#![allow(clippy::missing_errors_doc)]
use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info};

use super::dispatch::{Dispatched, Dispatcher};
use crate::core::models::QueuedJob;
use crate::errors::HerringError;

/// Decode one SQS record body into a queued job.
pub fn parse_sqs_record(record: &Value) -> Result<QueuedJob, HerringError> {
    let body = record
        .get("body")
        .and_then(Value::as_str)
        .ok_or_else(|| HerringError::ParseError("SQS record has no body".to_string()))?;
    serde_json::from_str::<QueuedJob>(body)
        .map_err(|e| HerringError::ParseError(format!("Failed to parse SQS message body: {e}")))
}

fn sqs_records(payload: &Value) -> Result<&[Value], HerringError> {
    payload
        .get("Records")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| HerringError::ParseError("Event has no Records array".to_string()))
}

/// Response telling SQS which messages to redeliver. Requires
/// `ReportBatchItemFailures` on the event source mapping.
#[must_use]
pub fn batch_response(failed_message_ids: &[String]) -> Value {
    json!({
        "batchItemFailures": failed_message_ids
            .iter()
            .map(|id| json!({ "itemIdentifier": id }))
            .collect::<Vec<_>>()
    })
}

/// Lambda handler for the worker. Every record in a batch runs on its own;
/// only the messages whose job failed are reported back for redelivery.
///
/// Failed jobs are not re-run safely: the queue's redrive policy must send
/// them to the dead-letter queue on the first failure (`maxReceiveCount = 1`).
pub async fn function_handler(
    dispatcher: &Dispatcher,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let records = sqs_records(&event.payload).map_err(|e| {
        error!("Rejecting SQS event: {}", e);
        Error::from(e.to_string())
    })?;
    info!(count = records.len(), request_id = %event.context.request_id, "Worker received jobs");

    let mut failed = Vec::new();
    for record in records {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let queued = match parse_sqs_record(record) {
            Ok(queued) => queued,
            Err(e) => {
                error!(message_id, error = %e, "Unreadable SQS record");
                failed.push(message_id);
                continue;
            }
        };

        match dispatcher.dispatch(&queued).await {
            Ok(Dispatched::Requeued { attempt, delay }) => info!(
                correlation_id = %queued.correlation_id,
                attempt,
                delay_secs = delay.as_secs(),
                "Job requeued"
            ),
            Ok(outcome) => info!(
                correlation_id = %queued.correlation_id,
                outcome = ?outcome,
                "Job finished"
            ),
            Err(e) => {
                error!(
                    message_id,
                    job = queued.job.kind().name(),
                    correlation_id = %queued.correlation_id,
                    error = %e,
                    "Job failed"
                );
                failed.push(message_id);
            }
        }
    }

    Ok(batch_response(&failed))
}

pub use self::function_handler as handler;
