//! Events API Lambda handler.
//!
//! The hunt web application posts signed puzzle events here; each one becomes
//! a queued job for the worker.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use super::{helpers, signature};
use crate::core::config::AppConfig;
use crate::core::models::{Job, PuzzleEvent, QueuedJob};
use crate::core::queue::{SqsTaskQueue, TaskQueue};

pub const TIMESTAMP_HEADER: &str = "x-herring-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-herring-signature";

pub use self::function_handler as handler;

/// Lambda handler for the events entrypoint.
///
/// # Errors
///
/// Returns an error only if configuration is missing; request problems are
/// reported as HTTP responses.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    let queue = SqsTaskQueue::from_env(config.task_queue_url.clone()).await;

    Ok(handle_event_request(config.event_signing_secret.as_deref(), &queue, &event.payload).await)
}

/// Verify, decode and enqueue one API Gateway proxy request.
pub async fn handle_event_request(
    signing_secret: Option<&str>,
    queue: &dyn TaskQueue,
    payload: &Value,
) -> Value {
    let Some(secret) = signing_secret else {
        error!("EVENT_SIGNING_SECRET is not configured; refusing events");
        return helpers::err_response(500, "Events are not configured");
    };

    let Some(headers) = payload.get("headers") else {
        error!("Request missing headers");
        return helpers::err_response(400, "Missing headers");
    };

    let body = match extract_body(payload) {
        Ok(b) => b,
        Err(response) => return response,
    };

    let (Some(timestamp), Some(sig)) = (
        header(headers, TIMESTAMP_HEADER),
        header(headers, SIGNATURE_HEADER),
    ) else {
        return helpers::err_response(401, "Missing signature headers");
    };

    if !signature::verify_event_signature(&body, timestamp, sig, secret) {
        return helpers::err_response(401, "Invalid signature");
    }

    let event: PuzzleEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            error!("Event parse error: {}", e);
            return helpers::err_response(400, &format!("Parse Error: {e}"));
        }
    };

    let job = Job::from(event);
    if job.slug().trim().is_empty() {
        return helpers::err_response(400, "Missing slug");
    }

    let queued = QueuedJob::new(job);
    match queue.enqueue(&queued, Duration::ZERO).await {
        Ok(()) => {
            info!(
                job = queued.job.kind().name(),
                slug = queued.job.slug(),
                correlation_id = %queued.correlation_id,
                "Queued job from event"
            );
            helpers::ok_queued(&queued.correlation_id)
        }
        Err(e) => {
            error!("Failed to enqueue job: {}", e);
            helpers::err_response(500, "Failed to queue job")
        }
    }
}

/// Case-insensitive header lookup; API Gateway v1 keeps the client's casing.
fn header<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    headers
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.as_str())
}

fn extract_body(payload: &Value) -> Result<String, Value> {
    let Some(raw) = payload.get("body").and_then(Value::as_str) else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !is_base64 {
        return Ok(raw.to_string());
    }

    BASE64
        .decode(raw)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| helpers::err_response(400, "Body is not valid base64 UTF-8"))
}
