//! Response builders for the events API.

use serde_json::{Value, json};

/// Returns a 200 OK response naming the queued job.
#[must_use]
pub fn ok_queued(correlation_id: &str) -> Value {
    json!({
        "statusCode": 200,
        "body": json!({ "queued": correlation_id }).to_string()
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}
