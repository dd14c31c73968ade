use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use std::time::Duration;
use tracing::info;

use super::models::{MAX_QUEUE_DELAY, QueuedJob};
use crate::errors::HerringError;

/// Producer side of the task queue.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the job cannot be serialized or the queue rejects it.
    async fn enqueue(&self, job: &QueuedJob, delay: Duration) -> Result<(), HerringError>;
}

pub struct SqsTaskQueue {
    client: SqsClient,
    queue_url: String,
}

impl SqsTaskQueue {
    #[must_use]
    pub fn new(client: SqsClient, queue_url: String) -> Self {
        Self { client, queue_url }
    }

    /// Build a queue client from the ambient AWS configuration.
    pub async fn from_env(queue_url: String) -> Self {
        let shared_config = aws_config::from_env().load().await;
        Self::new(SqsClient::new(&shared_config), queue_url)
    }
}

/// Whole seconds to hand to SQS, rounded up and clamped to what SQS accepts.
#[must_use]
pub fn delay_seconds(delay: Duration) -> i32 {
    let clamped = delay.min(MAX_QUEUE_DELAY);
    let secs = clamped.as_secs() + u64::from(clamped.subsec_nanos() > 0);
    i32::try_from(secs).unwrap_or(i32::MAX)
}

#[async_trait]
impl TaskQueue for SqsTaskQueue {
    async fn enqueue(&self, job: &QueuedJob, delay: Duration) -> Result<(), HerringError> {
        let message_body = serde_json::to_string(job)
            .map_err(|e| HerringError::ParseError(format!("Failed to serialize job: {e}")))?;

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message_body)
            .delay_seconds(delay_seconds(delay))
            .send()
            .await
            .map_err(|e| HerringError::AwsError(format!("Failed to send message to SQS: {e}")))?;

        info!(
            job = job.job.kind().name(),
            slug = job.job.slug(),
            attempt = job.attempt,
            correlation_id = %job.correlation_id,
            delay_secs = delay.as_secs(),
            "Enqueued job"
        );
        Ok(())
    }
}
