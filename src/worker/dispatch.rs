//! Runs queued jobs and turns `RetryLater` into delayed re-enqueues.

use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::jobs::{JobOutcome, PuzzleJobs};
use super::throttle::Throttle;
use crate::core::config::AppConfig;
use crate::core::models::QueuedJob;
use crate::core::puzzle_store::HttpPuzzleStore;
use crate::core::queue::{SqsTaskQueue, TaskQueue};
use crate::errors::HerringError;
use crate::sheets::{DriveSheetService, SheetService};
use crate::slack::{ChatPlatform, SlackClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Completed,
    Skipped,
    /// Put back on the queue as retry number `attempt`.
    Requeued { attempt: u32, delay: Duration },
}

pub struct Dispatcher {
    jobs: PuzzleJobs,
    queue: Arc<dyn TaskQueue>,
    throttle: Option<Throttle>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(jobs: PuzzleJobs, queue: Arc<dyn TaskQueue>) -> Self {
        Self {
            jobs,
            queue,
            throttle: None,
        }
    }

    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Wire up the production Slack, Drive, store and SQS clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the puzzle store URL is invalid.
    pub async fn from_config(config: &AppConfig) -> Result<Self, HerringError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let chat: Option<Arc<dyn ChatPlatform>> = match &config.slack_user_token {
            Some(token) => Some(Arc::new(SlackClient::new(token.clone()))),
            None => {
                warn!("SLACK_USER_TOKEN is not set; Slack integration is disabled");
                None
            }
        };

        let sheets: Option<Arc<dyn SheetService>> =
            match (&config.google_access_token, &config.sheet_template_id) {
                (Some(token), Some(template)) => Some(Arc::new(DriveSheetService::new(
                    http.clone(),
                    token.clone(),
                    template.clone(),
                    config.sheet_folder_id.clone(),
                ))),
                _ => {
                    warn!("Google Drive credentials are not set; sheet creation is disabled");
                    None
                }
            };

        let store = Arc::new(HttpPuzzleStore::new(
            http,
            &config.puzzle_api_url,
            config.puzzle_api_token.clone(),
        )?);
        let queue = Arc::new(SqsTaskQueue::from_env(config.task_queue_url.clone()).await);

        let jobs =
            PuzzleJobs::new(chat, sheets, store).with_status_channel(config.status_channel.clone());
        Ok(Self::new(jobs, queue).with_throttle(Throttle::from_job_policies()))
    }

    #[must_use]
    pub fn jobs(&self) -> &PuzzleJobs {
        &self.jobs
    }

    /// Run one queued job, re-enqueueing it if it asks to be retried.
    ///
    /// # Errors
    ///
    /// Returns the job's own failure, `RetriesExhausted` once a job has used
    /// all its retries, or a queue error if the retry could not be enqueued.
    pub async fn dispatch(&self, queued: &QueuedJob) -> Result<Dispatched, HerringError> {
        let kind = queued.job.kind();
        if let Some(throttle) = &self.throttle {
            throttle.acquire(kind).await;
        }

        info!(
            job = kind.name(),
            slug = queued.job.slug(),
            attempt = queued.attempt,
            correlation_id = %queued.correlation_id,
            "Running job"
        );

        match self.jobs.run(&queued.job).await {
            Ok(JobOutcome::Completed) => Ok(Dispatched::Completed),
            Ok(JobOutcome::Skipped) => Ok(Dispatched::Skipped),
            Ok(JobOutcome::RetryLater(reason)) => self.retry(queued, reason).await,
            Err(e) => {
                error!(
                    job = kind.name(),
                    slug = queued.job.slug(),
                    correlation_id = %queued.correlation_id,
                    error = %e,
                    "Job failed"
                );
                Err(e)
            }
        }
    }

    async fn retry(&self, queued: &QueuedJob, reason: String) -> Result<Dispatched, HerringError> {
        let kind = queued.job.kind();
        let policy = kind.policy();

        if queued.attempt >= policy.max_retries {
            error!(
                job = kind.name(),
                slug = queued.job.slug(),
                correlation_id = %queued.correlation_id,
                retries = queued.attempt,
                "Giving up: {reason}"
            );
            return Err(HerringError::RetriesExhausted {
                job: kind.name(),
                retries: queued.attempt,
                reason,
            });
        }

        let next = queued.next_attempt();
        let delay = policy.backoff(queued.attempt);
        self.queue.enqueue(&next, delay).await?;
        warn!(
            job = kind.name(),
            slug = queued.job.slug(),
            correlation_id = %queued.correlation_id,
            attempt = next.attempt,
            delay_secs = delay.as_secs(),
            "Retry scheduled: {reason}"
        );

        Ok(Dispatched::Requeued {
            attempt: next.attempt,
            delay,
        })
    }
}
