//! The component every puzzle job runs through.

use std::sync::Arc;
use tracing::warn;

use crate::core::config::DEFAULT_STATUS_CHANNEL;
use crate::core::models::Job;
use crate::core::puzzle_store::PuzzleStore;
use crate::errors::HerringError;
use crate::sheets::SheetService;
use crate::slack::ChatPlatform;

/// How a call site treats a failed external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Propagate,
    /// Log a warning and carry on as if the call had succeeded.
    LogAndContinue,
}

impl FailurePolicy {
    /// # Errors
    ///
    /// Returns the original error under `Propagate`.
    pub fn apply(self, what: &str, result: Result<(), HerringError>) -> Result<(), HerringError> {
        match (self, result) {
            (_, Ok(())) => Ok(()),
            (FailurePolicy::Propagate, Err(e)) => Err(e),
            (FailurePolicy::LogAndContinue, Err(e)) => {
                warn!(error = %e, "{what} failed, continuing");
                Ok(())
            }
        }
    }
}

/// What a job run asks of the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    /// Nothing to do, e.g. the puzzle is gone.
    Skipped,
    /// Temporary failure; run again later if retries remain.
    RetryLater(String),
}

/// Posts puzzle announcements and provisions puzzle sheets and channels.
///
/// Chat and sheets are optional: a process without credentials for them still
/// starts, and jobs that need them fail with `ChatDisabled` / `SheetsDisabled`.
pub struct PuzzleJobs {
    chat: Option<Arc<dyn ChatPlatform>>,
    sheets: Option<Arc<dyn SheetService>>,
    pub(super) store: Arc<dyn PuzzleStore>,
    status_channel: String,
}

impl PuzzleJobs {
    #[must_use]
    pub fn new(
        chat: Option<Arc<dyn ChatPlatform>>,
        sheets: Option<Arc<dyn SheetService>>,
        store: Arc<dyn PuzzleStore>,
    ) -> Self {
        Self {
            chat,
            sheets,
            store,
            status_channel: DEFAULT_STATUS_CHANNEL.to_string(),
        }
    }

    #[must_use]
    pub fn with_status_channel(mut self, channel: impl Into<String>) -> Self {
        self.status_channel = channel.into();
        self
    }

    #[must_use]
    pub fn status_channel(&self) -> &str {
        &self.status_channel
    }

    pub(super) fn chat(&self) -> Result<&dyn ChatPlatform, HerringError> {
        self.chat.as_deref().ok_or(HerringError::ChatDisabled)
    }

    pub(super) fn sheets(&self) -> Result<&dyn SheetService, HerringError> {
        self.sheets.as_deref().ok_or(HerringError::SheetsDisabled)
    }

    /// Run one job to completion.
    ///
    /// # Errors
    ///
    /// Returns any failure the job does not absorb itself.
    pub async fn run(&self, job: &Job) -> Result<JobOutcome, HerringError> {
        match job {
            Job::PostAnswer { slug, answer } => self.post_answer(slug, answer).await,
            Job::PostUpdate { slug, field, value } => self.post_update(slug, field, value).await,
            Job::CreatePuzzleSheetAndChannel { slug } => {
                self.create_puzzle_sheet_and_channel(slug).await
            }
        }
    }
}
