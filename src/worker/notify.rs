//! Answer and update announcements.

use tracing::{debug, info};

use super::jobs::{FailurePolicy, JobOutcome, PuzzleJobs};
use crate::errors::HerringError;
use crate::slack::PostOptions;
use crate::slack::messages::{
    answer_global_message, answer_local_message, update_global_message, update_local_message,
};

impl PuzzleJobs {
    /// Post to a puzzle's own channel, then to the status channel.
    ///
    /// The local post is best effort (the channel may well be archived by the
    /// time a late update arrives). The status post is not.
    ///
    /// # Errors
    ///
    /// Returns an error if chat is disabled or joining/posting to the status
    /// channel fails.
    pub async fn post_local_and_global(
        &self,
        local_channel: &str,
        local_message: &str,
        global_message: &str,
    ) -> Result<(), HerringError> {
        info!(local_channel, local_message, global_message, "post_local_and_global");
        let chat = self.chat()?;

        let local = async {
            let channel_id = chat.join(local_channel).await?;
            chat.post_message(&channel_id, local_message, PostOptions::default())
                .await
        };
        FailurePolicy::LogAndContinue.apply("Posting to local channel", local.await)?;

        let global = async {
            let channel_id = chat.join(self.status_channel()).await?;
            chat.post_message(&channel_id, global_message, PostOptions::default())
                .await
        };
        FailurePolicy::Propagate.apply("Posting to status channel", global.await)
    }

    /// Announce a confirmed answer.
    ///
    /// # Errors
    ///
    /// Fails if the puzzle does not exist or the status post fails.
    pub async fn post_answer(&self, slug: &str, answer: &str) -> Result<JobOutcome, HerringError> {
        info!(slug, answer, "post_answer");

        let puzzle = self.store.get_by_slug(slug).await?;
        let answer = answer.to_uppercase();
        let local_message = answer_local_message(&answer);
        let global_message = answer_global_message(&puzzle.name, slug, &answer);

        self.post_local_and_global(slug, &local_message, &global_message)
            .await?;
        Ok(JobOutcome::Completed)
    }

    /// Announce a change to one of a puzzle's fields. A puzzle that has since
    /// been deleted is skipped quietly.
    ///
    /// # Errors
    ///
    /// Fails if the store is unreachable or the status post fails.
    pub async fn post_update(
        &self,
        slug: &str,
        field: &str,
        value: &str,
    ) -> Result<JobOutcome, HerringError> {
        info!(slug, field, value, "post_update");

        let puzzle = match self.store.get_by_slug(slug).await {
            Ok(puzzle) => puzzle,
            Err(HerringError::PuzzleNotFound(_)) => {
                debug!(slug, "Puzzle no longer exists; skipping update");
                return Ok(JobOutcome::Skipped);
            }
            Err(e) => return Err(e),
        };
        let local_message = update_local_message(field, value);
        let global_message = update_global_message(&puzzle.name, slug, field, value);

        self.post_local_and_global(slug, &local_message, &global_message)
            .await?;
        Ok(JobOutcome::Completed)
    }
}
