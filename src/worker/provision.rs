//! Sheet and channel provisioning for new puzzles.

use tracing::{error, info, warn};

use super::jobs::{JobOutcome, PuzzleJobs};
use crate::core::models::{JobKind, Puzzle};
use crate::errors::HerringError;
use crate::slack::messages::{channel_topic, new_puzzle_message, sheet_title};
use crate::slack::{ChatPlatform, PostOptions};
use crate::utils::links::strip_query_suffix;

/// Result of looking up the puzzle a provisioning job is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Success(Puzzle),
    /// The record may just not be visible yet; try again later.
    TransientFailure(String),
    PermanentFailure(String),
}

/// How the puzzle's channel came to be usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelReady {
    Created,
    /// Creation failed (usually `name_taken`) and the existing channel was joined.
    Joined,
}

/// Progress markers logged as provisioning advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionState {
    Started,
    LookupOk,
    LookupFailed,
    SheetCreated,
    UrlPersisted,
    ChannelReady(ChannelReady),
    TopicSet,
    Announced,
}

impl PuzzleJobs {
    /// Fetch the puzzle to provision.
    ///
    /// Any store failure, including not-found, is transient: the record may
    /// not be visible yet. A blank slug can never resolve, so it fails
    /// permanently instead of being retried.
    pub async fn lookup_for_provisioning(&self, slug: &str) -> LookupOutcome {
        if slug.trim().is_empty() {
            return LookupOutcome::PermanentFailure("empty slug".to_string());
        }

        match self.store.get_by_slug(slug).await {
            Ok(puzzle) => {
                info!(slug, state = ?ProvisionState::LookupOk, "provisioning");
                LookupOutcome::Success(puzzle)
            }
            Err(e) => {
                error!(
                    slug,
                    error = %e,
                    state = ?ProvisionState::LookupFailed,
                    "Failed to retrieve puzzle when creating sheet and channel (may be retried)"
                );
                LookupOutcome::TransientFailure(e.to_string())
            }
        }
    }

    /// Create the puzzle's spreadsheet and channel, then announce the puzzle.
    ///
    /// Only the initial lookup is retried (by returning `RetryLater`). Every
    /// later step fails the job outright, and earlier steps are not undone.
    ///
    /// # Errors
    ///
    /// Returns an error if chat or sheets are disabled, or if sheet creation,
    /// saving the puzzle, channel setup or the announcement fails.
    pub async fn create_puzzle_sheet_and_channel(
        &self,
        slug: &str,
    ) -> Result<JobOutcome, HerringError> {
        info!(slug, state = ?ProvisionState::Started, "create_puzzle_sheet_and_channel");

        let mut puzzle = match self.lookup_for_provisioning(slug).await {
            LookupOutcome::Success(puzzle) => puzzle,
            LookupOutcome::TransientFailure(reason) => return Ok(JobOutcome::RetryLater(reason)),
            LookupOutcome::PermanentFailure(reason) => {
                return Err(HerringError::JobFailed {
                    job: JobKind::CreatePuzzleSheetAndChannel.name(),
                    reason,
                });
            }
        };

        let sheets = self.sheets()?;
        let chat = self.chat()?;

        let title = sheet_title(&puzzle.identifier(), &puzzle.name);
        let created_url = sheets.create_spreadsheet(&title).await?;
        let sheet_url = strip_query_suffix(&created_url).to_string();
        info!(slug, sheet_url, state = ?ProvisionState::SheetCreated, "provisioning");

        puzzle.url = Some(sheet_url.clone());
        self.store.save(&puzzle).await?;
        info!(slug, state = ?ProvisionState::UrlPersisted, "provisioning");

        let (channel_id, ready) = create_or_join_channel(chat, slug).await?;
        info!(slug, channel_id, state = ?ProvisionState::ChannelReady(ready), "provisioning");

        let topic = channel_topic(&puzzle.name, &sheet_url, &puzzle.hunt_url);
        chat.set_topic(&channel_id, &topic).await?;
        info!(slug, state = ?ProvisionState::TopicSet, "provisioning");

        let status_channel_id = chat.join(self.status_channel()).await?;
        chat.post_message(
            &status_channel_id,
            &new_puzzle_message(&puzzle.name, slug),
            PostOptions::default(),
        )
        .await?;
        info!(slug, state = ?ProvisionState::Announced, "provisioning");

        Ok(JobOutcome::Completed)
    }
}

/// Create the channel named `name`, or join it if it already exists.
/// Creation is attempted exactly once.
async fn create_or_join_channel(
    chat: &dyn ChatPlatform,
    name: &str,
) -> Result<(String, ChannelReady), HerringError> {
    match chat.create_channel(name).await {
        Ok(channel_id) => Ok((channel_id, ChannelReady::Created)),
        Err(e) => {
            warn!(channel = name, error = %e, "Channel creation failed; joining existing channel");
            let channel_id = chat.join(name).await?;
            Ok((channel_id, ChannelReady::Joined))
        }
    }
}
