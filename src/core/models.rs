use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// SQS refuses message delays longer than 15 minutes.
pub const MAX_QUEUE_DELAY: Duration = Duration::from_secs(900);

/// A puzzle as exposed by the hunt web application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub slug: String,
    pub name: String,
    pub round_number: u32,
    pub number: u32,
    pub hunt_url: String,
    /// Spreadsheet link, set once during provisioning.
    #[serde(default)]
    pub url: Option<String>,
}

impl Puzzle {
    /// Short code such as `3.14` (round, then puzzle number).
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}.{}", self.round_number, self.number)
    }
}

/// Work items carried over the task queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job", rename_all = "snake_case")]
pub enum Job {
    PostAnswer {
        slug: String,
        answer: String,
    },
    PostUpdate {
        slug: String,
        field: String,
        value: String,
    },
    CreatePuzzleSheetAndChannel {
        slug: String,
    },
}

impl Job {
    #[must_use]
    pub fn kind(&self) -> JobKind {
        match self {
            Job::PostAnswer { .. } => JobKind::PostAnswer,
            Job::PostUpdate { .. } => JobKind::PostUpdate,
            Job::CreatePuzzleSheetAndChannel { .. } => JobKind::CreatePuzzleSheetAndChannel,
        }
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Job::PostAnswer { slug, .. }
            | Job::PostUpdate { slug, .. }
            | Job::CreatePuzzleSheetAndChannel { slug } => slug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    PostAnswer,
    PostUpdate,
    CreatePuzzleSheetAndChannel,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [
        JobKind::PostAnswer,
        JobKind::PostUpdate,
        JobKind::CreatePuzzleSheetAndChannel,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            JobKind::PostAnswer => "post_answer",
            JobKind::PostUpdate => "post_update",
            JobKind::CreatePuzzleSheetAndChannel => "create_puzzle_sheet_and_channel",
        }
    }

    /// Rate limit and retry policy registered for this job type.
    #[must_use]
    pub fn policy(self) -> JobPolicy {
        match self {
            // Slack throttles chat.postMessage hard; stay at one post job every 2s.
            JobKind::PostAnswer | JobKind::PostUpdate => JobPolicy {
                min_interval: Duration::from_secs(2),
                max_retries: 0,
                retry_delay: Duration::ZERO,
            },
            JobKind::CreatePuzzleSheetAndChannel => JobPolicy {
                min_interval: Duration::from_secs(4),
                max_retries: 10,
                retry_delay: Duration::from_secs(5),
            },
        }
    }
}

/// Queue metadata declared for a job type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPolicy {
    /// At most one invocation per this interval.
    pub min_interval: Duration,
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each later one.
    pub retry_delay: Duration,
}

impl JobPolicy {
    /// Delay before re-running a job that has already consumed `attempt` retries.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.retry_delay
            .checked_mul(factor)
            .map_or(MAX_QUEUE_DELAY, |d| d.min(MAX_QUEUE_DELAY))
    }
}

/// Envelope serialized into each queue message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedJob {
    pub correlation_id: String,
    /// Retries already consumed by this job.
    #[serde(default)]
    pub attempt: u32,
    #[serde(flatten)]
    pub job: Job,
}

impl QueuedJob {
    #[must_use]
    pub fn new(job: Job) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            attempt: 0,
            job,
        }
    }

    /// The same job, scheduled as its next retry.
    #[must_use]
    pub fn next_attempt(&self) -> Self {
        Self {
            correlation_id: self.correlation_id.clone(),
            attempt: self.attempt + 1,
            job: self.job.clone(),
        }
    }
}

/// Events posted by the hunt web application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PuzzleEvent {
    AnswerConfirmed {
        slug: String,
        answer: String,
    },
    PuzzleUpdated {
        slug: String,
        field: String,
        value: String,
    },
    PuzzleCreated {
        slug: String,
    },
}

impl From<PuzzleEvent> for Job {
    fn from(event: PuzzleEvent) -> Self {
        match event {
            PuzzleEvent::AnswerConfirmed { slug, answer } => Job::PostAnswer { slug, answer },
            PuzzleEvent::PuzzleUpdated { slug, field, value } => {
                Job::PostUpdate { slug, field, value }
            }
            PuzzleEvent::PuzzleCreated { slug } => Job::CreatePuzzleSheetAndChannel { slug },
        }
    }
}
