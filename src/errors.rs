use slack_morphism::errors::SlackClientError;
use thiserror::Error;

/// Slack error codes that indicate a temporary condition worth retrying at the transport level.
const TRANSIENT_SLACK_CODES: &[&str] = &[
    "ratelimited",
    "internal_error",
    "fatal_error",
    "request_timeout",
    "service_unavailable",
];

#[derive(Debug, Error)]
pub enum HerringError {
    #[error("Failed to parse request: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Slack API {method} returned error: {code}")]
    SlackApi { method: String, code: String },

    #[error("Failed to create spreadsheet: {0}")]
    SheetError(String),

    #[error("Puzzle store request failed: {0}")]
    StoreError(String),

    #[error("No puzzle with slug '{0}'")]
    PuzzleNotFound(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Chat integration is disabled (no Slack token configured)")]
    ChatDisabled,

    #[error("Spreadsheet integration is disabled (no Google credentials configured)")]
    SheetsDisabled,

    #[error("Job {job} failed permanently: {reason}")]
    JobFailed { job: &'static str, reason: String },

    #[error("Job {job} gave up after {retries} retries: {reason}")]
    RetriesExhausted {
        job: &'static str,
        retries: u32,
        reason: String,
    },
}

impl HerringError {
    /// Slack error code, when the failure came back from the Slack Web API.
    #[must_use]
    pub fn slack_code(&self) -> Option<&str> {
        match self {
            HerringError::SlackApi { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Whether repeating the same request might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            HerringError::HttpError(_) => true,
            HerringError::SlackApi { code, .. } => TRANSIENT_SLACK_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}

impl From<SlackClientError> for HerringError {
    fn from(error: SlackClientError) -> Self {
        HerringError::ApiError(error.to_string())
    }
}

impl From<reqwest::Error> for HerringError {
    fn from(error: reqwest::Error) -> Self {
        HerringError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for HerringError {
    fn from(error: serde_json::Error) -> Self {
        HerringError::ParseError(error.to_string())
    }
}

// Generic implementation for AWS SDK errors
impl<E> From<aws_sdk_sqs::error::SdkError<E>> for HerringError
where
    E: std::fmt::Display,
{
    fn from(error: aws_sdk_sqs::error::SdkError<E>) -> Self {
        HerringError::AwsError(error.to_string())
    }
}
