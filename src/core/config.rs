use std::env;

/// Name of the shared channel that receives every puzzle lifecycle announcement.
pub const DEFAULT_STATUS_CHANNEL: &str = "puzzle-status";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub task_queue_url: String,
    pub puzzle_api_url: String,
    pub puzzle_api_token: Option<String>,
    /// User token for Slack. Bots can't create or join channels the way we need,
    /// so this is a token logged in as a real user. `None` disables chat.
    pub slack_user_token: Option<String>,
    pub google_access_token: Option<String>,
    pub sheet_template_id: Option<String>,
    pub sheet_folder_id: Option<String>,
    pub event_signing_secret: Option<String>,
    pub status_channel: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            task_queue_url: env::var("TASK_QUEUE_URL")
                .map_err(|e| format!("TASK_QUEUE_URL: {}", e))?,
            puzzle_api_url: env::var("PUZZLE_API_URL")
                .map_err(|e| format!("PUZZLE_API_URL: {}", e))?,
            puzzle_api_token: non_empty_var("PUZZLE_API_TOKEN"),
            slack_user_token: non_empty_var("SLACK_USER_TOKEN"),
            google_access_token: non_empty_var("GOOGLE_ACCESS_TOKEN"),
            sheet_template_id: non_empty_var("SHEET_TEMPLATE_ID"),
            sheet_folder_id: non_empty_var("SHEET_FOLDER_ID"),
            event_signing_secret: non_empty_var("EVENT_SIGNING_SECRET"),
            status_channel: non_empty_var("STATUS_CHANNEL")
                .unwrap_or_else(|| DEFAULT_STATUS_CHANNEL.to_string()),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
