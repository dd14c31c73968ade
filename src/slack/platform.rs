//! The chat operations the puzzle jobs depend on.

use async_trait::async_trait;

use crate::errors::HerringError;

/// Delivery options for a posted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOptions {
    /// Turn `@name` and `#channel` into real mentions.
    pub expand_mentions: bool,
    /// Post as the token's user rather than as an app.
    pub as_acting_user: bool,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            expand_mentions: true,
            as_acting_user: true,
        }
    }
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Join the channel called `channel_name` and return its id. Joining a
    /// channel we are already in succeeds.
    async fn join(&self, channel_name: &str) -> Result<String, HerringError>;

    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        options: PostOptions,
    ) -> Result<(), HerringError>;

    /// Create a channel and return its id. Fails if the name is taken or invalid.
    async fn create_channel(&self, name: &str) -> Result<String, HerringError>;

    async fn set_topic(&self, channel_id: &str, topic: &str) -> Result<(), HerringError>;
}
