//! All Slack-specific functionality

pub mod client;
pub mod messages;
pub mod platform;

// Re-export main types for convenience
pub use client::SlackClient;
pub use platform::{ChatPlatform, PostOptions};
