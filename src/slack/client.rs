//! Slack API client module
//!
//! Implements [`ChatPlatform`] against the Slack Web API. Idempotent calls
//! (channel lookup, join, topic) are retried on transient failures; message
//! posts and channel creation are sent exactly once.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::SlackApiChatPostMessageRequest;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use super::platform::{ChatPlatform, PostOptions};
use crate::errors::HerringError;

const SLACK_API_BASE: &str = "https://slack.com/api";

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a HerringError at call sites.
static SLACK_CLIENT: std::sync::LazyLock<Option<SlackHyperClient>> =
    std::sync::LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

#[derive(Debug, Deserialize)]
struct ChannelSummary {
    id: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Deserialize)]
struct ConversationsListPage {
    #[serde(default)]
    channels: Vec<ChannelSummary>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

/// Slack channel names never carry the `#` users type in front of them.
#[must_use]
pub fn normalize_channel_name(name: &str) -> &str {
    name.trim().trim_start_matches('#')
}

/// Turn a Slack Web API response body into `Ok(body)` or the error code it carries.
fn check_ok(method: &str, body: Value) -> Result<Value, HerringError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        Ok(body)
    } else {
        Err(HerringError::SlackApi {
            method: method.to_string(),
            code: body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
        })
    }
}

fn channel_id_from(method: &str, body: &Value) -> Result<String, HerringError> {
    body.get("channel")
        .and_then(|c| c.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| HerringError::ApiError(format!("{method}: response has no channel id")))
}

/// Slack API client with retry logic and a channel-name cache.
pub struct SlackClient {
    token: SlackApiToken,
    channel_ids: RwLock<HashMap<String, String>>,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            channel_ids: RwLock::new(HashMap::new()),
        }
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, HerringError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, HerringError>> + Send,
        T: Send,
    {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(5);

        RetryIf::start(strategy, operation, |e: &HerringError| e.is_transient()).await
    }

    async fn call_api(&self, method: &str, payload: &Value) -> Result<Value, HerringError> {
        let resp = HTTP_CLIENT
            .post(format!("{SLACK_API_BASE}/{method}"))
            .bearer_auth(&self.token.token_value.0)
            .json(payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(HerringError::HttpError(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| HerringError::ApiError(format!("{method} JSON parse error: {e}")))?;

        check_ok(method, body)
    }

    async fn list_channels_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<ConversationsListPage, HerringError> {
        let mut query = vec![
            ("types", "public_channel,private_channel"),
            ("exclude_archived", "false"),
            ("limit", "1000"),
        ];
        if let Some(c) = cursor {
            query.push(("cursor", c));
        }

        let resp = HTTP_CLIENT
            .get(format!("{SLACK_API_BASE}/conversations.list"))
            .bearer_auth(&self.token.token_value.0)
            .query(&query)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(HerringError::HttpError(format!(
                "conversations.list HTTP {}",
                resp.status()
            )));
        }

        let body: Value = resp.json().await.map_err(|e| {
            HerringError::ApiError(format!("conversations.list JSON parse error: {e}"))
        })?;
        let body = check_ok("conversations.list", body)?;
        Ok(serde_json::from_value(body)?)
    }

    /// Look up a channel id by name, walking every page of `conversations.list`.
    ///
    /// # Errors
    ///
    /// Returns `SlackApi { code: "channel_not_found" }` if no channel has this name.
    pub async fn resolve_channel_id(&self, channel_name: &str) -> Result<String, HerringError> {
        let name = normalize_channel_name(channel_name);
        if let Some(id) = self.channel_ids.read().await.get(name) {
            return Ok(id.clone());
        }

        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .with_retry(|| self.list_channels_page(cursor.as_deref()))
                .await?;

            {
                let mut cache = self.channel_ids.write().await;
                for channel in &page.channels {
                    cache.insert(channel.name.clone(), channel.id.clone());
                }
            }
            if let Some(found) = page.channels.iter().find(|c| c.name == name) {
                return Ok(found.id.clone());
            }

            let next = page
                .response_metadata
                .map(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            match next {
                Some(c) => cursor = Some(c),
                None => {
                    return Err(HerringError::SlackApi {
                        method: "conversations.list".to_string(),
                        code: "channel_not_found".to_string(),
                    });
                }
            }
        }
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn join(&self, channel_name: &str) -> Result<String, HerringError> {
        let channel_id = self.resolve_channel_id(channel_name).await?;
        let payload = &json!({ "channel": channel_id });

        self.with_retry(|| async move {
            let body = self.call_api("conversations.join", payload).await?;
            channel_id_from("conversations.join", &body)
        })
        .await
    }

    async fn post_message(
        &self,
        channel_id: &str,
        text: &str,
        options: PostOptions,
    ) -> Result<(), HerringError> {
        let session = SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| HerringError::ApiError("Slack HTTP connector not initialized".into()))?
            .open_session(&self.token);

        let mut post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackMessageContent::new().with_text(text.to_string()),
        );
        if options.expand_mentions {
            post_req = post_req.with_link_names(true);
        }
        if options.as_acting_user {
            post_req = post_req.with_as_user(true);
        }

        session.chat_post_message(&post_req).await?;
        debug!(channel_id, "Posted message");
        Ok(())
    }

    async fn create_channel(&self, name: &str) -> Result<String, HerringError> {
        let name = normalize_channel_name(name);
        let body = self
            .call_api("conversations.create", &json!({ "name": name }))
            .await?;
        let channel_id = channel_id_from("conversations.create", &body)?;
        self.channel_ids
            .write()
            .await
            .insert(name.to_string(), channel_id.clone());
        Ok(channel_id)
    }

    async fn set_topic(&self, channel_id: &str, topic: &str) -> Result<(), HerringError> {
        let payload = &json!({ "channel": channel_id, "topic": topic });

        self.with_retry(|| async move {
            self.call_api("conversations.setTopic", payload).await?;
            Ok(())
        })
        .await
    }
}
