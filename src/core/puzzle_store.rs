//! Access to puzzle records owned by the hunt web application.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::models::Puzzle;
use crate::errors::HerringError;

#[async_trait]
pub trait PuzzleStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `HerringError::PuzzleNotFound` when no puzzle has this slug, or
    /// another error when the store could not be reached.
    async fn get_by_slug(&self, slug: &str) -> Result<Puzzle, HerringError>;

    /// Persist the mutable fields of `puzzle` (currently only `url`).
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the update.
    async fn save(&self, puzzle: &Puzzle) -> Result<(), HerringError>;
}

/// Puzzle store backed by the web application's JSON API.
pub struct HttpPuzzleStore {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpPuzzleStore {
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(http: Client, base_url: &str, token: Option<String>) -> Result<Self, HerringError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HerringError::ConfigError(format!("PUZZLE_API_URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(HerringError::ConfigError(format!(
                "PUZZLE_API_URL is not a base URL: {base_url}"
            )));
        }
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    fn puzzle_url(&self, slug: &str) -> Result<Url, HerringError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| HerringError::ConfigError("PUZZLE_API_URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["api", "puzzles", slug]);
        Ok(url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl PuzzleStore for HttpPuzzleStore {
    async fn get_by_slug(&self, slug: &str) -> Result<Puzzle, HerringError> {
        let url = self.puzzle_url(slug)?;
        debug!(%url, "Fetching puzzle");
        let resp = self.authorize(self.http.get(url)).send().await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(HerringError::PuzzleNotFound(slug.to_string())),
            status if !status.is_success() => Err(HerringError::StoreError(format!(
                "GET puzzle {slug}: HTTP {status}"
            ))),
            _ => resp.json::<Puzzle>().await.map_err(|e| {
                HerringError::StoreError(format!("GET puzzle {slug}: invalid body: {e}"))
            }),
        }
    }

    async fn save(&self, puzzle: &Puzzle) -> Result<(), HerringError> {
        let url = self.puzzle_url(&puzzle.slug)?;
        let resp = self
            .authorize(self.http.patch(url))
            .json(&json!({ "url": puzzle.url }))
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Err(HerringError::PuzzleNotFound(puzzle.slug.clone())),
            status if !status.is_success() => Err(HerringError::StoreError(format!(
                "PATCH puzzle {}: HTTP {status}",
                puzzle.slug
            ))),
            _ => Ok(()),
        }
    }
}
