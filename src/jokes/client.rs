//! JokeAPI client.
//!
//! # Responsibilities
//! - Take a rate-limit permit before touching the network
//! - Issue one GET per joke, no retries
//! - Map every failure stage to its own fallback line
//!
//! # Design Decisions
//! - `fetch` never fails; callers always get something printable
//! - HTTP status is ignored, the body decides (JokeAPI reports errors in JSON)
//! - Timeout is enforced by the reqwest client for the whole exchange

use std::sync::Arc;

use reqwest::Client;
use url::Url;

use crate::config::Config;
use crate::jokes::category::JokeCategory;
use crate::jokes::types::{JokeResponse, JokeResult};
use crate::resilience::JokeRateLimiter;

/// Fetches jokes from the upstream provider behind a shared rate limiter.
#[derive(Debug, Clone)]
pub struct JokeFetcher {
    client: Client,
    base_url: Url,
    categories: Vec<JokeCategory>,
    safe_mode: bool,
    limiter: Arc<JokeRateLimiter>,
}

impl JokeFetcher {
    /// Build a fetcher from validated configuration.
    pub fn new(config: &Config, limiter: Arc<JokeRateLimiter>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("amialive/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.joke_api_url.clone(),
            categories: config.joke_categories.clone(),
            safe_mode: config.safe_mode,
            limiter,
        })
    }

    /// The upstream URL for the configured categories.
    pub fn joke_url(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&JokeCategory::join(&self.categories));
        }
        url.set_query(self.safe_mode.then_some("safe-mode"));
        url
    }

    /// Try to fetch one joke.
    pub async fn fetch(&self) -> JokeResult {
        if !self.limiter.try_acquire() {
            tracing::warn!(
                capacity = self.limiter.capacity(),
                "JokeAPI rate limit reached, skipping fetch"
            );
            return JokeResult::RateLimited;
        }

        let url = self.joke_url();
        tracing::debug!(url = %url, "Fetching joke");

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, timeout = e.is_timeout(), "Joke fetch failed");
                return JokeResult::FetchFailed;
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %url, status = %status, error = %e, "Failed to read joke body");
                return JokeResult::ReadFailed;
            }
        };

        let parsed = match JokeResponse::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(url = %url, status = %status, error = %e, "Unparsable joke payload");
                return JokeResult::ParseFailed;
            }
        };

        let result = JokeResult::from_response(parsed);
        if !result.is_joke() {
            tracing::debug!(url = %url, status = %status, "Upstream returned no joke");
        }
        result
    }

    /// Fetch and render as the line shown to clients.
    pub async fn fetch_text(&self) -> String {
        self.fetch().await.to_string()
    }
}
