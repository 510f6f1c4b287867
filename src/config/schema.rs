//! Configuration schema definitions.
//!
//! [`ServiceConfig`] is the raw, user-facing shape: every field has a default
//! and it deserializes from a TOML file. [`Config`] is the validated,
//! immutable value the rest of the service consumes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::jokes::JokeCategory;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_JOKE_CHANCE: i64 = 30;
pub const DEFAULT_JOKE_CATEGORY: &str = "Programming";
pub const DEFAULT_JOKES_PER_MINUTE: i64 = 60;
pub const DEFAULT_JOKE_API_URL: &str = "https://v2.jokeapi.dev/joke";
pub const DEFAULT_JOKE_TIMEOUT_SECS: u64 = 5;

/// Raw configuration as read from file, environment and flags.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Port to listen on (all interfaces).
    pub port: u16,

    /// Percentage chance (0-100) that a liveness request fetches a joke.
    pub joke_chance: i64,

    /// Comma-separated JokeAPI categories.
    pub joke_category: String,

    /// Ask the provider to exclude unsafe jokes.
    pub joke_safe_mode: bool,

    /// Max JokeAPI requests per minute (1-120).
    pub jokes_requests: i64,

    /// Base URL of the joke endpoint; categories are appended as a path segment.
    pub joke_api_url: String,

    /// Upstream request timeout in seconds.
    pub joke_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            joke_chance: DEFAULT_JOKE_CHANCE,
            joke_category: DEFAULT_JOKE_CATEGORY.to_string(),
            joke_safe_mode: true,
            jokes_requests: DEFAULT_JOKES_PER_MINUTE,
            joke_api_url: DEFAULT_JOKE_API_URL.to_string(),
            joke_timeout_secs: DEFAULT_JOKE_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

/// Validated runtime configuration. Immutable once built; share via `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Always within 0..=100.
    pub joke_chance_percent: u8,
    /// Never empty.
    pub joke_categories: Vec<JokeCategory>,
    pub safe_mode: bool,
    /// Always within 1..=120.
    pub rate_limit_per_minute: u32,
    pub joke_api_url: Url,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Config {
    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Categories as sent upstream, e.g. `Programming,Pun`.
    pub fn joke_category_path(&self) -> String {
        JokeCategory::join(&self.joke_categories)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            joke_chance_percent: DEFAULT_JOKE_CHANCE as u8,
            joke_categories: vec![JokeCategory::Programming],
            safe_mode: true,
            rate_limit_per_minute: DEFAULT_JOKES_PER_MINUTE as u32,
            joke_api_url: Url::parse(DEFAULT_JOKE_API_URL).expect("default joke API URL is valid"),
            request_timeout: Duration::from_secs(DEFAULT_JOKE_TIMEOUT_SECS),
            log_level: "info".to_string(),
        }
    }
}
