//! Configuration validation.
//!
//! # Responsibilities
//! - Normalize the category list against the whitelist
//! - Clamp the joke chance and the per-minute rate limit into range
//! - Reject settings that cannot be corrected (upstream URL, zero timeout)
//!
//! # Design Decisions
//! - Out-of-range numbers and unknown categories are corrected with a warning,
//!   never fatal
//! - Validation is a pure function apart from those warnings:
//!   ServiceConfig → Result<Config, ValidationError>

use std::time::Duration;

use url::Url;

use crate::config::schema::{Config, ServiceConfig};
use crate::jokes::JokeCategory;

/// Lower bound for JokeAPI requests per minute.
pub const MIN_RATE_LIMIT: u32 = 1;
/// Upper bound for JokeAPI requests per minute (the provider's own quota).
pub const MAX_RATE_LIMIT: u32 = 120;

/// Settings that cannot be corrected automatically.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid joke API URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("joke request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Keep the whitelisted categories from a comma-separated list.
///
/// Order and duplicates are preserved. Falls back to `[Any]` when nothing
/// matches.
pub fn validate_categories(raw: &str) -> Vec<JokeCategory> {
    let categories: Vec<JokeCategory> = raw
        .split(',')
        .filter_map(|token| token.parse::<JokeCategory>().ok())
        .collect();

    if categories.is_empty() {
        tracing::warn!(raw = %raw, "No valid JOKE_CATEGORY found, defaulting to Any");
        return vec![JokeCategory::Any];
    }

    categories
}

/// Clamp the per-minute limit into `MIN_RATE_LIMIT..=MAX_RATE_LIMIT`.
pub fn clamp_rate_limit(raw: i64) -> u32 {
    let clamped = raw.clamp(MIN_RATE_LIMIT as i64, MAX_RATE_LIMIT as i64) as u32;
    if clamped as i64 != raw {
        tracing::warn!(raw, clamped, "JOKES_REQUESTS out of range, clamped");
    }
    clamped
}

/// Clamp the joke percentage into `0..=100`.
pub fn clamp_joke_chance(raw: i64) -> u8 {
    let clamped = raw.clamp(0, 100) as u8;
    if clamped as i64 != raw {
        tracing::warn!(raw, clamped, "JOKE_CHANCE out of range, clamped");
    }
    clamped
}

fn validate_api_url(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidApiUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {:?}", other))),
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    Ok(url)
}

/// Turn a raw configuration into a validated [`Config`].
pub fn validate(raw: ServiceConfig) -> Result<Config, ValidationError> {
    let joke_api_url = validate_api_url(&raw.joke_api_url)?;
    if raw.joke_timeout_secs == 0 {
        return Err(ValidationError::ZeroTimeout);
    }

    Ok(Config {
        port: raw.port,
        joke_chance_percent: clamp_joke_chance(raw.joke_chance),
        joke_categories: validate_categories(&raw.joke_category),
        safe_mode: raw.joke_safe_mode,
        rate_limit_per_minute: clamp_rate_limit(raw.jokes_requests),
        joke_api_url,
        request_timeout: Duration::from_secs(raw.joke_timeout_secs),
        log_level: raw.log_level,
    })
}
