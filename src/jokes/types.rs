//! Upstream payload and fetch outcomes.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Body returned by `GET /joke/{categories}`.
///
/// Every field is optional on the wire; missing or `null` ones take their
/// defaults so that an error payload (which carries no `type`) still parses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JokeResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub error: bool,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub setup: String,
    #[serde(deserialize_with = "null_as_default")]
    pub delivery: String,
    #[serde(deserialize_with = "null_as_default")]
    pub joke: String,
}

impl JokeResponse {
    /// Parse a response body. A bare `null` body is an empty record.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let parsed: Option<JokeResponse> = serde_json::from_slice(body)?;
        Ok(parsed.unwrap_or_default())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JokeResult {
    Single(String),
    TwoPart { setup: String, delivery: String },
    /// Limiter denied the permit; no request was sent.
    RateLimited,
    /// Connect error or timeout.
    FetchFailed,
    /// The response body could not be read to the end.
    ReadFailed,
    /// The body was not a joke record.
    ParseFailed,
    /// Parsed, but flagged as an error or of an unknown type.
    EmptyResult,
}

impl JokeResult {
    /// Classify a parsed upstream record.
    pub fn from_response(response: JokeResponse) -> Self {
        if response.error {
            return JokeResult::EmptyResult;
        }
        match response.kind.as_str() {
            "single" => JokeResult::Single(response.joke),
            "twopart" => JokeResult::TwoPart {
                setup: response.setup,
                delivery: response.delivery,
            },
            _ => JokeResult::EmptyResult,
        }
    }

    /// True if an actual joke was obtained.
    pub fn is_joke(&self) -> bool {
        matches!(self, JokeResult::Single(_) | JokeResult::TwoPart { .. })
    }
}

impl fmt::Display for JokeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JokeResult::Single(joke) => write!(f, "😂 {}", joke),
            JokeResult::TwoPart { setup, delivery } => write!(f, "😏 {}\n🤣 {}", setup, delivery),
            JokeResult::RateLimited => f.write_str("pong! (JokeAPI rate limit reached, try later 😅)"),
            JokeResult::FetchFailed => f.write_str("pong! (couldn't fetch a joke 😢)"),
            JokeResult::ReadFailed => f.write_str("pong! (error reading joke 😢)"),
            JokeResult::ParseFailed => f.write_str("pong! (bad joke format 🤔)"),
            JokeResult::EmptyResult => f.write_str("pong! (no joke found 😅)"),
        }
    }
}
