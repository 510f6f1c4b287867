//! Liveness probe: the one function both HTTP endpoints call.

use std::sync::Arc;

use crate::health::policy::{Action, ResponsePolicy};
use crate::jokes::JokeFetcher;

/// Plain acknowledgement.
pub const PONG: &str = "pong!";

/// Combines the response policy with the joke fetcher.
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    policy: Arc<ResponsePolicy>,
    fetcher: JokeFetcher,
}

impl LivenessProbe {
    pub fn new(policy: ResponsePolicy, fetcher: JokeFetcher) -> Self {
        Self {
            policy: Arc::new(policy),
            fetcher,
        }
    }

    /// Produce the response line for one liveness request.
    pub async fn respond(&self) -> String {
        match self.policy.next_action() {
            Action::PlainPong => PONG.to_string(),
            Action::FetchJoke => self.fetcher.fetch_text().await,
        }
    }
}
