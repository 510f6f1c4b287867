//! Joke provider integration.
//!
//! # Data Flow
//! ```text
//! JokeFetcher::fetch
//!     → JokeRateLimiter::try_acquire (denied → RateLimited)
//!     → GET {api_url}/{Cat1,Cat2}[?safe-mode]
//!     → JokeResponse (serde)
//!     → JokeResult → display line
//! ```

pub mod category;
pub mod client;
pub mod types;

pub use category::JokeCategory;
pub use client::JokeFetcher;
pub use types::{JokeResponse, JokeResult};
