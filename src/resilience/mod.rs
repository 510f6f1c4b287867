//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Joke fetch:
//!     → rate_limit.rs (take a permit or short-circuit)
//!     → single upstream GET with a client-level timeout (jokes::client)
//!     → any failure degrades to a fallback line, never an error
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - No retries: one best-effort attempt per request
//! - The limiter protects the provider's quota, not our own clients

pub mod rate_limit;

pub use rate_limit::JokeRateLimiter;
