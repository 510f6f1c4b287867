//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → handlers.rs (/healthz, /healthcheck)
//!     → health::LivenessProbe
//!     → text/plain response
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
