//! Observability subsystem.
//!
//! Logging only: structured `tracing` events from every subsystem, plus
//! tower-http's request spans. There is no metrics endpoint.

pub mod logging;
