//! Liveness subsystem.
//!
//! # Data Flow
//! ```text
//! /healthz or /healthcheck
//!     → probe.rs (LivenessProbe::respond)
//!     → policy.rs (roll against joke chance)
//!         PlainPong → "pong!"
//!         FetchJoke → jokes::JokeFetcher → joke or fallback line
//! ```
//!
//! # Design Decisions
//! - The probe never fails; every path yields a printable line
//! - One RNG per process, locked only for the roll

pub mod policy;
pub mod probe;

pub use policy::{decide, Action, ResponsePolicy};
pub use probe::{LivenessProbe, PONG};
