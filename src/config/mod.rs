//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags / environment (clap)      optional TOML file
//!     → loader.rs (merge sources over defaults into ServiceConfig)
//!     → validation.rs (normalize categories, clamp ranges, check URL)
//!     → Config (validated, immutable)
//!     → shared via Arc with the HTTP layer and the joke fetcher
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults so the service runs with no configuration
//! - Correctable anomalies are warnings; only unusable settings are errors

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve, Cli, ConfigError, EnvOverrides, InvalidEnvVar};
pub use schema::{Config, ServiceConfig};
pub use validation::{validate, ValidationError};
