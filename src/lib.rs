//! amialive: a liveness endpoint with a sense of humour.

pub mod config;
pub mod health;
pub mod http;
pub mod jokes;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::Config;
pub use health::LivenessProbe;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
