//! amialive
//!
//! Liveness endpoint that answers `pong!`, or now and then a joke from JokeAPI.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /healthz ──┐
//!                    ├─▶ LivenessProbe ─▶ ResponsePolicy (roll 0..100)
//!  GET /healthcheck ─┘         │
//!                              ▼ FetchJoke
//!                         JokeFetcher ─▶ JokeRateLimiter ─▶ JokeAPI
//!                                              ▲
//!                                  refill task (every 60s)
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use amialive::config::{resolve, validate, Cli, EnvOverrides};
use amialive::health::{LivenessProbe, ResponsePolicy};
use amialive::http::HttpServer;
use amialive::jokes::JokeFetcher;
use amialive::lifecycle::{signals, Shutdown};
use amialive::observability::logging;
use amialive::resilience::JokeRateLimiter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let env = EnvOverrides::from_env();
    let raw = resolve(&cli, &env)?;
    logging::init(&raw.log_level)?;

    tracing::info!("amialive v{} starting", env!("CARGO_PKG_VERSION"));

    // Config warnings need the subscriber, so report and validate after init.
    env.report_invalid();
    let config = match validate(raw) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        port = config.port,
        joke_chance = config.joke_chance_percent,
        categories = %config.joke_category_path(),
        safe_mode = config.safe_mode,
        rate_limit_per_minute = config.rate_limit_per_minute,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    // One limiter for the whole process.
    let limiter = Arc::new(JokeRateLimiter::new(config.rate_limit_per_minute));
    tokio::spawn(limiter.clone().run_refill(shutdown.subscribe()));

    let fetcher = JokeFetcher::new(&config, limiter)?;
    let policy = ResponsePolicy::new(config.joke_chance_percent as i64);
    let probe = LivenessProbe::new(policy, fetcher);

    let listener = TcpListener::bind(config.bind_address()).await?;
    let server = HttpServer::new(config, probe);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
