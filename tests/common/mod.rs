//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use amialive::config::Config;
use amialive::health::{LivenessProbe, ResponsePolicy};
use amialive::http::HttpServer;
use amialive::jokes::JokeFetcher;
use amialive::lifecycle::Shutdown;
use amialive::resilience::JokeRateLimiter;

/// Start a programmable mock upstream on an ephemeral port.
///
/// `f` receives the request line (e.g. `GET /joke/Any?safe-mode HTTP/1.1`)
/// and returns the status code and body to send.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let request_line = read_request_line(&mut socket).await;
                        let (status, body) = f(request_line).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a mock upstream that promises more body than it sends, then hangs up.
pub async fn start_truncating_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_request_line(&mut socket).await;
                let partial = "HTTP/1.1 200 OK\r\nContent-Length: 500\r\nConnection: close\r\n\r\n{\"type\": \"sing";
                let _ = socket.write_all(partial.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// An address nothing is listening on.
pub fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

async fn read_request_line(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = vec![0u8; 8192];
    let n = socket.read(&mut buf).await.unwrap_or(0);
    let text = String::from_utf8_lossy(&buf[..n]);
    text.lines().next().unwrap_or_default().to_string()
}

/// A running service under test.
pub struct TestService {
    pub addr: SocketAddr,
    pub limiter: Arc<JokeRateLimiter>,
    pub shutdown: Shutdown,
    pub server: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Config pointing the joke fetcher at `upstream`.
pub fn config_for(upstream: SocketAddr) -> Config {
    Config {
        joke_api_url: format!("http://{}/joke", upstream).parse().unwrap(),
        request_timeout: Duration::from_secs(2),
        ..Config::default()
    }
}

/// Wire and start the service the same way `main` does.
pub async fn start_service(config: Config) -> TestService {
    let config = Arc::new(config);
    let shutdown = Shutdown::new();

    let limiter = Arc::new(JokeRateLimiter::new(config.rate_limit_per_minute));
    tokio::spawn(limiter.clone().run_refill(shutdown.subscribe()));

    let fetcher = JokeFetcher::new(&config, limiter.clone()).unwrap();
    let policy = ResponsePolicy::with_rng(config.joke_chance_percent as i64, StdRng::seed_from_u64(11));
    let probe = LivenessProbe::new(policy, fetcher);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config, probe);
    let server = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestService {
        addr,
        limiter,
        shutdown,
        server,
    }
}

/// Client that never reuses connections or honours proxy env vars.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
