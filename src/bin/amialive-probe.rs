//! Container health probe: exits 0 if the endpoint answers 2xx, 1 otherwise.
//!
//! Meant for `HEALTHCHECK CMD amialive-probe` in images without curl.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

#[derive(Parser)]
#[command(name = "amialive-probe")]
#[command(about = "Probe an amialive endpoint", long_about = None)]
struct Cli {
    /// Base URL of the running service
    #[arg(short, long, env = "AMIALIVE_URL", default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Endpoint path to probe
    #[arg(short, long, default_value = "/healthcheck")]
    path: String,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Don't print the response body
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match probe(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn probe(cli: &Cli) -> Result<bool, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .no_proxy()
        .build()?;

    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.path);
    let res = client.get(&url).send().await?;
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: {} returned status {}", url, status);
        if !body.is_empty() {
            eprintln!("Response: {}", body.trim_end());
        }
        return Ok(false);
    }

    if !cli.quiet {
        println!("{}", body.trim_end());
    }
    Ok(true)
}
