//! Disposable Email Webhook
//!
//! Registration web-hook that rejects sign-ups using disposable email domains.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                  DISPOSABLE WEBHOOK                  │
//!                        │                                                      │
//!   Identity provider    │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ─────────────────────┼─▶│  http   │───▶│   auth   │───▶│   handlers     │   │
//!   POST /v1/validate    │  │ server  │    │ X-API-Key│    │ decode, answer │   │
//!                        │  └─────────┘    └──────────┘    └───────┬────────┘   │
//!                        │                                         │ read lock  │
//!                        │                                         ▼            │
//!                        │                                 ┌────────────────┐   │
//!                        │                                 │  DomainCache   │   │
//!                        │                                 │  (blocklist)   │   │
//!                        │                                 └───────▲────────┘   │
//!                        │                                         │ swap       │
//!                        │  ┌────────────────┐              ┌──────┴────────┐   │     List
//!                        │  │   lifecycle    │─ shutdown ──▶│   refresher   │◀──┼──── sources
//!                        │  │ signals, start │              │ (interval)    │   │   (HTTP GET)
//!                        │  └────────────────┘              └───────────────┘   │
//!                        │                                                      │
//!                        │  config (TOML + env)   observability (logs, metrics) │
//!                        └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use disposable_webhook::config::load_config;
use disposable_webhook::lifecycle::startup;
use disposable_webhook::observability::logging;

#[derive(Parser)]
#[command(name = "disposable-webhook")]
#[command(about = "Rejects registrations that use disposable email domains", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("disposable-webhook v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;
    Ok(())
}
