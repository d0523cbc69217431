//! Lesson content gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────┐
//!                   │                  LESSON GATEWAY                  │
//!                   │                                                  │
//!   Client Request  │  ┌──────┐   ┌────────────┐   ┌──────────────┐    │
//!   ────────────────┼─▶│ CORS │──▶│ request ID │──▶│  dispatcher  │    │
//!                   │  └──────┘   │  + trace   │   │ (route table)│    │
//!                   │             └────────────┘   └──────┬───────┘    │
//!                   │                  │                  │            │
//!                   │                  ▼                  ▼            │
//!                   │           ┌────────────┐     ┌──────────────┐    │
//!                   │           │image relay │     │   upstream   │────┼──▶ Content API
//!                   │           └────────────┘     │    client    │    │
//!   Client Response │                              └──────┬───────┘    │
//!   ◀───────────────┼──────── response translation ◀──────┘            │
//!                   └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use lesson_gateway::config::{self, GatewayConfig};
use lesson_gateway::lifecycle::{signals, startup, Shutdown};
use lesson_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "lesson-gateway", version)]
#[command(about = "HTTP gateway for the lesson content API", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability);
    tracing::info!("lesson-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Arc::new(Shutdown::new());
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        });
    }

    startup::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
