// ABOUTME: Server binary for the workout agent HTTP API
// ABOUTME: Loads configuration, builds the shared context and serves until Ctrl-C or SIGTERM
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Workout Agent Server Binary
//!
//! Starts the fitness report API on `HOST:HTTP_PORT` (default `0.0.0.0:8000`).

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use workout_agent::{
    config::ServerConfig, constants::service_names, context::ServerContext, logging,
    routes::build_router,
};

#[derive(Parser)]
#[command(name = "workout-agent")]
#[command(about = "Workout Agent - personalized workout and nutrition plans")]
pub struct Args {
    /// Override bind address
    #[arg(long)]
    host: Option<String>,

    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // A missing .env file is normal outside development
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    config.generation.validate()?;

    logging::init_from_env()?;

    info!("Starting {}", service_names::API_TITLE);
    if dotenv_loaded {
        info!("Loaded environment overrides from .env");
    }
    info!("{}", config.summary());

    if !config.llm.has_api_key() {
        warn!("OPENAI_API_KEY not set; /analyze will fail until a key is configured");
    }

    let addr = format!("{}:{}", config.host, config.http_port);
    let context = ServerContext::from_config(config)?;
    let app = build_router(context);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on http://{addr}");
    info!("Endpoints:");
    info!("  GET  /         - API information");
    info!("  GET  /health   - Health check");
    info!("  POST /analyze  - Analyze fitness profile and get personalized plan");
    info!("  POST /bmr      - Calculate Basal Metabolic Rate");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("{} shut down", service_names::API_TITLE);
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
