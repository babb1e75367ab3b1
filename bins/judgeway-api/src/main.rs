mod handlers;
mod metrics;
mod routes;

use anyhow::Context;
use axum::Router;
use judgeway_common::config::{SandboxConfig, ServiceConfig};
use judgeway_common::recorder::SubmissionRecorder;
use judgeway_common::redis::RedisSubmissionRecorder;
use judgeway_sandbox::{BatchRunner, ExecutionClient};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub struct AppState {
    pub runner: BatchRunner,
    pub recorder: Arc<dyn SubmissionRecorder>,
}

impl AppState {
    pub fn client(&self) -> &ExecutionClient {
        self.runner.client()
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new().merge(routes::routes()).with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Judgeway API booting...");

    let service_config = ServiceConfig::from_env().context("Invalid service configuration")?;
    let sandbox_config = SandboxConfig::from_env().context("Invalid sandbox configuration")?;

    info!(
        sandbox = %sandbox_config.api_url,
        rapidapi = sandbox_config.api_key.is_some(),
        base64 = sandbox_config.base64_encoded,
        poll_interval_ms = sandbox_config.poll_interval.as_millis() as u64,
        max_poll_attempts = sandbox_config.max_poll_attempts,
        "Sandbox configured"
    );

    let client = ExecutionClient::from_config(&sandbox_config)
        .context("Failed to build sandbox client")?;

    let recorder = RedisSubmissionRecorder::connect(
        &service_config.redis_url,
        service_config.submission_ttl_seconds,
    )
    .await
    .context("Failed to connect to Redis")?;

    info!("Connected to Redis: {}", service_config.redis_url);

    let state = Arc::new(AppState {
        runner: BatchRunner::new(client),
        recorder: Arc::new(recorder),
    });

    let listener = TcpListener::bind(&service_config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", service_config.bind_addr))?;

    info!("HTTP server listening on {}", service_config.bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Judgeway API shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::warn!("Received shutdown signal, finishing in-flight requests...");
}
