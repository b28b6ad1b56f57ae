//! Webhook HTTP server: router, client wiring, and graceful shutdown.

use crate::channels::LinkedInClient;
use crate::config::Settings;
use crate::llm::OpenAiClient;
use crate::webhook::handler::{webhook, WebhookState};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Routes: `GET /` health, `POST /webhook`.
pub fn build_router(state: WebhookState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/webhook", post(webhook))
        .with_state(state)
}

fn completion_client(settings: &Settings) -> OpenAiClient {
    OpenAiClient::new(
        Some(settings.openai_base_url.clone()),
        settings.openai_api_key.clone(),
        settings.openai_model.clone(),
        settings.max_tokens,
    )
}

/// Build handler state with the given completion client and a LinkedIn client.
fn state_from_settings(settings: &Settings, completion: OpenAiClient) -> WebhookState {
    let poster = LinkedInClient::new(
        Some(settings.linkedin_api_base.clone()),
        settings.linkedin_access_token.clone(),
        settings.linkedin_organization_id.clone(),
    );
    WebhookState {
        completion: Arc::new(completion),
        poster: Arc::new(poster),
        webhook_secret: Arc::from(settings.webhook_secret.as_str()),
        completion_timeout: settings.completion_timeout,
        posting_timeout: settings.posting_timeout,
        port: settings.port,
    }
}

/// Run the webhook server on settings.bind:settings.port. Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(settings: Settings) -> Result<()> {
    let completion = completion_client(&settings);
    log::info!(
        "completion model {}, replying as organization {}",
        completion.model(),
        settings.linkedin_organization_id
    );
    let state = state_from_settings(&settings, completion);
    let bind_addr = settings.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("server running on {}", bind_addr);
    serve(listener, build_router(state)).await
}

/// Serve `app` on an already-bound listener until SIGINT/SIGTERM; in-flight requests drain first.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<WebhookState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.port,
    }))
}
