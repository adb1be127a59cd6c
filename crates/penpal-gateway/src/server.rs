//! Router assembly and the server loop.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use penpal_core::config::Config;
use penpal_providers::{create_provider, unauthenticated_provider, LlmProvider};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every endpoint mounted.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze_style", post(handlers::analyze_style))
        .route("/generate_letter", post(handlers::generate_letter))
        .route("/complete_letter", post(handlers::complete_letter))
        .route("/test", get(handlers::ping))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build handler state from loaded configuration.
///
/// A missing API key does not stop startup; requests go out
/// unauthenticated and the provider's rejection reaches the caller.
pub fn build_state(config: &Config) -> AppState {
    let settings = &config.letters;
    let providers = config.providers.to_map();

    let provider: Arc<dyn LlmProvider> = match create_provider(settings, &providers) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            warn!(error = %e, "starting without provider credentials");
            Arc::new(unauthenticated_provider(settings))
        }
    };

    info!(
        provider = provider.display_name(),
        model = provider.default_model(),
        language = %settings.language,
        "provider ready"
    );
    AppState::new(provider, settings.clone())
}

/// Serve on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish after the signal.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "gateway listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => error!(error = %e, "failed to listen for Ctrl+C"),
    }
}
