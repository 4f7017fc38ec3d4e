use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use promptcraft_api::config::ServerConfig;
use promptcraft_api::router::build_app_router;
use promptcraft_api::state::AppState;
use promptcraft_core::generation::GenerationClient;
use promptcraft_history::store::DEFAULT_STORAGE_KEY;
use promptcraft_history::{HistoryController, HistoryStore};
use promptcraft_llm::{GeminiClient, GeminiConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptcraft_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Upstream model ---
    let gemini_config = GeminiConfig::from_env();
    tracing::info!(model = %gemini_config.model, "Generation client configured");
    let generator: Arc<dyn GenerationClient> = Arc::new(GeminiClient::new(gemini_config));

    // --- History ---
    let storage = config
        .history
        .open_storage()
        .expect("Failed to open history storage");
    let store = HistoryStore::with_options(storage, DEFAULT_STORAGE_KEY, config.history.capacity);
    tracing::info!(
        backend = ?config.history.backend,
        path = %config.history.path.display(),
        records = store.records().len(),
        "History loaded",
    );
    let history = Arc::new(HistoryController::new(Arc::clone(&generator), store));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        generator,
        history,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
