use std::sync::Arc;

use promptcraft_core::generation::GenerationClient;
use promptcraft_history::HistoryController;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upstream model client used by the stateless generate route.
    pub generator: Arc<dyn GenerationClient>,
    /// Generation workflow with the persisted prompt history.
    pub history: Arc<HistoryController>,
}
