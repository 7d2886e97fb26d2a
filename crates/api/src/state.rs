use std::sync::Arc;

use atelier_core::classify::Classifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: atelier_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Activity classifier. Injected so tests can substitute a
    /// deterministic implementation.
    pub classifier: Arc<dyn Classifier>,
}
