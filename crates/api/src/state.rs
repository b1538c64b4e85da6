use std::sync::Arc;

use qms_core::engine::ChecklistEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Checklist engine over the configured store.
    pub engine: ChecklistEngine,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
