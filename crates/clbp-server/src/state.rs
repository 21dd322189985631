use std::path::PathBuf;
use std::sync::Arc;

use clbp_storage::store::DocumentStore;

use crate::config::ServerConfig;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub config: Arc<ServerConfig>,
    /// Where the installer writes configuration.
    pub config_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(store: DocumentStore, config: ServerConfig, config_path: PathBuf) -> Self {
        Self {
            store,
            config: Arc::new(config),
            config_path: Arc::new(config_path),
        }
    }
}
