//! Shared application state injected into all handlers.

use std::sync::Arc;

use fibr_core::config::AppConfig;
use fibr_storage::Thumbnailer;
use fibr_service::{AccessService, CrudService};

/// Application state shared across all Axum handlers via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Access decisions.
    pub access: Arc<AccessService>,
    /// Reads and mutations of the served tree.
    pub crud: Arc<CrudService>,
    /// Thumbnail reads.
    pub thumbnailer: Thumbnailer,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: Arc<AppConfig>,
        access: Arc<AccessService>,
        crud: Arc<CrudService>,
        thumbnailer: Thumbnailer,
    ) -> Self {
        Self {
            config,
            access,
            crud,
            thumbnailer,
        }
    }

    /// Value of the `WWW-Authenticate` header sent with credential challenges.
    pub fn challenge(&self) -> String {
        format!("Basic realm=\"{}\" charset=\"UTF-8\"", self.config.auth.realm)
    }
}
