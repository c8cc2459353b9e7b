//! Application state shared across all handlers and middleware.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use docwatch_core::config::ServerConfig;
use docwatch_core::traits::StoreHealth;
use docwatch_worker::JobControl;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Scheduler control for the expiry jobs.
    pub jobs: Arc<dyn JobControl>,
    /// Document store probe for `/health`.
    pub store: Arc<dyn StoreHealth>,
    /// Server configuration.
    pub server: Arc<ServerConfig>,
    /// When the state was built, for uptime reporting.
    pub started_at: Instant,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("server", &self.server)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state around a job controller and a store probe.
    pub fn new(
        jobs: Arc<dyn JobControl>,
        store: Arc<dyn StoreHealth>,
        server: ServerConfig,
    ) -> Self {
        Self {
            jobs,
            store,
            server: Arc::new(server),
            started_at: Instant::now(),
        }
    }
}
