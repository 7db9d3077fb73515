// Application state module
// Immutable per-process state shared across all connections

use crate::handler::pages::PageEngine;
use crate::handler::router::RouteTable;

use super::secret::SecretKey;
use super::types::Config;

/// Application state
///
/// Constructed once in `main` and shared as `Arc<AppState>`. Everything in
/// here is read-only after startup; request handling takes no locks.
pub struct AppState {
    pub config: Config,
    pub secret_key: SecretKey,
    pub routes: RouteTable,
    pub templates: PageEngine,
}

impl AppState {
    pub fn new(config: Config, secret_key: SecretKey) -> Self {
        let routes = RouteTable::from_config(&config.resources);
        let templates = PageEngine::new(&config.resources);

        Self {
            config,
            secret_key,
            routes,
            templates,
        }
    }
}
