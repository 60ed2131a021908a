use std::sync::Arc;

use reviews_db::Stores;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and stores are reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reviews_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Revision and slug stores for every table.
    pub stores: Arc<Stores>,
}

impl AppState {
    pub fn new(pool: reviews_db::DbPool, config: ServerConfig) -> Self {
        Self {
            stores: Arc::new(Stores::new(pool.clone())),
            pool,
            config: Arc::new(config),
        }
    }
}
