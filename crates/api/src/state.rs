use std::sync::Arc;

use stringdesk_core::settings::EngineSnapshot;
use tokio::sync::RwLock;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stringdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Pricing configuration and catalog, swapped whole on reload.
    engine: Arc<RwLock<Arc<EngineSnapshot>>>,
}

impl AppState {
    /// Build the state and load the first engine snapshot.
    pub async fn new(
        pool: stringdesk_db::DbPool,
        config: ServerConfig,
    ) -> Result<Self, sqlx::Error> {
        let snapshot = stringdesk_db::snapshot::load_snapshot(&pool).await?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            engine: Arc::new(RwLock::new(Arc::new(snapshot))),
        })
    }

    /// The snapshot current at call time. Later reloads do not affect it.
    pub async fn engine(&self) -> Arc<EngineSnapshot> {
        Arc::clone(&*self.engine.read().await)
    }

    /// Re-read settings, tariff and catalog from the database.
    pub async fn reload_engine(&self) -> Result<Arc<EngineSnapshot>, sqlx::Error> {
        let snapshot = Arc::new(stringdesk_db::snapshot::load_snapshot(&self.pool).await?);
        *self.engine.write().await = Arc::clone(&snapshot);
        Ok(snapshot)
    }
}
