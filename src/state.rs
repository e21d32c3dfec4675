//! Shared application state passed through the axum router.
//!
//! No in-process mutable state beyond the connection pool: concurrency
//! correctness rests on the store's transaction isolation, not on locks here.

use sqlx::PgPool;

use crate::config::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self { pool, config }
    }
}
