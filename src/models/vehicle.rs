use chrono::{DateTime, Utc};
use serde::Serialize;

/// Vehicle row, read-only to this service
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub registration: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub default_driver_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
