use chrono::{DateTime, Utc};
use serde::Serialize;

/// Driver row. Provisioned administratively; read-only to this service
/// except for the online flag.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Driver {
    pub id: i64,
    pub code: Option<String>,
    pub username: Option<String>,
    pub name: String,
    pub phone_number: Option<String>,
    pub preferred_contact_method: Option<String>,
    pub license_number: Option<String>,
    pub status: String,
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
}

impl Driver {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}
