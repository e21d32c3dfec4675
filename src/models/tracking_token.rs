//! Tracking tokens: bounded-lifetime credentials scoped to one assignment,
//! letting a driver's device push GPS samples without a session.
//!
//! Status runs pending → started → completed with an orthogonal `expires_at`
//! cutoff; expired rows are kept for audit and rejected at use time.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingTokenStatus {
    Pending,
    Started,
    Completed,
}

impl TrackingTokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingTokenStatus::Pending => "pending",
            TrackingTokenStatus::Started => "started",
            TrackingTokenStatus::Completed => "completed",
        }
    }

    pub fn from_db(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(TrackingTokenStatus::Pending),
            "started" => Ok(TrackingTokenStatus::Started),
            "completed" => Ok(TrackingTokenStatus::Completed),
            other => Err(AppError::Internal(format!(
                "Unknown tracking token status '{}'",
                other
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TrackingTokenStatus::Completed)
    }
}

/// Tracking token row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TrackingToken {
    pub id: i64,
    pub token: String,
    pub booking_ref: String,
    pub driver_id: i64,
    pub vehicle_id: Option<i64>,
    pub assignment_id: i64,
    pub vehicle_identifier: Option<String>,
    pub status: String,
    pub tracking_interval: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TrackingToken {
    pub fn tracking_status(&self) -> AppResult<TrackingTokenStatus> {
        TrackingTokenStatus::from_db(&self.status)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> TrackingToken {
        TrackingToken {
            id: 1,
            token: "t".repeat(64),
            booking_ref: "BK100".to_string(),
            driver_id: 7,
            vehicle_id: None,
            assignment_id: 11,
            vehicle_identifier: Some("BK100".to_string()),
            status: "pending".to_string(),
            tracking_interval: 30,
            started_at: None,
            completed_at: None,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let token = token_expiring_at(now);
        assert!(token.is_expired_at(now));
        assert!(!token.is_expired_at(now - Duration::seconds(1)));
        assert!(token.is_expired_at(now + Duration::seconds(1)));
    }

    #[test]
    fn status_round_trips_through_db_representation() {
        for status in [
            TrackingTokenStatus::Pending,
            TrackingTokenStatus::Started,
            TrackingTokenStatus::Completed,
        ] {
            assert_eq!(TrackingTokenStatus::from_db(status.as_str()).unwrap(), status);
        }
    }
}
