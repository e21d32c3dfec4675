use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::assignment::CompletionOutcome;
use crate::models::tracking_token::TrackingToken;

/// Tracking token handed to the driver's device
#[derive(Debug, Serialize)]
pub struct TrackingTokenResponse {
    pub token: String,
    pub status: String,
    pub tracking_interval: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    /// False when an existing non-expired token was reused
    pub is_new: bool,
}

impl TrackingTokenResponse {
    pub fn from_token(token: TrackingToken, is_new: bool) -> Self {
        Self {
            token: token.token,
            status: token.status,
            tracking_interval: token.tracking_interval,
            started_at: token.started_at,
            completed_at: token.completed_at,
            expires_at: token.expires_at,
            is_new,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartTrackingRequest {
    #[validate(length(min = 1, message = "Token required"))]
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReportLocationRequest {
    #[validate(length(min = 1, message = "Token required"))]
    pub token: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub accuracy: Option<f64>,
    /// Client-side phase tag, recorded verbatim (e.g. BEFORE_PICKUP)
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteTrackingRequest {
    #[validate(length(min = 1, message = "Token required"))]
    pub token: String,
    #[serde(default)]
    pub status: CompletionOutcome,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

/// Result of a token-driven transition
#[derive(Debug, Serialize)]
pub struct TrackingStatusResponse {
    pub booking_ref: String,
    pub status: String,
}
