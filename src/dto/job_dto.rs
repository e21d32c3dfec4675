use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::assignment::CompletionOutcome;
use crate::repositories::assignment_repository::JobCounts;
use crate::repositories::booking_repository::{JobDetailRow, JobSummaryRow};

#[derive(Debug, Deserialize, Validate)]
pub struct JobActionRequest {
    #[validate(length(min = 1, message = "Booking reference required"))]
    pub booking_ref: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteJobRequest {
    #[validate(length(min = 1, message = "Booking reference required"))]
    pub booking_ref: String,
    /// Outcome flag; defaults to a normal completion
    #[serde(default)]
    pub status: CompletionOutcome,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

/// Result of a lifecycle transition
#[derive(Debug, Serialize)]
pub struct JobTransitionResponse {
    pub booking_ref: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    /// all | assigned | in_progress | completed
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobRefQuery {
    /// Booking reference
    pub r#ref: String,
}

/// One row of the driver's job list with derived location labels
#[derive(Debug, Serialize)]
pub struct JobSummary {
    #[serde(flatten)]
    pub job: JobSummaryRow,
    pub pickup_location: String,
    pub dropoff_location: String,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobSummary>,
    pub counts: JobCounts,
    pub filter: String,
}

/// Full job detail with derived location labels
#[derive(Debug, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobDetailRow,
    pub pickup_location: String,
    pub dropoff_location: String,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub job: JobDetail,
}
