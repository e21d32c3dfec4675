//! Driver↔booking↔vehicle assignment: the lifecycle-bearing entity.
//!
//! Status moves assigned → in_progress → completed and never backward.
//! Rows are created by dispatch and only transitioned here, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::errors::{AppError, AppResult};

/// Lifecycle state of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    Assigned,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
        }
    }

    pub fn from_db(value: &str) -> AppResult<Self> {
        match value {
            "assigned" => Ok(AssignmentStatus::Assigned),
            "in_progress" => Ok(AssignmentStatus::InProgress),
            "completed" => Ok(AssignmentStatus::Completed),
            other => Err(AppError::Internal(format!(
                "Unknown assignment status '{}'",
                other
            ))),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Completed)
    }
}

/// Completion outcome reported by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompletionOutcome {
    #[default]
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "NO_SHOW")]
    NoShow,
}

impl CompletionOutcome {
    /// `completion_type` column value; NULL for a normal completion
    pub fn completion_type(&self) -> Option<&'static str> {
        match self {
            CompletionOutcome::Completed => None,
            CompletionOutcome::NoShow => Some("NO_SHOW"),
        }
    }

    /// Supplier-feed status code for this outcome
    pub fn ht_status(&self) -> &'static str {
        match self {
            CompletionOutcome::Completed => crate::models::booking::HT_STATUS_COMPLETED,
            CompletionOutcome::NoShow => crate::models::booking::HT_STATUS_NO_SHOW,
        }
    }
}

/// Assignment row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Assignment {
    pub id: i64,
    pub booking_ref: String,
    pub driver_id: i64,
    pub vehicle_id: Option<i64>,
    pub status: String,
    pub completion_type: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completion_lat: Option<f64>,
    pub completion_lng: Option<f64>,
    pub completion_notes: Option<String>,
}

impl Assignment {
    pub fn lifecycle_status(&self) -> AppResult<AssignmentStatus> {
        AssignmentStatus::from_db(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_db_representation() {
        for status in [
            AssignmentStatus::Assigned,
            AssignmentStatus::InProgress,
            AssignmentStatus::Completed,
        ] {
            assert_eq!(AssignmentStatus::from_db(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_an_internal_error() {
        assert!(AssignmentStatus::from_db("cancelled").is_err());
    }

    #[test]
    fn only_completed_is_terminal() {
        assert!(!AssignmentStatus::Assigned.is_terminal());
        assert!(!AssignmentStatus::InProgress.is_terminal());
        assert!(AssignmentStatus::Completed.is_terminal());
    }

    #[test]
    fn no_show_maps_to_distinct_codes() {
        assert_eq!(CompletionOutcome::NoShow.completion_type(), Some("NO_SHOW"));
        assert_eq!(CompletionOutcome::NoShow.ht_status(), "no_show");
        assert_eq!(CompletionOutcome::Completed.completion_type(), None);
        assert_eq!(CompletionOutcome::Completed.ht_status(), "completed");
    }
}
