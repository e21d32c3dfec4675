//! Job lifecycle engine.
//!
//! Validates and atomically applies driver-initiated transitions across the
//! assignment, its booking and the assignment's tracking token. Every
//! mutating operation locks the assignment row, checks the precondition
//! against the current status, writes all affected rows and commits; any
//! failure rolls the whole transaction back.

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};

use crate::config::EnvironmentConfig;
use crate::dto::job_dto::JobTransitionResponse;
use crate::models::assignment::{Assignment, AssignmentStatus, CompletionOutcome};
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::tracking_token_repository::TrackingTokenRepository;
use crate::utils::errors::{AppError, AppResult};

/// Why a start attempt fell outside the allowed window
#[derive(Debug, PartialEq, Eq)]
pub enum StartWindowViolation {
    TooEarly { allowed_from: DateTime<Utc> },
    TooLate { allowed_until: DateTime<Utc> },
}

/// Server-side enforcement of the start window around the effective pickup
/// time. A booking without an effective pickup time is not gated.
pub fn check_start_window(
    effective_pickup: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    before_hours: i64,
    after_hours: i64,
) -> Result<(), StartWindowViolation> {
    let Some(pickup) = effective_pickup else {
        return Ok(());
    };

    let allowed_from = pickup - Duration::hours(before_hours);
    let allowed_until = pickup + Duration::hours(after_hours);

    if now < allowed_from {
        Err(StartWindowViolation::TooEarly { allowed_from })
    } else if now > allowed_until {
        Err(StartWindowViolation::TooLate { allowed_until })
    } else {
        Ok(())
    }
}

/// Driver-initiated transitions gated on the assignment's current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Complete,
}

/// Monotonic-lifecycle gate: each transition is legal from exactly one
/// status. Everything else is a conflict naming the actual state.
pub fn check_transition(
    current: AssignmentStatus,
    requested: Transition,
) -> Result<(), AppError> {
    match (requested, current) {
        (Transition::Start, AssignmentStatus::Assigned) => Ok(()),
        (Transition::Complete, AssignmentStatus::InProgress) => Ok(()),
        (Transition::Start, AssignmentStatus::InProgress) => Err(AppError::StateConflict(
            "Job already in progress".to_string(),
        )),
        (Transition::Complete, AssignmentStatus::Assigned) => Err(AppError::StateConflict(
            "Job must be in progress to complete".to_string(),
        )),
        (_, AssignmentStatus::Completed) => {
            Err(AppError::StateConflict("Job already completed".to_string()))
        }
    }
}

/// Caller-facing rendering of a window violation, shared by both start
/// surfaces.
pub(crate) fn start_window_error(violation: StartWindowViolation) -> AppError {
    match violation {
        StartWindowViolation::TooEarly { allowed_from } => AppError::StateConflict(format!(
            "Job cannot be started before {}",
            allowed_from.format("%Y-%m-%d %H:%M")
        )),
        StartWindowViolation::TooLate { allowed_until } => AppError::StateConflict(format!(
            "Job start window closed at {}",
            allowed_until.format("%Y-%m-%d %H:%M")
        )),
    }
}

pub struct LifecycleService {
    pool: PgPool,
    config: EnvironmentConfig,
    assignments: AssignmentRepository,
}

impl LifecycleService {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            assignments: AssignmentRepository::new(pool.clone()),
            pool,
            config,
        }
    }

    /// Accept-job: confirms the assignment exists for this driver and is
    /// still `assigned`. No state change; the client uses this to confirm
    /// receipt before committing to a start.
    pub async fn acknowledge(
        &self,
        driver_id: i64,
        booking_ref: &str,
    ) -> AppResult<JobTransitionResponse> {
        let assignment = self
            .assignments
            .find_by_booking_and_driver(booking_ref, driver_id)
            .await?
            .ok_or_else(|| self.assignment_not_found(booking_ref, driver_id))?;

        match assignment.lifecycle_status()? {
            AssignmentStatus::Assigned => Ok(JobTransitionResponse {
                booking_ref: booking_ref.to_string(),
                status: AssignmentStatus::Assigned.as_str().to_string(),
            }),
            other => Err(AppError::StateConflict(format!(
                "Job already accepted or in different state ({})",
                other.as_str()
            ))),
        }
    }

    /// Start-job: assigned → in_progress, moving the current tracking token
    /// to `started` in the same transaction.
    pub async fn start_job(
        &self,
        driver_id: i64,
        booking_ref: &str,
    ) -> AppResult<JobTransitionResponse> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let assignment =
            AssignmentRepository::lock_by_booking_and_driver(&mut tx, booking_ref, driver_id)
                .await?
                .ok_or_else(|| self.assignment_not_found(booking_ref, driver_id))?;

        check_transition(assignment.lifecycle_status()?, Transition::Start)?;

        let booking = BookingRepository::fetch_by_ref(&mut tx, booking_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        check_start_window(
            booking.effective_pickup(),
            now,
            self.config.start_window_before_hours,
            self.config.start_window_after_hours,
        )
        .map_err(start_window_error)?;

        Self::start_assignment(&mut tx, assignment.id, now).await?;
        tx.commit().await?;

        info!(booking_ref, driver_id, "job started");

        Ok(JobTransitionResponse {
            booking_ref: booking_ref.to_string(),
            status: AssignmentStatus::InProgress.as_str().to_string(),
        })
    }

    /// Complete-job: in_progress → completed with an outcome flag. The
    /// booking mirror fields and the current tracking token are written in
    /// the same transaction.
    pub async fn complete_job(
        &self,
        driver_id: i64,
        booking_ref: &str,
        outcome: CompletionOutcome,
        latitude: Option<f64>,
        longitude: Option<f64>,
        notes: Option<&str>,
    ) -> AppResult<JobTransitionResponse> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let assignment =
            AssignmentRepository::lock_by_booking_and_driver(&mut tx, booking_ref, driver_id)
                .await?
                .ok_or_else(|| self.assignment_not_found(booking_ref, driver_id))?;

        check_transition(assignment.lifecycle_status()?, Transition::Complete)?;

        Self::complete_assignment(&mut tx, &assignment, outcome, latitude, longitude, notes, now)
            .await?;
        tx.commit().await?;

        info!(booking_ref, driver_id, outcome = ?outcome, "job completed");

        Ok(JobTransitionResponse {
            booking_ref: booking_ref.to_string(),
            status: AssignmentStatus::Completed.as_str().to_string(),
        })
    }

    /// Shared start transition: assignment → in_progress plus the current
    /// tracking token → started. Callers hold the assignment row lock.
    pub(crate) async fn start_assignment(
        conn: &mut PgConnection,
        assignment_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        AssignmentRepository::mark_in_progress(conn, assignment_id, now).await?;
        TrackingTokenRepository::start_current_for_assignment(conn, assignment_id, now).await?;
        Ok(())
    }

    /// The single terminal domain operation: assignment → completed, booking
    /// mirror fields, and the current tracking token, all on one connection
    /// inside the caller's transaction. Both the session surface and the
    /// token surface funnel through here.
    pub(crate) async fn complete_assignment(
        conn: &mut PgConnection,
        assignment: &Assignment,
        outcome: CompletionOutcome,
        latitude: Option<f64>,
        longitude: Option<f64>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        AssignmentRepository::mark_completed(
            conn,
            assignment.id,
            now,
            outcome.completion_type(),
            latitude,
            longitude,
            notes,
        )
        .await?;
        BookingRepository::mark_completed(conn, &assignment.booking_ref, outcome.ht_status())
            .await?;
        TrackingTokenRepository::complete_current_for_assignment(conn, assignment.id, now).await?;
        Ok(())
    }

    /// Absence and wrong-driver are indistinguishable to the caller so one
    /// driver cannot probe another driver's jobs; the distinction only lands
    /// in the server log.
    fn assignment_not_found(&self, booking_ref: &str, driver_id: i64) -> AppError {
        debug!(booking_ref, driver_id, "assignment lookup failed for driver");
        AppError::NotFound("Assignment not found".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pickup() -> DateTime<Utc> {
        "2026-06-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn window_allows_between_bounds() {
        let now = "2026-06-01T08:00:00Z".parse().unwrap();
        assert_eq!(check_start_window(Some(pickup()), now, 5, 24), Ok(()));
    }

    #[test]
    fn window_rejects_too_early() {
        let now = "2026-06-01T06:59:59Z".parse().unwrap();
        let allowed_from = "2026-06-01T07:00:00Z".parse().unwrap();
        assert_eq!(
            check_start_window(Some(pickup()), now, 5, 24),
            Err(StartWindowViolation::TooEarly { allowed_from })
        );
    }

    #[test]
    fn window_rejects_too_late() {
        let now = "2026-06-02T12:00:01Z".parse().unwrap();
        let allowed_until = "2026-06-02T12:00:00Z".parse().unwrap();
        assert_eq!(
            check_start_window(Some(pickup()), now, 5, 24),
            Err(StartWindowViolation::TooLate { allowed_until })
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let lower = "2026-06-01T07:00:00Z".parse().unwrap();
        let upper = "2026-06-02T12:00:00Z".parse().unwrap();
        assert_eq!(check_start_window(Some(pickup()), lower, 5, 24), Ok(()));
        assert_eq!(check_start_window(Some(pickup()), upper, 5, 24), Ok(()));
    }

    #[test]
    fn missing_pickup_time_is_not_gated() {
        assert_eq!(check_start_window(None, Utc::now(), 5, 24), Ok(()));
    }

    fn conflict_message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::StateConflict(message)) => message,
            other => panic!("expected state conflict, got {:?}", other),
        }
    }

    #[test]
    fn start_is_only_legal_from_assigned() {
        assert!(check_transition(AssignmentStatus::Assigned, Transition::Start).is_ok());
        assert_eq!(
            conflict_message(check_transition(
                AssignmentStatus::InProgress,
                Transition::Start
            )),
            "Job already in progress"
        );
        assert_eq!(
            conflict_message(check_transition(
                AssignmentStatus::Completed,
                Transition::Start
            )),
            "Job already completed"
        );
    }

    #[test]
    fn complete_is_only_legal_from_in_progress() {
        assert!(check_transition(AssignmentStatus::InProgress, Transition::Complete).is_ok());
        assert_eq!(
            conflict_message(check_transition(
                AssignmentStatus::Assigned,
                Transition::Complete
            )),
            "Job must be in progress to complete"
        );
        assert_eq!(
            conflict_message(check_transition(
                AssignmentStatus::Completed,
                Transition::Complete
            )),
            "Job already completed"
        );
    }

    #[test]
    fn window_violations_render_as_state_conflicts() {
        let allowed_from = pickup() - Duration::hours(5);
        let early = start_window_error(StartWindowViolation::TooEarly { allowed_from });
        match early {
            AppError::StateConflict(message) => {
                assert_eq!(message, "Job cannot be started before 2026-06-01 07:00")
            }
            other => panic!("expected state conflict, got {:?}", other),
        }

        let allowed_until = pickup() + Duration::hours(24);
        let late = start_window_error(StartWindowViolation::TooLate { allowed_until });
        match late {
            AppError::StateConflict(message) => {
                assert_eq!(message, "Job start window closed at 2026-06-02 12:00")
            }
            other => panic!("expected state conflict, got {:?}", other),
        }
    }
}
