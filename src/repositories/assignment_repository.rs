//! Assignment store access.
//!
//! Read paths run against the pool; every mutating method takes a
//! `&mut PgConnection` so the lifecycle engine can span assignment, booking
//! and token writes with a single transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::models::assignment::Assignment;
use crate::utils::errors::AppError;

/// Per-status job counts for a driver
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct JobCounts {
    pub new_count: i64,
    pub in_progress_count: i64,
    pub completed_count: i64,
    pub total_count: i64,
}

/// Today's assignment counts for the profile page
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TodayStats {
    pub total: i64,
    pub completed: i64,
    pub in_progress: i64,
    pub pending: i64,
}

/// Week/month/all-time totals for the profile page
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PeriodStats {
    pub total: i64,
    pub completed: i64,
}

/// Recently completed job line for the profile page
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RecentJobRow {
    pub booking_ref: String,
    pub passenger_name: Option<String>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub status: String,
    pub assigned_at: DateTime<Utc>,
}

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_booking_and_driver(
        &self,
        booking_ref: &str,
        driver_id: i64,
    ) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM driver_vehicle_assignments WHERE booking_ref = $1 AND driver_id = $2",
        )
        .bind(booking_ref)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(assignment)
    }

    /// Row-locked lookup for use inside a transaction; serializes concurrent
    /// transitions and token issuance on the same assignment.
    pub async fn lock_by_booking_and_driver(
        conn: &mut PgConnection,
        booking_ref: &str,
        driver_id: i64,
    ) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM driver_vehicle_assignments \
             WHERE booking_ref = $1 AND driver_id = $2 FOR UPDATE",
        )
        .bind(booking_ref)
        .bind(driver_id)
        .fetch_optional(conn)
        .await?;

        Ok(assignment)
    }

    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<Assignment>, AppError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM driver_vehicle_assignments WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(assignment)
    }

    pub async fn mark_in_progress(
        conn: &mut PgConnection,
        id: i64,
        started_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE driver_vehicle_assignments \
             SET status = 'in_progress', started_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(started_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: i64,
        completed_at: DateTime<Utc>,
        completion_type: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        notes: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE driver_vehicle_assignments \
             SET status = 'completed', completed_at = $2, completion_type = $3, \
                 completion_lat = $4, completion_lng = $5, completion_notes = $6 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(completed_at)
        .bind(completion_type)
        .bind(latitude)
        .bind(longitude)
        .bind(notes)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn count_by_status(&self, driver_id: i64) -> Result<JobCounts, AppError> {
        let counts = sqlx::query_as::<_, JobCounts>(
            "SELECT \
                COUNT(*) FILTER (WHERE status = 'assigned') AS new_count, \
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress_count, \
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_count, \
                COUNT(*) AS total_count \
             FROM driver_vehicle_assignments WHERE driver_id = $1",
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn today_stats(&self, driver_id: i64) -> Result<TodayStats, AppError> {
        let stats = sqlx::query_as::<_, TodayStats>(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE status = 'completed') AS completed, \
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress, \
                COUNT(*) FILTER (WHERE status = 'assigned') AS pending \
             FROM driver_vehicle_assignments \
             WHERE driver_id = $1 AND assigned_at::date = CURRENT_DATE",
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    pub async fn week_stats(&self, driver_id: i64) -> Result<PeriodStats, AppError> {
        self.period_stats(driver_id, "date_trunc('week', assigned_at) = date_trunc('week', now())")
            .await
    }

    pub async fn month_stats(&self, driver_id: i64) -> Result<PeriodStats, AppError> {
        self.period_stats(
            driver_id,
            "date_trunc('month', assigned_at) = date_trunc('month', now())",
        )
        .await
    }

    pub async fn all_time_stats(&self, driver_id: i64) -> Result<PeriodStats, AppError> {
        self.period_stats(driver_id, "TRUE").await
    }

    async fn period_stats(
        &self,
        driver_id: i64,
        period_clause: &str,
    ) -> Result<PeriodStats, AppError> {
        // period_clause is one of the fixed fragments above, never user input
        let sql = format!(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'completed') AS completed \
             FROM driver_vehicle_assignments \
             WHERE driver_id = $1 AND {}",
            period_clause
        );

        let stats = sqlx::query_as::<_, PeriodStats>(&sql)
            .bind(driver_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(stats)
    }

    pub async fn recent_completed(
        &self,
        driver_id: i64,
        limit: i64,
    ) -> Result<Vec<RecentJobRow>, AppError> {
        let rows = sqlx::query_as::<_, RecentJobRow>(
            "SELECT b.booking_ref, b.passenger_name, \
                    COALESCE(b.pickup_date_adjusted, b.pickup_date) AS pickup_date, \
                    dva.status, dva.assigned_at \
             FROM driver_vehicle_assignments dva \
             INNER JOIN bookings b ON dva.booking_ref = b.booking_ref \
             WHERE dva.driver_id = $1 AND dva.status = 'completed' \
             ORDER BY dva.assigned_at DESC \
             LIMIT $2",
        )
        .bind(driver_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
