//! Tracking token and location-sample access.
//!
//! Token lookups that precede a status write use `FOR UPDATE` so the token
//! and assignment state machines can advance together atomically.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::tracking_token::TrackingToken;
use crate::utils::errors::AppError;

pub struct TrackingTokenRepository {
    pool: PgPool,
}

impl TrackingTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Most recently created token for an assignment, inside a transaction
    pub async fn latest_for_assignment(
        conn: &mut PgConnection,
        assignment_id: i64,
    ) -> Result<Option<TrackingToken>, AppError> {
        let token = sqlx::query_as::<_, TrackingToken>(
            "SELECT * FROM driver_tracking_tokens \
             WHERE assignment_id = $1 \
             ORDER BY created_at DESC \
             LIMIT 1",
        )
        .bind(assignment_id)
        .fetch_optional(conn)
        .await?;

        Ok(token)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        conn: &mut PgConnection,
        token: &str,
        booking_ref: &str,
        driver_id: i64,
        vehicle_id: Option<i64>,
        assignment_id: i64,
        vehicle_identifier: &str,
        tracking_interval: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<TrackingToken, AppError> {
        let row = sqlx::query_as::<_, TrackingToken>(
            "INSERT INTO driver_tracking_tokens \
                (token, booking_ref, driver_id, vehicle_id, assignment_id, \
                 vehicle_identifier, status, tracking_interval, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8) \
             RETURNING *",
        )
        .bind(token)
        .bind(booking_ref)
        .bind(driver_id)
        .bind(vehicle_id)
        .bind(assignment_id)
        .bind(vehicle_identifier)
        .bind(tracking_interval)
        .bind(expires_at)
        .fetch_one(conn)
        .await?;

        Ok(row)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<TrackingToken>, AppError> {
        let row = sqlx::query_as::<_, TrackingToken>(
            "SELECT * FROM driver_tracking_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn lock_by_token(
        conn: &mut PgConnection,
        token: &str,
    ) -> Result<Option<TrackingToken>, AppError> {
        let row = sqlx::query_as::<_, TrackingToken>(
            "SELECT * FROM driver_tracking_tokens WHERE token = $1 FOR UPDATE",
        )
        .bind(token)
        .fetch_optional(conn)
        .await?;

        Ok(row)
    }

    /// pending → started; keeps the first `started_at` on re-entry
    pub async fn mark_started(
        conn: &mut PgConnection,
        id: i64,
        started_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE driver_tracking_tokens \
             SET status = 'started', started_at = COALESCE(started_at, $2) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(started_at)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Move the assignment's current (non-expired, non-terminal) token to
    /// `started`. Used by the session-surface start-job transition.
    pub async fn start_current_for_assignment(
        conn: &mut PgConnection,
        assignment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE driver_tracking_tokens \
             SET status = 'started', started_at = COALESCE(started_at, $2) \
             WHERE assignment_id = $1 AND status = 'pending' AND expires_at > $2",
        )
        .bind(assignment_id)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Close out the assignment's current token alongside a terminal
    /// assignment transition.
    pub async fn complete_current_for_assignment(
        conn: &mut PgConnection,
        assignment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE driver_tracking_tokens \
             SET status = 'completed', completed_at = $2 \
             WHERE assignment_id = $1 AND status IN ('pending', 'started') AND expires_at > $2",
        )
        .bind(assignment_id)
        .bind(now)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn insert_location(
        &self,
        token: &str,
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
        status: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO driver_tracking_locations (token, latitude, longitude, accuracy, status) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(token)
        .bind(latitude)
        .bind(longitude)
        .bind(accuracy)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
