//! Tracking token issuer.
//!
//! Mints and reuses the bounded-lifetime credential a driver's device uses
//! to push GPS samples without a session, and drives the token's own
//! pending → started → completed machine in lockstep with the assignment's.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;
use tracing::info;

use crate::config::EnvironmentConfig;
use crate::dto::tracking_dto::TrackingStatusResponse;
use crate::models::assignment::{AssignmentStatus, CompletionOutcome};
use crate::models::booking::Booking;
use crate::models::tracking_token::{TrackingToken, TrackingTokenStatus};
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::tracking_token_repository::TrackingTokenRepository;
use crate::services::lifecycle_service::{check_start_window, start_window_error, LifecycleService};
use crate::utils::errors::{AppError, AppResult};

/// 32 random bytes, hex-encoded: 256 bits of entropy
fn generate_token_value() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Token lifetime base: effective pickup, else whichever travel date the
/// booking carries, else now (a booking with no dates at all still gets a
/// usable token).
fn expiry_base(booking: &Booking, now: DateTime<Utc>) -> DateTime<Utc> {
    booking
        .effective_pickup()
        .or(booking.arrival_date)
        .or(booking.departure_date)
        .unwrap_or(now)
}

pub struct TrackingService {
    pool: PgPool,
    config: EnvironmentConfig,
    tokens: TrackingTokenRepository,
}

impl TrackingService {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            tokens: TrackingTokenRepository::new(pool.clone()),
            pool,
            config,
        }
    }

    /// Get-or-create: idempotent within the validity window. The assignment
    /// row lock serializes concurrent requests, so only one of two
    /// near-simultaneous calls mints and the other observes it.
    pub async fn get_or_create_token(
        &self,
        driver_id: i64,
        booking_ref: &str,
    ) -> AppResult<(TrackingToken, bool)> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let assignment =
            AssignmentRepository::lock_by_booking_and_driver(&mut tx, booking_ref, driver_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

        if let Some(existing) =
            TrackingTokenRepository::latest_for_assignment(&mut tx, assignment.id).await?
        {
            if !existing.is_expired_at(now) {
                tx.commit().await?;
                return Ok((existing, false));
            }
        }

        let booking = BookingRepository::fetch_by_ref(&mut tx, booking_ref)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        let expires_at = expiry_base(&booking, now) + Duration::days(self.config.token_grace_days);
        let token_value = generate_token_value();

        let token = TrackingTokenRepository::insert(
            &mut tx,
            &token_value,
            booking_ref,
            driver_id,
            assignment.vehicle_id,
            assignment.id,
            booking_ref, // vehicle identifier falls back to the booking ref
            self.config.tracking_interval_secs,
            expires_at,
        )
        .await?;

        tx.commit().await?;

        info!(booking_ref, driver_id, "tracking token minted");

        Ok((token, true))
    }

    /// Start tracking: pending → started (re-entrant when already started),
    /// pulling the owning assignment into in_progress in the same
    /// transaction if it has not been started yet. The start window applies
    /// here exactly as on the session surface.
    pub async fn start_tracking(&self, token_value: &str) -> AppResult<TrackingStatusResponse> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let token = Self::validated_token(
            TrackingTokenRepository::lock_by_token(&mut tx, token_value).await?,
            now,
        )?;

        let assignment = AssignmentRepository::lock_by_id(&mut tx, token.assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Tracking token {} references missing assignment {}",
                    token.id, token.assignment_id
                ))
            })?;

        match assignment.lifecycle_status()? {
            AssignmentStatus::Assigned => {
                let booking = BookingRepository::fetch_by_ref(&mut tx, &assignment.booking_ref)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

                check_start_window(
                    booking.effective_pickup(),
                    now,
                    self.config.start_window_before_hours,
                    self.config.start_window_after_hours,
                )
                .map_err(start_window_error)?;

                // Moves the assignment and every current pending token
                LifecycleService::start_assignment(&mut tx, assignment.id, now).await?;
            }
            AssignmentStatus::InProgress => {
                if token.tracking_status()? == TrackingTokenStatus::Pending {
                    TrackingTokenRepository::mark_started(&mut tx, token.id, now).await?;
                }
            }
            AssignmentStatus::Completed => {
                return Err(AppError::StateConflict("Job already completed".to_string()))
            }
        }

        tx.commit().await?;

        info!(booking_ref = %token.booking_ref, "tracking started");

        Ok(TrackingStatusResponse {
            booking_ref: token.booking_ref,
            status: TrackingTokenStatus::Started.as_str().to_string(),
        })
    }

    /// Record one GPS sample. Samples are independent best-effort writes:
    /// duplicates and out-of-order reports are accepted, but a completed or
    /// expired token is rejected rather than silently dropped.
    pub async fn report_location(
        &self,
        token_value: &str,
        latitude: f64,
        longitude: f64,
        accuracy: Option<f64>,
        status: Option<&str>,
    ) -> AppResult<()> {
        let now = Utc::now();
        let token = Self::validated_token(self.tokens.find_by_token(token_value).await?, now)?;

        self.tokens
            .insert_location(&token.token, latitude, longitude, accuracy, status)
            .await?;

        Ok(())
    }

    /// Complete tracking: the trigger that also completes the owning
    /// assignment and its booking mirror fields. Fast-forward from `pending`
    /// is allowed (immediate no-show without GPS).
    pub async fn complete_tracking(
        &self,
        token_value: &str,
        outcome: CompletionOutcome,
        latitude: Option<f64>,
        longitude: Option<f64>,
        notes: Option<&str>,
    ) -> AppResult<TrackingStatusResponse> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let token = Self::validated_token(
            TrackingTokenRepository::lock_by_token(&mut tx, token_value).await?,
            now,
        )?;

        let assignment = AssignmentRepository::lock_by_id(&mut tx, token.assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Tracking token {} references missing assignment {}",
                    token.id, token.assignment_id
                ))
            })?;

        if assignment.lifecycle_status()?.is_terminal() {
            return Err(AppError::StateConflict("Job already completed".to_string()));
        }

        // Completes the assignment, the booking mirror fields and every
        // current token (including this one) in one transaction.
        LifecycleService::complete_assignment(
            &mut tx, &assignment, outcome, latitude, longitude, notes, now,
        )
        .await?;

        tx.commit().await?;

        info!(booking_ref = %token.booking_ref, outcome = ?outcome, "tracking completed");

        Ok(TrackingStatusResponse {
            booking_ref: token.booking_ref,
            status: TrackingTokenStatus::Completed.as_str().to_string(),
        })
    }

    /// Shared credential validation. Unknown and expired are distinct
    /// errors; a terminal token rejects further operations.
    fn validated_token(
        token: Option<TrackingToken>,
        now: DateTime<Utc>,
    ) -> AppResult<TrackingToken> {
        let token = token.ok_or(AppError::TokenInvalid)?;

        if token.is_expired_at(now) {
            return Err(AppError::TokenExpired);
        }
        if token.tracking_status()?.is_terminal() {
            return Err(AppError::StateConflict(
                "Tracking already completed".to_string(),
            ));
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn booking_with_dates(
        pickup: Option<&str>,
        adjusted: Option<&str>,
        arrival: Option<&str>,
        departure: Option<&str>,
    ) -> Booking {
        let parse = |s: &str| s.parse::<DateTime<Utc>>().unwrap();
        Booking {
            booking_ref: "BK100".to_string(),
            passenger_name: None,
            passenger_phone: None,
            pax_total: None,
            pickup_date: pickup.map(parse),
            pickup_date_adjusted: adjusted.map(parse),
            arrival_date: arrival.map(parse),
            departure_date: departure.map(parse),
            booking_type: None,
            airport: None,
            from_airport: None,
            to_airport: None,
            accommodation_name: None,
            resort: None,
            pickup_address1: None,
            dropoff_address1: None,
            flight_no_arrival: None,
            flight_no_departure: None,
            internal_status: None,
            ht_status: None,
            raw_data: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_value_is_64_hex_chars() {
        let token = generate_token_value();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn token_values_do_not_repeat() {
        assert_ne!(generate_token_value(), generate_token_value());
    }

    #[test]
    fn adjusted_pickup_supersedes_original_for_expiry() {
        let booking = booking_with_dates(
            Some("2026-06-01T10:00:00Z"),
            Some("2026-06-01T14:00:00Z"),
            None,
            None,
        );
        assert_eq!(
            expiry_base(&booking, Utc::now()),
            "2026-06-01T14:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn expiry_falls_back_through_travel_dates() {
        let booking = booking_with_dates(None, None, Some("2026-06-02T09:30:00Z"), None);
        assert_eq!(
            expiry_base(&booking, Utc::now()),
            "2026-06-02T09:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn dateless_booking_gets_expiry_base_now() {
        let booking = booking_with_dates(None, None, None, None);
        let now = Utc::now();
        assert_eq!(expiry_base(&booking, now), now);
    }

    fn token_with(status: &str, expires_at: DateTime<Utc>) -> TrackingToken {
        TrackingToken {
            id: 1,
            token: generate_token_value(),
            booking_ref: "BK100".to_string(),
            driver_id: 7,
            vehicle_id: None,
            assignment_id: 11,
            vehicle_identifier: Some("BK100".to_string()),
            status: status.to_string(),
            tracking_interval: 30,
            started_at: None,
            completed_at: None,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unknown_and_expired_tokens_are_distinct_errors() {
        let now = Utc::now();
        assert!(matches!(
            TrackingService::validated_token(None, now),
            Err(AppError::TokenInvalid)
        ));
        let expired = token_with("pending", now - Duration::hours(1));
        assert!(matches!(
            TrackingService::validated_token(Some(expired), now),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn terminal_token_rejects_further_operations() {
        let now = Utc::now();
        let completed = token_with("completed", now + Duration::hours(1));
        assert!(matches!(
            TrackingService::validated_token(Some(completed), now),
            Err(AppError::StateConflict(_))
        ));
    }

    #[test]
    fn live_token_passes_validation() {
        let now = Utc::now();
        for status in ["pending", "started"] {
            let token = token_with(status, now + Duration::hours(1));
            assert!(TrackingService::validated_token(Some(token), now).is_ok());
        }
    }
}
