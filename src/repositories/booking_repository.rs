//! Booking record access: completion-status writes and the joined read
//! surfaces for the driver's job list and job detail.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{Booking, INTERNAL_STATUS_COMPLETED};
use crate::utils::errors::AppError;
use crate::utils::locations::LocationFields;

/// One row of the driver's job list (booking + assignment + vehicle)
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct JobSummaryRow {
    pub booking_ref: String,
    pub passenger_name: Option<String>,
    pub passenger_phone: Option<String>,
    pub pax_total: Option<i32>,
    pub pickup_date_original: Option<DateTime<Utc>>,
    pub pickup_date_adjusted: Option<DateTime<Utc>>,
    /// Effective pickup: adjusted if present, else original
    pub pickup_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub departure_date: Option<DateTime<Utc>>,
    pub booking_type: Option<String>,
    pub airport: Option<String>,
    pub accommodation_name: Option<String>,
    pub resort: Option<String>,
    pub pickup_address1: Option<String>,
    pub dropoff_address1: Option<String>,
    pub from_airport: Option<String>,
    pub to_airport: Option<String>,
    pub flight_no_arrival: Option<String>,
    pub flight_no_departure: Option<String>,
    pub ht_status: Option<String>,
    pub internal_status: Option<String>,
    pub assignment_status: String,
    pub completion_type: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub registration: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
}

impl JobSummaryRow {
    pub fn location_fields(&self) -> LocationFields<'_> {
        LocationFields {
            booking_type: self.booking_type.as_deref(),
            has_arrival_date: self.arrival_date.is_some(),
            has_departure_date: self.departure_date.is_some(),
            accommodation_name: self.accommodation_name.as_deref(),
            resort: self.resort.as_deref(),
            airport: self.airport.as_deref(),
            from_airport: self.from_airport.as_deref(),
            to_airport: self.to_airport.as_deref(),
            pickup_address1: self.pickup_address1.as_deref(),
            dropoff_address1: self.dropoff_address1.as_deref(),
        }
    }
}

/// Full job detail row. `assignment_status` is None when the booking exists
/// but is not assigned to the requesting driver.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct JobDetailRow {
    pub booking_ref: String,
    pub passenger_name: Option<String>,
    pub passenger_phone: Option<String>,
    pub pax_total: Option<i32>,
    pub pickup_date_original: Option<DateTime<Utc>>,
    pub pickup_date_adjusted: Option<DateTime<Utc>>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub departure_date: Option<DateTime<Utc>>,
    pub booking_type: Option<String>,
    pub airport: Option<String>,
    pub from_airport: Option<String>,
    pub to_airport: Option<String>,
    pub accommodation_name: Option<String>,
    pub resort: Option<String>,
    pub pickup_address1: Option<String>,
    pub dropoff_address1: Option<String>,
    pub flight_no_arrival: Option<String>,
    pub flight_no_departure: Option<String>,
    pub internal_status: Option<String>,
    pub ht_status: Option<String>,
    pub raw_data: Option<serde_json::Value>,
    pub assignment_status: Option<String>,
    pub completion_type: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub registration: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub vehicle_description: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
}

impl JobDetailRow {
    pub fn location_fields(&self) -> LocationFields<'_> {
        LocationFields {
            booking_type: self.booking_type.as_deref(),
            has_arrival_date: self.arrival_date.is_some(),
            has_departure_date: self.departure_date.is_some(),
            accommodation_name: self.accommodation_name.as_deref(),
            resort: self.resort.as_deref(),
            airport: self.airport.as_deref(),
            from_airport: self.from_airport.as_deref(),
            to_airport: self.to_airport.as_deref(),
            pickup_address1: self.pickup_address1.as_deref(),
            dropoff_address1: self.dropoff_address1.as_deref(),
        }
    }
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Booking lookup inside a transaction
    pub async fn fetch_by_ref(
        conn: &mut PgConnection,
        booking_ref: &str,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_ref = $1")
            .bind(booking_ref)
            .fetch_optional(conn)
            .await?;

        Ok(booking)
    }

    /// Terminal-transition side effect; must run in the same transaction as
    /// the assignment write.
    pub async fn mark_completed(
        conn: &mut PgConnection,
        booking_ref: &str,
        ht_status: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET internal_status = $2, ht_status = $3 WHERE booking_ref = $1")
            .bind(booking_ref)
            .bind(INTERNAL_STATUS_COMPLETED)
            .bind(ht_status)
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn list_jobs_for_driver(
        &self,
        driver_id: i64,
        status_filter: Option<&str>,
    ) -> Result<Vec<JobSummaryRow>, AppError> {
        let rows = sqlx::query_as::<_, JobSummaryRow>(
            "SELECT \
                b.booking_ref, b.passenger_name, b.passenger_phone, b.pax_total, \
                b.pickup_date AS pickup_date_original, \
                b.pickup_date_adjusted, \
                COALESCE(b.pickup_date_adjusted, b.pickup_date) AS pickup_date, \
                b.arrival_date, b.departure_date, b.booking_type, \
                b.airport, b.accommodation_name, b.resort, \
                b.pickup_address1, b.dropoff_address1, \
                b.from_airport, b.to_airport, \
                b.flight_no_arrival, b.flight_no_departure, \
                b.ht_status, b.internal_status, \
                dva.status AS assignment_status, dva.completion_type, dva.assigned_at, \
                v.registration, v.brand, v.model, v.color \
             FROM driver_vehicle_assignments dva \
             INNER JOIN bookings b ON dva.booking_ref = b.booking_ref \
             LEFT JOIN vehicles v ON dva.vehicle_id = v.id \
             WHERE dva.driver_id = $1 \
               AND ($2::text IS NULL OR dva.status = $2) \
             ORDER BY COALESCE(b.pickup_date_adjusted, b.pickup_date) ASC",
        )
        .bind(driver_id)
        .bind(status_filter)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn job_detail(
        &self,
        booking_ref: &str,
        driver_id: i64,
    ) -> Result<Option<JobDetailRow>, AppError> {
        let row = sqlx::query_as::<_, JobDetailRow>(
            "SELECT \
                b.booking_ref, b.passenger_name, b.passenger_phone, b.pax_total, \
                b.pickup_date AS pickup_date_original, \
                b.pickup_date_adjusted, \
                COALESCE(b.pickup_date_adjusted, b.pickup_date) AS pickup_date, \
                b.arrival_date, b.departure_date, b.booking_type, \
                b.airport, b.from_airport, b.to_airport, \
                b.accommodation_name, b.resort, \
                b.pickup_address1, b.dropoff_address1, \
                b.flight_no_arrival, b.flight_no_departure, \
                b.internal_status, b.ht_status, b.raw_data, \
                dva.status AS assignment_status, dva.completion_type, dva.assigned_at, \
                v.registration, v.brand, v.model, v.color, \
                v.description AS vehicle_description, \
                d.name AS driver_name, d.phone_number AS driver_phone \
             FROM bookings b \
             LEFT JOIN driver_vehicle_assignments dva \
                    ON b.booking_ref = dva.booking_ref AND dva.driver_id = $2 \
             LEFT JOIN vehicles v ON dva.vehicle_id = v.id \
             LEFT JOIN drivers d ON dva.driver_id = d.id \
             WHERE b.booking_ref = $1",
        )
        .bind(booking_ref)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
