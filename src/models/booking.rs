use chrono::{DateTime, Utc};
use serde::Serialize;

/// Booking row sourced from the dispatch/supplier system.
///
/// All date columns are nullable; an absent date is `None`, never a sentinel
/// value. This service only writes the completion-related status fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Booking {
    pub booking_ref: String,
    pub passenger_name: Option<String>,
    pub passenger_phone: Option<String>,
    pub pax_total: Option<i32>,
    pub pickup_date: Option<DateTime<Utc>>,
    /// Driver-visible override; supersedes `pickup_date` for display and
    /// all lifecycle timing decisions.
    pub pickup_date_adjusted: Option<DateTime<Utc>>,
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
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Adjusted pickup time if present, else the original schedule
    pub fn effective_pickup(&self) -> Option<DateTime<Utc>> {
        self.pickup_date_adjusted.or(self.pickup_date)
    }
}

/// Internal booking status written alongside a terminal assignment
/// transition, always in the same transaction.
pub const INTERNAL_STATUS_COMPLETED: &str = "completed";

/// Supplier-feed status codes; completed and no-show map to distinct values.
pub const HT_STATUS_COMPLETED: &str = "completed";
pub const HT_STATUS_NO_SHOW: &str = "no_show";
