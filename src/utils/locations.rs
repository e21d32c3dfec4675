//! Pickup/dropoff label derivation.
//!
//! Bookings arrive from the supplier with raw location fields scattered
//! across accommodation, airport and freeform quote addresses; the label
//! pair shown to drivers is derived here. The list and detail read paths
//! share this single function.
//!
//! Rule order: arrival direction, departure direction, quote addresses with
//! a date-based fallback, then whatever location data is available. Labels
//! are never empty; unknown sides render as "Destination" or "-".

const PLACEHOLDER: &str = "-";
const AIRPORT_FALLBACK: &str = "Airport";
const ACCOMMODATION_FALLBACK: &str = "Resort/Hotel";
const DESTINATION_FALLBACK: &str = "Destination";

/// Raw booking fields the derivation reads
#[derive(Debug, Default, Clone)]
pub struct LocationFields<'a> {
    pub booking_type: Option<&'a str>,
    pub has_arrival_date: bool,
    pub has_departure_date: bool,
    pub accommodation_name: Option<&'a str>,
    pub resort: Option<&'a str>,
    pub airport: Option<&'a str>,
    pub from_airport: Option<&'a str>,
    pub to_airport: Option<&'a str>,
    pub pickup_address1: Option<&'a str>,
    pub dropoff_address1: Option<&'a str>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Derive the `(pickup_location, dropoff_location)` label pair for a booking.
///
/// Pure and deterministic: identical inputs always produce identical output.
pub fn derive_locations(fields: &LocationFields) -> (String, String) {
    let booking_type = fields.booking_type.unwrap_or("").to_lowercase();
    let accommodation = non_empty(fields.accommodation_name).or(non_empty(fields.resort));
    let airport = non_empty(fields.airport)
        .or(non_empty(fields.from_airport))
        .or(non_empty(fields.to_airport));

    let arrival_pair = || {
        (
            airport.unwrap_or(AIRPORT_FALLBACK).to_string(),
            accommodation.unwrap_or(ACCOMMODATION_FALLBACK).to_string(),
        )
    };
    let departure_pair = || {
        (
            accommodation.unwrap_or(ACCOMMODATION_FALLBACK).to_string(),
            airport.unwrap_or(AIRPORT_FALLBACK).to_string(),
        )
    };
    let known_fields_pair = || match (accommodation, airport) {
        // Both known: default to the departure direction
        (Some(acc), Some(air)) => (acc.to_string(), air.to_string()),
        (Some(acc), None) => (acc.to_string(), DESTINATION_FALLBACK.to_string()),
        (None, Some(air)) => (air.to_string(), DESTINATION_FALLBACK.to_string()),
        (None, None) => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
    };

    if booking_type.contains("arrival") || fields.has_arrival_date {
        arrival_pair()
    } else if booking_type.contains("departure") || fields.has_departure_date {
        departure_pair()
    } else if booking_type.contains("quote") {
        let pickup = non_empty(fields.pickup_address1);
        let dropoff = non_empty(fields.dropoff_address1);

        let (pickup, dropoff) = match (pickup, dropoff) {
            // No quote addresses at all: fall back to the date-based rules
            (None, None) => {
                if fields.has_arrival_date {
                    arrival_pair()
                } else if fields.has_departure_date {
                    departure_pair()
                } else {
                    known_fields_pair()
                }
            }
            (p, d) => (
                p.unwrap_or(PLACEHOLDER).to_string(),
                d.unwrap_or(PLACEHOLDER).to_string(),
            ),
        };
        (pickup, dropoff)
    } else {
        known_fields_pair()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn arrival_routes_airport_to_accommodation() {
        let fields = LocationFields {
            booking_type: Some("Arrival Transfer"),
            airport: Some("HKT"),
            accommodation_name: Some("Beach Resort"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("HKT".to_string(), "Beach Resort".to_string())
        );
    }

    #[test]
    fn departure_inverts_the_pair() {
        let fields = LocationFields {
            booking_type: Some("Departure Transfer"),
            airport: Some("HKT"),
            accommodation_name: Some("Beach Resort"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("Beach Resort".to_string(), "HKT".to_string())
        );
    }

    #[test]
    fn arrival_date_alone_forces_arrival_direction() {
        let fields = LocationFields {
            has_arrival_date: true,
            accommodation_name: Some("Villa Sunset"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("Airport".to_string(), "Villa Sunset".to_string())
        );
    }

    #[test]
    fn quote_uses_freeform_addresses() {
        let fields = LocationFields {
            booking_type: Some("quote"),
            pickup_address1: Some("123 Main St"),
            dropoff_address1: Some("456 Side St"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("123 Main St".to_string(), "456 Side St".to_string())
        );
    }

    #[test]
    fn quote_with_one_address_placeholders_the_other() {
        let fields = LocationFields {
            booking_type: Some("quote"),
            pickup_address1: Some("123 Main St"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("123 Main St".to_string(), "-".to_string())
        );
    }

    #[test]
    fn quote_without_addresses_falls_back_to_dates() {
        let fields = LocationFields {
            booking_type: Some("quote"),
            has_departure_date: true,
            accommodation_name: Some("Beach Resort"),
            airport: Some("HKT"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("Beach Resort".to_string(), "HKT".to_string())
        );
    }

    #[test]
    fn unclassified_defaults_to_departure_direction() {
        let fields = LocationFields {
            accommodation_name: Some("Beach Resort"),
            airport: Some("HKT"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("Beach Resort".to_string(), "HKT".to_string())
        );
    }

    #[test]
    fn single_known_field_pairs_with_destination() {
        let fields = LocationFields {
            airport: Some("HKT"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("HKT".to_string(), "Destination".to_string())
        );
    }

    #[test]
    fn resort_backs_up_missing_accommodation_name() {
        let fields = LocationFields {
            booking_type: Some("arrival"),
            resort: Some("Patong"),
            ..Default::default()
        };
        assert_eq!(
            derive_locations(&fields),
            ("Airport".to_string(), "Patong".to_string())
        );
    }

    #[test]
    fn nothing_known_renders_placeholders() {
        let fields = LocationFields::default();
        assert_eq!(derive_locations(&fields), ("-".to_string(), "-".to_string()));
    }

    fn opt_field() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[ -~]{0,20}")
    }

    proptest! {
        // Labels are never empty and the function is deterministic
        #[test]
        fn labels_never_empty_and_deterministic(
            booking_type in opt_field(),
            has_arrival in any::<bool>(),
            has_departure in any::<bool>(),
            accommodation in opt_field(),
            resort in opt_field(),
            airport in opt_field(),
            pickup_addr in opt_field(),
            dropoff_addr in opt_field(),
        ) {
            let fields = LocationFields {
                booking_type: booking_type.as_deref(),
                has_arrival_date: has_arrival,
                has_departure_date: has_departure,
                accommodation_name: accommodation.as_deref(),
                resort: resort.as_deref(),
                airport: airport.as_deref(),
                pickup_address1: pickup_addr.as_deref(),
                dropoff_address1: dropoff_addr.as_deref(),
                ..Default::default()
            };
            let (pickup, dropoff) = derive_locations(&fields);
            prop_assert!(!pickup.is_empty());
            prop_assert!(!dropoff.is_empty());
            prop_assert_eq!(derive_locations(&fields), (pickup, dropoff));
        }
    }
}
