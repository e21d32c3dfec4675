pub mod assignment_repository;
pub mod booking_repository;
pub mod driver_repository;
pub mod tracking_token_repository;
pub mod vehicle_repository;
