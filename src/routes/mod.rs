pub mod auth_routes;
pub mod driver_routes;
pub mod tracking_routes;
