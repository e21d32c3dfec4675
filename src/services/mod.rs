pub mod lifecycle_service;
pub mod tracking_service;
