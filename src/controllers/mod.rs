pub mod auth_controller;
pub mod job_controller;
pub mod profile_controller;
pub mod tracking_controller;
