pub mod auth_dto;
pub mod job_dto;
pub mod profile_dto;
pub mod response;
pub mod tracking_dto;

pub use response::ApiResponse;
