pub mod assignment;
pub mod booking;
pub mod driver;
pub mod tracking_token;
pub mod vehicle;
