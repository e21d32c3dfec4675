use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::driver::Driver;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Driver code is required"))]
    pub driver_code: String,
}

/// Public driver fields returned to the client
#[derive(Debug, Serialize)]
pub struct DriverInfo {
    pub id: i64,
    pub code: Option<String>,
    pub username: Option<String>,
    pub name: String,
    pub phone_number: Option<String>,
    pub status: String,
    pub is_online: bool,
}

impl From<Driver> for DriverInfo {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            code: driver.code,
            username: driver.username,
            name: driver.name,
            phone_number: driver.phone_number,
            status: driver.status,
            is_online: driver.is_online,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub driver: DriverInfo,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub driver: DriverInfo,
}

#[derive(Debug, Deserialize)]
pub struct ToggleOnlineRequest {
    pub is_online: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleOnlineResponse {
    pub is_online: bool,
}
