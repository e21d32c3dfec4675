use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{
    CheckResponse, DriverInfo, LoginRequest, LoginResponse, ToggleOnlineResponse,
};
use crate::dto::ApiResponse;
use crate::repositories::driver_repository::DriverRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt;

pub struct AuthController {
    drivers: DriverRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            drivers: DriverRepository::new(pool),
            config,
        }
    }

    /// Code-based driver login; successful login yields a bearer token
    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
        request.validate()?;

        let driver_code = request.driver_code.trim();

        let driver = self
            .drivers
            .find_by_code_or_id(driver_code)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid driver code".to_string()))?;

        if !driver.is_active() {
            return Err(AppError::Unauthorized(
                "Your account is inactive. Please contact administrator.".to_string(),
            ));
        }

        let token = jwt::generate_token(driver.id, &self.config)?;

        info!(driver_id = driver.id, "driver logged in");

        Ok(ApiResponse::success_with_message(
            LoginResponse {
                driver: DriverInfo::from(driver),
                token,
            },
            "Login successful".to_string(),
        ))
    }

    /// Session check: the middleware already re-verified the driver row
    pub async fn check(&self, driver_id: i64) -> AppResult<ApiResponse<CheckResponse>> {
        let driver = self
            .drivers
            .find_by_id(driver_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Driver not found".to_string()))?;

        Ok(ApiResponse::success(CheckResponse {
            driver: DriverInfo::from(driver),
        }))
    }

    /// Logout is a client-side token discard; this just acknowledges it
    pub fn logout(&self) -> ApiResponse<()> {
        ApiResponse::message_only("Logged out".to_string())
    }

    pub async fn toggle_online(
        &self,
        driver_id: i64,
        is_online: bool,
    ) -> AppResult<ApiResponse<ToggleOnlineResponse>> {
        self.drivers.set_online(driver_id, is_online).await?;

        let message = if is_online { "Online" } else { "Offline" };
        Ok(ApiResponse::success_with_message(
            ToggleOnlineResponse { is_online },
            message.to_string(),
        ))
    }
}
