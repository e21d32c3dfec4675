//! Token-authenticated tracking surface; no driver session involved.

use sqlx::PgPool;
use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::tracking_dto::{
    CompleteTrackingRequest, ReportLocationRequest, StartTrackingRequest, TrackingStatusResponse,
};
use crate::dto::ApiResponse;
use crate::services::tracking_service::TrackingService;
use crate::utils::errors::AppResult;

pub struct TrackingController {
    tracking: TrackingService,
}

impl TrackingController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            tracking: TrackingService::new(pool, config),
        }
    }

    pub async fn start(
        &self,
        request: StartTrackingRequest,
    ) -> AppResult<ApiResponse<TrackingStatusResponse>> {
        request.validate()?;

        let response = self.tracking.start_tracking(request.token.trim()).await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Tracking started".to_string(),
        ))
    }

    pub async fn report_location(
        &self,
        request: ReportLocationRequest,
    ) -> AppResult<ApiResponse<()>> {
        request.validate()?;

        self.tracking
            .report_location(
                request.token.trim(),
                request.latitude,
                request.longitude,
                request.accuracy,
                request.status.as_deref(),
            )
            .await?;

        Ok(ApiResponse::message_only("Location recorded".to_string()))
    }

    pub async fn complete(
        &self,
        request: CompleteTrackingRequest,
    ) -> AppResult<ApiResponse<TrackingStatusResponse>> {
        request.validate()?;

        let response = self
            .tracking
            .complete_tracking(
                request.token.trim(),
                request.status,
                request.latitude,
                request.longitude,
                request.notes.as_deref(),
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            response,
            "Tracking completed".to_string(),
        ))
    }
}
