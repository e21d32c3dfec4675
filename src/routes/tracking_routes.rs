//! Token-authenticated tracking surface: the device proves itself with the
//! tracking token in the body, so no session middleware is applied here.

use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::tracking_controller::TrackingController;
use crate::dto::tracking_dto::{
    CompleteTrackingRequest, ReportLocationRequest, StartTrackingRequest, TrackingStatusResponse,
};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_tracking_router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start))
        .route("/location", post(location))
        .route("/complete", post(complete))
}

async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartTrackingRequest>,
) -> Result<Json<ApiResponse<TrackingStatusResponse>>, AppError> {
    let controller = TrackingController::new(state.pool.clone(), state.config.clone());
    let response = controller.start(request).await?;
    Ok(Json(response))
}

async fn location(
    State(state): State<AppState>,
    Json(request): Json<ReportLocationRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = TrackingController::new(state.pool.clone(), state.config.clone());
    let response = controller.report_location(request).await?;
    Ok(Json(response))
}

async fn complete(
    State(state): State<AppState>,
    Json(request): Json<CompleteTrackingRequest>,
) -> Result<Json<ApiResponse<TrackingStatusResponse>>, AppError> {
    let controller = TrackingController::new(state.pool.clone(), state.config.clone());
    let response = controller.complete(request).await?;
    Ok(Json(response))
}
