//! Session-authenticated driver surface. The auth middleware is applied in
//! `main`; every handler receives the request-scoped driver identity.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::controllers::job_controller::JobController;
use crate::controllers::profile_controller::ProfileController;
use crate::dto::auth_dto::{ToggleOnlineRequest, ToggleOnlineResponse};
use crate::dto::job_dto::{
    CompleteJobRequest, JobActionRequest, JobDetailResponse, JobListQuery, JobListResponse,
    JobRefQuery, JobTransitionResponse,
};
use crate::dto::profile_dto::ProfileResponse;
use crate::dto::tracking_dto::TrackingTokenResponse;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedDriver;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/my-jobs", get(my_jobs))
        .route("/job-detail", get(job_detail))
        .route("/accept-job", post(accept_job))
        .route("/start-job", post(start_job))
        .route("/complete-job", post(complete_job))
        .route("/tracking-token", get(tracking_token))
        .route("/profile", get(profile))
        .route("/toggle-online", post(toggle_online))
}

async fn my_jobs(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<ApiResponse<JobListResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone());
    let response = controller.list_jobs(driver.driver_id, query.status).await?;
    Ok(Json(response))
}

async fn job_detail(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
    Query(query): Query<JobRefQuery>,
) -> Result<Json<ApiResponse<JobDetailResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone());
    let response = controller.job_detail(driver.driver_id, &query.r#ref).await?;
    Ok(Json(response))
}

async fn accept_job(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
    Json(request): Json<JobActionRequest>,
) -> Result<Json<ApiResponse<JobTransitionResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone());
    let response = controller.acknowledge(driver.driver_id, request).await?;
    Ok(Json(response))
}

async fn start_job(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
    Json(request): Json<JobActionRequest>,
) -> Result<Json<ApiResponse<JobTransitionResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone());
    let response = controller.start(driver.driver_id, request).await?;
    Ok(Json(response))
}

async fn complete_job(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
    Json(request): Json<CompleteJobRequest>,
) -> Result<Json<ApiResponse<JobTransitionResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone());
    let response = controller.complete(driver.driver_id, request).await?;
    Ok(Json(response))
}

async fn tracking_token(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
    Query(query): Query<JobRefQuery>,
) -> Result<Json<ApiResponse<TrackingTokenResponse>>, AppError> {
    let controller = JobController::new(state.pool.clone(), state.config.clone());
    let response = controller
        .tracking_token(driver.driver_id, &query.r#ref)
        .await?;
    Ok(Json(response))
}

async fn profile(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
) -> Result<Json<ApiResponse<ProfileResponse>>, AppError> {
    let controller = ProfileController::new(state.pool.clone());
    let response = controller.profile(driver.driver_id).await?;
    Ok(Json(response))
}

async fn toggle_online(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
    Json(request): Json<ToggleOnlineRequest>,
) -> Result<Json<ApiResponse<ToggleOnlineResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller
        .toggle_online(driver.driver_id, request.is_online)
        .await?;
    Ok(Json(response))
}
