use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{CheckResponse, LoginRequest, LoginResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedDriver};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/driver-check", get(check))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/driver-login", post(login))
        .route("/driver-logout", post(logout))
        .merge(protected)
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn check(
    State(state): State<AppState>,
    Extension(driver): Extension<AuthenticatedDriver>,
) -> Result<Json<ApiResponse<CheckResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    let response = controller.check(driver.driver_id).await?;
    Ok(Json(response))
}

async fn logout(State(state): State<AppState>) -> Json<ApiResponse<()>> {
    let controller = AuthController::new(state.pool.clone(), state.config.clone());
    Json(controller.logout())
}
