//! Driver session middleware.
//!
//! Extracts the bearer token, verifies it, re-checks the driver row is still
//! active and injects the request-scoped identity every engine operation
//! takes as an argument. Nothing downstream touches ambient session state.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    state::AppState,
    utils::errors::AppError,
    utils::jwt,
};

/// Authenticated driver identity injected into requests
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedDriver {
    pub driver_id: i64,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    let claims = jwt::verify_token(auth_header, &state.config)?;

    if claims.role != "driver" {
        return Err(AppError::Unauthorized("Not authenticated".to_string()));
    }

    let driver_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid driver id".to_string()))?;

    // Re-verify against the store: a deactivated driver's token stops
    // working immediately.
    let driver = sqlx::query_as::<_, crate::models::driver::Driver>(
        "SELECT * FROM drivers WHERE id = $1",
    )
    .bind(driver_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Driver not found".to_string()))?;

    if !driver.is_active() {
        return Err(AppError::Unauthorized(
            "Your account is inactive. Please contact administrator.".to_string(),
        ));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedDriver { driver_id: driver.id });

    Ok(next.run(request).await)
}
