mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::EnvironmentConfig;
use middleware::auth::auth_middleware;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚕 Transfer Dispatch - Driver API");
    info!("=================================");

    let config = EnvironmentConfig::from_env();
    info!("Environment: {}", config.environment);

    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Database connection failed: {}", e);
            return Err(e);
        }
    };

    let app_state = AppState::new(pool, config.clone());

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    };

    let driver_router = routes::driver_routes::create_driver_router()
        .route_layer(from_fn_with_state(app_state.clone(), auth_middleware));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/auth", routes::auth_routes::create_auth_router(app_state.clone()))
        .nest("/api/driver", driver_router)
        .nest("/api/tracking", routes::tracking_routes::create_tracking_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("🌐 Listening on http://{}", addr);
    info!("   POST /api/auth/driver-login - Driver login");
    info!("   GET  /api/driver/my-jobs - Assigned jobs");
    info!("   GET  /api/driver/job-detail?ref= - Job detail");
    info!("   POST /api/driver/accept-job - Acknowledge job");
    info!("   POST /api/driver/start-job - Start job");
    info!("   POST /api/driver/complete-job - Complete job");
    info!("   GET  /api/driver/tracking-token?ref= - Tracking token");
    info!("   GET  /api/driver/profile - Profile & statistics");
    info!("   POST /api/tracking/start|location|complete - GPS surface");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "transfer-dispatch"
    }))
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("shutdown signal received");
}
