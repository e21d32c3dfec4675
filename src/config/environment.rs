//! Environment configuration
//!
//! All tunables come from environment variables; `.env` is loaded in `main`
//! before this is constructed.

use std::env;

/// Runtime configuration for the dispatch service
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// How many hours before the effective pickup a job may be started
    pub start_window_before_hours: i64,
    /// How many hours after the effective pickup a job may still be started
    pub start_window_after_hours: i64,
    /// Tracking token lifetime past the effective pickup, in days
    pub token_grace_days: i64,
    /// Suggested GPS reporting interval handed to clients, in seconds
    pub tracking_interval_secs: i32,
}

impl EnvironmentConfig {
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            start_window_before_hours: env::var("START_WINDOW_BEFORE_HOURS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("START_WINDOW_BEFORE_HOURS must be a valid number"),
            start_window_after_hours: env::var("START_WINDOW_AFTER_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("START_WINDOW_AFTER_HOURS must be a valid number"),
            token_grace_days: env::var("TOKEN_GRACE_DAYS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .expect("TOKEN_GRACE_DAYS must be a valid number"),
            tracking_interval_secs: env::var("TRACKING_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("TRACKING_INTERVAL_SECS must be a valid number"),
        }
    }

    /// Fixed configuration for unit tests, no environment access
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            start_window_before_hours: 5,
            start_window_after_hours: 24,
            token_grace_days: 3,
            tracking_interval_secs: 30,
        }
    }
}
