//! JWT helpers for the driver session surface.
//!
//! The dispatch client exchanges a driver code for a bearer token; the
//! middleware re-verifies the driver row on every request, so the token only
//! carries identity, never authorization state.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::environment::EnvironmentConfig, utils::errors::AppError};

/// Claims carried in a driver session token
#[derive(Debug, Serialize, Deserialize)]
pub struct DriverClaims {
    pub sub: String, // driver_id
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Generate a session token for a driver
pub fn generate_token(driver_id: i64, config: &EnvironmentConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(config.jwt_expiration as i64);

    let claims = DriverClaims {
        sub: driver_id.to_string(),
        role: "driver".to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::Jwt(format!("Error generating token: {}", e)))
}

/// Verify and decode a session token
pub fn verify_token(token: &str, config: &EnvironmentConfig) -> Result<DriverClaims, AppError> {
    let token_data = decode::<DriverClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| AppError::Jwt(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EnvironmentConfig {
        EnvironmentConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration: 3600,
            ..EnvironmentConfig::for_tests()
        }
    }

    #[test]
    fn round_trips_driver_id() {
        let config = test_config();
        let token = generate_token(42, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "driver");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let config = test_config();
        let other = EnvironmentConfig {
            jwt_secret: "other-secret".to_string(),
            ..EnvironmentConfig::for_tests()
        };
        let token = generate_token(42, &other).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }
}
