use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Sign an HS256 bearer token for `user_id` that expires `ttl` from now.
pub fn issue_token(user_id: Uuid, ttl: Duration, secret: &str) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create access token: {}", e)))
}

/// Returns the subject of a valid token. Bad signature, malformed payload
/// and expiry all collapse to `InvalidToken`. Expiry is exact: no leeway.
pub fn verify_token(token: &str, secret: &str) -> AppResult<Uuid> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims.sub)
    .map_err(|e| {
        tracing::debug!(error = %e, "Token verification failed");
        AppError::InvalidToken
    })
}

/// Issue a token with the configured lifetime.
pub fn issue_access_token(user_id: Uuid, config: &Config) -> AppResult<String> {
    issue_token(
        user_id,
        Duration::seconds(config.jwt_ttl_secs),
        &config.jwt_secret,
    )
}
