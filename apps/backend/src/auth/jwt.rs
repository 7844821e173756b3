use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::role::Role;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;
use crate::web::request_ctx;

/// Mint a signed access token whose lifetime comes from the security
/// configuration.
pub fn mint_access_token(
    sub: &str,
    name: &str,
    email: &str,
    role: Role,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("failed to get current time"))?
        .as_secs() as i64;

    let exp = iat + security.token_ttl.as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        iat,
        exp,
        iss: None,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("failed to encode JWT: {e}")))
}

/// Verify a token and return its claims.
///
/// Expired, mis-signed, and malformed tokens all fail with the same
/// 401; the concrete reason is logged, never reported to the caller.
/// Verification alone does not authorize anything: callers must still
/// re-fetch the account by subject and reject inactive accounts.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(trace_id = %request_ctx::trace_id(), reason = %e, "token verification failed");
        AppError::unauthorized("invalid or expired token")
    })
}
