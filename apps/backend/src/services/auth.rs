//! Credential validation and token issuance.

use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::auth::jwt::mint_access_token;
use crate::auth::password::verify_password;
use crate::auth::role::Role;
use crate::entities::users;
use crate::error::AppError;
use crate::services::users::find_auth_account;
use crate::state::security_config::SecurityConfig;
use crate::web::request_ctx;

/// Check an email/password pair against the store.
///
/// Returns the matching active account, or `None` for unknown email,
/// deactivated account, and wrong password alike.
pub async fn validate_credentials(
    conn: &impl ConnectionTrait,
    email: &str,
    password: &str,
) -> Result<Option<users::Model>, AppError> {
    let account = match find_auth_account(conn, email).await? {
        Some(account) => account,
        None => {
            debug!(trace_id = %request_ctx::trace_id(), "login for unknown or inactive account");
            return Ok(None);
        }
    };

    if !verify_password(password, &account.password_hash) {
        debug!(trace_id = %request_ctx::trace_id(), user_id = account.id, "password mismatch");
        return Ok(None);
    }

    Ok(Some(account))
}

/// Validate credentials and mint an access token.
///
/// All credential failures collapse into the same 401 so responses
/// never reveal whether an email is registered.
pub async fn login(
    conn: &impl ConnectionTrait,
    email: &str,
    password: &str,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let account = validate_credentials(conn, email, password)
        .await?
        .ok_or_else(|| AppError::unauthorized("invalid credentials"))?;

    let role: Role = account
        .role
        .parse()
        .map_err(|_| AppError::internal(format!("account {} has an unknown role", account.id)))?;

    let token = mint_access_token(
        &account.id.to_string(),
        &account.name,
        &account.email,
        role,
        SystemTime::now(),
        security,
    )?;

    info!(user_id = account.id, "login succeeded");

    Ok(token)
}
