use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::infra::db::require_db;
use crate::services;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    if body.email.trim().is_empty() {
        errors.push("the 'email' field must not be empty".to_string());
    }
    if body.password.is_empty() {
        errors.push("the 'password' field must not be empty".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let db = require_db(&state)?;
    let access_token =
        services::auth::login(db, body.email.trim(), &body.password, &state.security).await?;

    Ok(HttpResponse::Ok().json(LoginResponse { access_token }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/login").route(web::post().to(login)));
}
