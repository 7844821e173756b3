use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::auth::role::Role;
use crate::error::AppError;
use crate::extractors::{Principal, ValidatedJson};
use crate::infra::db::require_db;
use crate::pagination::PageParams;
use crate::services;
use crate::services::users::{NewUser, UserChanges};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

fn parse_role(raw: Option<String>) -> Result<Option<Role>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) => s
            .parse::<Role>()
            .map(Some)
            .map_err(|_| AppError::invalid(format!("unknown role '{s}'"))),
    }
}

async fn create(
    principal: Principal,
    body: ValidatedJson<CreateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let mut errors = Vec::new();
    for (field, value) in [
        ("name", &body.name),
        ("email", &body.email),
        ("password", &body.password),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("the '{field}' field must not be empty"));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let role = parse_role(body.role)?;
    let db = require_db(&state)?;
    let user = services::users::create(
        db,
        NewUser {
            name: body.name.trim().to_string(),
            email: body.email.trim().to_string(),
            password: body.password,
            role,
        },
    )
    .await?;

    info!(principal_id = principal.id, user_id = user.id, "user created via API");

    Ok(HttpResponse::Created().json(user))
}

async fn list(
    _principal: Principal,
    query: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = query.validate()?;
    let db = require_db(&state)?;
    let page = services::users::list(db, "/users", &req).await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn find_one(
    _principal: Principal,
    id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let user = services::users::find_one(db, *id).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn update(
    _principal: Principal,
    id: web::Path<i32>,
    body: ValidatedJson<UpdateUserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let role = parse_role(body.role)?;
    let db = require_db(&state)?;
    services::users::update(
        db,
        *id,
        UserChanges {
            name: body.name,
            email: body.email,
            password: body.password,
            role,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().finish())
}

async fn remove(
    principal: Principal,
    id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    services::users::deactivate(db, *id).await?;

    info!(principal_id = principal.id, user_id = *id, "user deactivated via API");

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create))
            .route(web::get().to(list)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(find_one))
            .route(web::patch().to(update))
            .route(web::delete().to(remove)),
    );
}
