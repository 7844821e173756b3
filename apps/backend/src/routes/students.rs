use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::extractors::{Principal, ValidatedJson};
use crate::infra::db::require_db;
use crate::pagination::PageParams;
use crate::services;
use crate::services::students::{NewStudent, StudentChanges};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub ra: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

async fn create(
    principal: Principal,
    body: ValidatedJson<CreateStudentRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let mut errors = Vec::new();
    for (field, value) in [
        ("ra", &body.ra),
        ("cpf", &body.cpf),
        ("name", &body.name),
        ("email", &body.email),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("the '{field}' field must not be empty"));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let db = require_db(&state)?;
    let student = services::students::create(
        db,
        NewStudent {
            ra: body.ra.trim().to_string(),
            cpf: body.cpf.trim().to_string(),
            name: body.name.trim().to_string(),
            email: body.email.trim().to_string(),
        },
    )
    .await?;

    info!(principal_id = principal.id, ra = %student.ra, "student created via API");

    Ok(HttpResponse::Created().json(student))
}

async fn list(
    _principal: Principal,
    query: web::Query<PageParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = query.validate()?;
    let db = require_db(&state)?;
    let page = services::students::list(db, "/students", &req).await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn find_one(
    _principal: Principal,
    ra: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let student = services::students::find_one(db, &ra).await?;
    Ok(HttpResponse::Ok().json(student))
}

async fn update(
    _principal: Principal,
    ra: web::Path<String>,
    body: ValidatedJson<UpdateStudentRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let db = require_db(&state)?;
    let student = services::students::update(
        db,
        &ra,
        StudentChanges {
            name: body.name,
            email: body.email,
        },
    )
    .await?;
    Ok(HttpResponse::Ok().json(student))
}

async fn remove(
    principal: Principal,
    ra: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    services::students::remove(db, &ra).await?;

    info!(principal_id = principal.id, ra = %ra.as_str(), "student removed via API");

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::post().to(create))
            .route(web::get().to(list)),
    )
    .service(
        web::resource("/{ra}")
            .route(web::get().to(find_one))
            .route(web::patch().to(update))
            .route(web::delete().to(remove)),
    );
}
