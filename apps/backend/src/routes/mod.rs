use actix_web::{web, HttpResponse};

use crate::auth::policy::default_policy;
use crate::error::AppError;
use crate::middleware::{AuthGuard, RoleEnforcer};

pub mod auth;
pub mod health;
pub mod students;
pub mod users;

/// Wire up every route. The resource scopes wear the auth stack:
/// `AuthGuard` runs first (outer wrap is applied last), then
/// `RoleEnforcer` checks the policy against the authenticated
/// principal. Login and health stay outside both.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .configure(auth::configure_routes)
        .service(
            web::scope("/students")
                .wrap(RoleEnforcer::new(default_policy()))
                .wrap(AuthGuard)
                .configure(students::configure_routes),
        )
        .service(
            web::scope("/users")
                .wrap(RoleEnforcer::new(default_policy()))
                .wrap(AuthGuard)
                .configure(users::configure_routes),
        )
        .default_service(web::route().to(not_found));
}

/// Unmatched paths get the same envelope as missing records.
async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found())
}
