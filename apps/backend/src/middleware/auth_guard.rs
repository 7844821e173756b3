//! Bearer-token authentication for protected scopes.
//!
//! Verifies the access token, then re-reads the account from the store
//! and requires it to still be active, so deactivation takes effect on
//! the next request regardless of token lifetime. On success a
//! [`Principal`] is stored in request extensions for extractors and the
//! role enforcer; this is the only place per request that touches the
//! token or hits the store for authentication.
//!
//! Every failure mode maps to the same 401 so callers cannot probe
//! which accounts exist.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::jwt::verify_access_token;
use crate::auth::role::Role;
use crate::error::AppError;
use crate::extractors::Principal;
use crate::infra::db::require_db;
use crate::services;
use crate::state::app_state::AppState;
use crate::web::request_ctx;

pub struct AuthGuard;

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path().to_string();
            let unauthorized = || {
                AppError::unauthorized("invalid or expired token").with_path(path.clone())
            };

            let token = match bearer_token(&req) {
                Some(token) => token,
                None => {
                    debug!(trace_id = %request_ctx::trace_id(), "missing bearer token");
                    return Err(unauthorized().into());
                }
            };

            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::internal("AppState not available").with_path(path.clone())
                })?;

            let claims = verify_access_token(&token, &state.security)
                .map_err(|e| e.with_path(path.clone()))?;

            // The subject is the account id; anything else is a foreign token.
            let account_id: i32 = claims.sub.parse().map_err(|_| {
                debug!(trace_id = %request_ctx::trace_id(), "non-numeric token subject");
                unauthorized()
            })?;

            let db = require_db(&state).map_err(|e| e.with_path(path.clone()))?;

            // A valid signature is not enough: the account must still
            // exist and be active right now.
            let account = services::users::find_active_by_id(db, account_id)
                .await
                .map_err(|e| e.with_path(path.clone()))?
                .ok_or_else(|| {
                    debug!(
                        trace_id = %request_ctx::trace_id(),
                        account_id,
                        "token subject missing or deactivated"
                    );
                    unauthorized()
                })?;

            let role: Role = account.role.parse().map_err(|_| {
                AppError::internal(format!("account {} has an unknown role", account.id))
                    .with_path(path.clone())
            })?;

            req.extensions_mut().insert(Principal {
                id: account.id,
                name: account.name,
                email: account.email,
                role,
                active: account.active,
            });

            service.call(req).await
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
