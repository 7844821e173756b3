//! Role-based authorization for protected scopes.
//!
//! Runs after [`AuthGuard`](super::AuthGuard) and compares the
//! principal's stored role against the static [`RoutePolicy`]. Routes
//! with no declaration pass any authenticated principal; a declared
//! route rejects principals outside the required set with 403.
//!
//! [`RoutePolicy`]: crate::auth::policy::RoutePolicy

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::auth::policy::RoutePolicy;
use crate::error::AppError;
use crate::extractors::Principal;
use crate::web::request_ctx;

pub struct RoleEnforcer {
    policy: Rc<RoutePolicy>,
}

impl RoleEnforcer {
    pub fn new(policy: RoutePolicy) -> Self {
        Self {
            policy: Rc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleEnforcer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RoleEnforcerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleEnforcerMiddleware {
            service,
            policy: Rc::clone(&self.policy),
        }))
    }
}

pub struct RoleEnforcerMiddleware<S> {
    service: S,
    policy: Rc<RoutePolicy>,
}

impl<S, B> Service<ServiceRequest> for RoleEnforcerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let required = self.policy.required_roles(req.method(), req.path());

        if let Some(required) = required {
            let principal = req.extensions().get::<Principal>().cloned();

            let allowed = match &principal {
                // Role comes from the store via AuthGuard, never from claims.
                Some(p) => required.contains(&p.role),
                None => false,
            };

            if !allowed {
                let err: AppError = match principal {
                    Some(p) => {
                        debug!(
                            trace_id = %request_ctx::trace_id(),
                            principal_id = p.id,
                            role = %p.role,
                            path = %req.path(),
                            "role requirement not met"
                        );
                        AppError::forbidden(
                            "you do not have permission to access this resource",
                        )
                    }
                    None => AppError::unauthorized("invalid or expired token"),
                };
                let err = err.with_path(req.path().to_string());
                return Box::pin(async move { Err(err.into()) });
            }
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
