use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use crate::auth::role::Role;
use crate::error::AppError;

/// The authenticated account behind the current request.
///
/// Built exactly once per request by the `AuthGuard` middleware, which
/// verifies the bearer token and re-reads the account from the store,
/// then stashes the result in request extensions. Handlers declare a
/// `Principal` parameter to require authentication; the extractor
/// itself never touches the token or the database.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Always true today: the guard rejects inactive accounts. Carried
    /// so handlers never have to re-read the flag.
    pub active: bool,
}

impl FromRequest for Principal {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().cloned();

        std::future::ready(principal.ok_or_else(|| {
            // Reachable only when a route skipped the guard middleware.
            AppError::from_req(req, AppError::unauthorized("authentication required"))
        }))
    }
}
