#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod middleware;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod state;
pub mod web;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::claims::Claims;
pub use auth::jwt::{mint_access_token, verify_access_token};
pub use auth::policy::{default_policy, RoutePolicy};
pub use auth::role::Role;
pub use config::db::db_url;
pub use error::{AppError, ErrorEnvelope, ErrorKind};
pub use extractors::{Principal, ValidatedJson};
pub use infra::db::connect_db;
pub use middleware::{AuthGuard, RequestTrace, RoleEnforcer, StructuredLogger};
pub use pagination::{Page, PageLinks, PageMeta, PageParams, PageRequest};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
