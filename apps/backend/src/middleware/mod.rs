pub mod auth_guard;
pub mod request_trace;
pub mod role_enforcer;
pub mod structured_logger;

pub use auth_guard::AuthGuard;
pub use request_trace::RequestTrace;
pub use role_enforcer::RoleEnforcer;
pub use structured_logger::StructuredLogger;
