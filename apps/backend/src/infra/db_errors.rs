//! SeaORM -> DomainError translation helpers.
//!
//! The data layer converts `sea_orm::DbErr` into `DomainError` here, and
//! the handler layer then maps `DomainError` to `AppError` via `From`.
//! This is the only place that inspects driver error text; raw messages
//! are logged server-side and never forwarded to clients.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, ConstraintKind, DomainError, InfraErrorKind, NotFoundKind,
};
use crate::web::request_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Map a constraint identifier found in the driver message to the
/// matching conflict kind. Postgres reports constraint names; SQLite
/// reports `table.column`.
fn unique_conflict_kind(error_msg: &str) -> ConflictKind {
    if error_msg.contains("users_email_key") || error_msg.contains("users.email") {
        return ConflictKind::UniqueEmail;
    }
    if error_msg.contains("students_cpf_key") || error_msg.contains("students.cpf") {
        return ConflictKind::UniqueCpf;
    }
    if error_msg.contains("students_pkey") || error_msg.contains("students.ra") {
        return ConflictKind::UniqueRa;
    }
    ConflictKind::Other("Unique".into())
}

/// Translate a `DbErr` into a `DomainError` with a stable, sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = request_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Record, "requested resource not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, "database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "unexpected database error");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, "unique constraint violation");
        return DomainError::conflict(
            unique_conflict_kind(&error_msg),
            "duplicate resource, already exists",
        );
    }

    if mentions_sqlstate(&error_msg, "23503")
        || error_msg.contains("violates foreign key constraint")
        || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, "foreign key constraint violation");
        return DomainError::constraint(
            ConstraintKind::ForeignKey,
            "operation failed due to a reference constraint",
        );
    }

    if mentions_sqlstate(&error_msg, "23502")
        || error_msg.contains("violates not-null constraint")
        || error_msg.contains("NOT NULL constraint failed")
    {
        warn!(trace_id = %trace_id, "not-null constraint violation");
        return DomainError::constraint(ConstraintKind::RequiredField, "a required field is missing");
    }

    if error_msg.contains("timeout") || error_msg.contains("pool") {
        warn!(trace_id = %trace_id, "database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::Timeout, "unexpected database error");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "unhandled database error");
    DomainError::infra(InfraErrorKind::Other("DbErr".into()), "unexpected database error")
}
