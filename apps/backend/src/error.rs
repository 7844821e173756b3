use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::error;

use crate::errors::domain::{ConstraintKind, DomainError};
use crate::web::request_ctx;

/// External error envelope. Every failure, regardless of origin, is
/// rendered in this shape; `errors` is always an array, even for a
/// single message.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub timestamp: String,
    pub path: String,
    pub errors: Vec<String>,
}

/// Failure taxonomy. Services and repos never pick HTTP statuses; the
/// status is chosen here and nowhere else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("unauthorized: {detail}")]
    Unauthorized { detail: String },
    #[error("forbidden: {detail}")]
    Forbidden { detail: String },
    #[error("validation error: {}", messages.join("; "))]
    Validation { messages: Vec<String> },
    #[error("not found")]
    NotFound,
    #[error("conflict: {detail}")]
    Conflict { detail: String },
    #[error("constraint violation: {detail}")]
    Constraint { detail: String },
    #[error("database error: {detail}")]
    Db { detail: String },
    #[error("configuration error: {detail}")]
    Config { detail: String },
    #[error("internal error: {detail}")]
    Internal { detail: String },
}

/// Application error carried through the whole request pipeline and
/// translated into the external envelope at the single exit boundary
/// (`ResponseError::error_response`).
///
/// `path` is attached by guards and extractors that still hold the
/// request; errors raised inside handlers pick the path up from the
/// task-local request context instead.
#[derive(Debug, Clone, PartialEq)]
pub struct AppError {
    kind: ErrorKind,
    path: Option<String>,
}

impl AppError {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        ErrorKind::Unauthorized {
            detail: detail.into(),
        }
        .into()
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        ErrorKind::Forbidden {
            detail: detail.into(),
        }
        .into()
    }

    pub fn validation(messages: Vec<String>) -> Self {
        ErrorKind::Validation { messages }.into()
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::validation(vec![detail.into()])
    }

    pub fn not_found() -> Self {
        ErrorKind::NotFound.into()
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        ErrorKind::Conflict {
            detail: detail.into(),
        }
        .into()
    }

    pub fn constraint(detail: impl Into<String>) -> Self {
        ErrorKind::Constraint {
            detail: detail.into(),
        }
        .into()
    }

    pub fn db(detail: impl Into<String>) -> Self {
        ErrorKind::Db {
            detail: detail.into(),
        }
        .into()
    }

    pub fn config(detail: impl Into<String>) -> Self {
        ErrorKind::Config {
            detail: detail.into(),
        }
        .into()
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ErrorKind::Internal {
            detail: detail.into(),
        }
        .into()
    }

    /// Attach the originating request path. Used by middleware and
    /// extractors, which may fail outside the task-local request scope.
    pub fn from_req(req: &HttpRequest, err: AppError) -> AppError {
        err.with_path(req.path())
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match &self.kind {
            ErrorKind::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden { .. } => StatusCode::FORBIDDEN,
            ErrorKind::Validation { .. } => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict { .. } => StatusCode::CONFLICT,
            ErrorKind::Constraint { .. } => StatusCode::BAD_REQUEST,
            ErrorKind::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message list. Internal detail for 5xx errors is
    /// withheld here and logged server-side instead.
    pub fn messages(&self) -> Vec<String> {
        match &self.kind {
            ErrorKind::Unauthorized { detail } => vec![detail.clone()],
            ErrorKind::Forbidden { detail } => vec![detail.clone()],
            ErrorKind::Validation { messages } => messages.clone(),
            ErrorKind::NotFound => vec!["requested resource not found".to_string()],
            ErrorKind::Conflict { detail } => vec![detail.clone()],
            ErrorKind::Constraint { detail } => vec![detail.clone()],
            ErrorKind::Db { .. } => vec!["unexpected database error".to_string()],
            ErrorKind::Config { .. } | ErrorKind::Internal { .. } => {
                vec!["internal server error".to_string()]
            }
        }
    }
}

impl From<ErrorKind> for AppError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, path: None }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(messages) => Self::validation(messages),
            DomainError::Conflict(_, detail) => Self::conflict(detail),
            DomainError::NotFound(..) => Self::not_found(),
            DomainError::Constraint(kind, detail) => match kind {
                ConstraintKind::ForeignKey | ConstraintKind::RequiredField => {
                    Self::constraint(detail)
                }
            },
            DomainError::Infra(_, detail) => Self::db(detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let path = self
            .path
            .clone()
            .unwrap_or_else(request_ctx::path);
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::new());

        if status.is_server_error() {
            // Original failure detail is server-side only.
            error!(
                trace_id = %request_ctx::trace_id(),
                path = %path,
                detail = %self.kind,
                "request failed with server error"
            );
        }

        let envelope = ErrorEnvelope {
            status_code: status.as_u16(),
            timestamp,
            path,
            errors: self.messages(),
        };

        HttpResponse::build(status).json(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::{ConflictKind, ConstraintKind, InfraErrorKind, NotFoundKind};

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::validation(vec!["a".into()]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::constraint("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::db("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_keeps_one_message_per_rule() {
        let err = AppError::validation(vec!["rule one".into(), "rule two".into()]);
        assert_eq!(err.messages(), vec!["rule one", "rule two"]);
    }

    #[test]
    fn test_single_message_is_still_an_array() {
        let err = AppError::conflict("duplicate resource, already exists");
        assert_eq!(err.messages().len(), 1);
    }

    #[test]
    fn test_server_error_detail_is_withheld() {
        let err = AppError::internal("connection refused on 10.0.0.7");
        assert_eq!(err.messages(), vec!["internal server error"]);

        let err = AppError::db("SQLSTATE(57P01) admin shutdown");
        assert_eq!(err.messages(), vec!["unexpected database error"]);
    }

    #[test]
    fn test_not_found_fixed_message() {
        assert_eq!(
            AppError::not_found().messages(),
            vec!["requested resource not found"]
        );
    }

    #[test]
    fn test_from_domain_error() {
        let err: AppError = DomainError::conflict(ConflictKind::UniqueEmail, "dup").into();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: AppError = DomainError::not_found(NotFoundKind::Student, "missing").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: AppError =
            DomainError::constraint(ConstraintKind::ForeignKey, "reference").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = ErrorEnvelope {
            status_code: 404,
            timestamp: "2025-11-01T12:00:00Z".to_string(),
            path: "/students/999".to_string(),
            errors: vec!["requested resource not found".to_string()],
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["statusCode"], 404);
        assert_eq!(json["path"], "/students/999");
        assert!(json["errors"].is_array());
        assert_eq!(json["errors"][0], "requested resource not found");
    }
}
