//! Error handling for the campus records backend.

pub mod domain;

pub use domain::DomainError;
