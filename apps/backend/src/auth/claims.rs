//! Signed payload carried inside access tokens.

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Claims included in backend-issued access tokens.
///
/// Identity fields only: the `role` claim is informational for clients
/// and is never trusted for authorization, which always re-reads the
/// account from the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject: the account id, as a string
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Issuer, when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}
