//! Staff account management.
//!
//! Accounts are soft-deleted: removal flips `active` to false, which
//! locks the account out on its next request while keeping the row for
//! audit. Listings and lookups only see active accounts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::role::Role;
use crate::entities::users;
use crate::error::AppError;
use crate::infra::db_errors::map_db_err;
use crate::pagination::{paginate, Page, PageRequest};

/// Client-facing account shape. Never carries the password hash.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
}

impl From<users::Model> for UserView {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            active: m.active,
        }
    }
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

pub async fn create(conn: &impl ConnectionTrait, input: NewUser) -> Result<UserView, AppError> {
    // Pre-check for a friendlier message than the raw unique violation;
    // the constraint still backstops concurrent inserts.
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(&input.email))
        .one(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?;

    if existing.is_some() {
        return Err(AppError::conflict(format!(
            "a user with email '{}' already exists",
            input.email
        )));
    }

    let now = OffsetDateTime::now_utc();
    let role = input.role.unwrap_or(Role::User);

    let user = users::ActiveModel {
        id: NotSet,
        name: Set(input.name),
        email: Set(input.email),
        password_hash: Set(hash_password(&input.password)?),
        active: Set(true),
        role: Set(role.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| AppError::from(map_db_err(e)))?;

    info!(user_id = user.id, role = %role, "user created");

    Ok(user.into())
}

pub async fn list(
    conn: &impl ConnectionTrait,
    route: &str,
    req: &PageRequest,
) -> Result<Page<UserView>, AppError> {
    let base = users::Entity::find().filter(users::Column::Active.eq(true));
    let page = paginate(conn, base, route, req).await?;
    Ok(page.map(UserView::from))
}

pub async fn find_one(conn: &impl ConnectionTrait, id: i32) -> Result<UserView, AppError> {
    find_active_by_id(conn, id)
        .await?
        .map(UserView::from)
        .ok_or_else(AppError::not_found)
}

pub async fn update(
    conn: &impl ConnectionTrait,
    id: i32,
    changes: UserChanges,
) -> Result<(), AppError> {
    let user = find_active_by_id(conn, id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let mut active: users::ActiveModel = user.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    if let Some(password) = changes.password {
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(role) = changes.role {
        active.role = Set(role.as_str().to_string());
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    active
        .update(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?;

    Ok(())
}

/// Soft delete. The row survives so the account id stays reserved and
/// the audit trail is intact.
pub async fn deactivate(conn: &impl ConnectionTrait, id: i32) -> Result<(), AppError> {
    let user = find_active_by_id(conn, id)
        .await?
        .ok_or_else(AppError::not_found)?;

    let mut active: users::ActiveModel = user.into();
    active.active = Set(false);
    active.updated_at = Set(OffsetDateTime::now_utc());

    active
        .update(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?;

    info!(user_id = id, "user deactivated");

    Ok(())
}

/// Lookup for credential validation. Returns the full model, hash
/// included; deactivated accounts are invisible here too.
pub async fn find_auth_account(
    conn: &impl ConnectionTrait,
    email: &str,
) -> Result<Option<users::Model>, AppError> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .filter(users::Column::Active.eq(true))
        .one(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))
}

/// Lookup for the auth guard's per-request account re-read.
pub async fn find_active_by_id(
    conn: &impl ConnectionTrait,
    id: i32,
) -> Result<Option<users::Model>, AppError> {
    users::Entity::find_by_id(id)
        .filter(users::Column::Active.eq(true))
        .one(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))
}
