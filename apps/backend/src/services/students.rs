//! Student record management.
//!
//! Students are keyed by registration number (RA) and additionally
//! carry a unique CPF. Both are immutable after creation; updates may
//! only touch name and email.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    QueryFilter, Set,
};
use time::OffsetDateTime;
use tracing::info;

use crate::entities::students;
use crate::error::AppError;
use crate::infra::db_errors::map_db_err;
use crate::pagination::{paginate, Page, PageRequest};

#[derive(Debug)]
pub struct NewStudent {
    pub ra: String,
    pub cpf: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn create(
    conn: &impl ConnectionTrait,
    input: NewStudent,
) -> Result<students::Model, AppError> {
    // One query covers both unique identifiers; the message names
    // whichever one collided.
    let existing = students::Entity::find()
        .filter(
            Condition::any()
                .add(students::Column::Ra.eq(&input.ra))
                .add(students::Column::Cpf.eq(&input.cpf)),
        )
        .one(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?;

    if let Some(existing) = existing {
        let message = if existing.ra == input.ra {
            format!("a student with RA '{}' already exists", input.ra)
        } else {
            format!("a student with CPF '{}' already exists", input.cpf)
        };
        return Err(AppError::conflict(message));
    }

    let now = OffsetDateTime::now_utc();
    let student = students::ActiveModel {
        ra: Set(input.ra),
        cpf: Set(input.cpf),
        name: Set(input.name),
        email: Set(input.email),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(|e| AppError::from(map_db_err(e)))?;

    info!(ra = %student.ra, "student created");

    Ok(student)
}

pub async fn list(
    conn: &impl ConnectionTrait,
    route: &str,
    req: &PageRequest,
) -> Result<Page<students::Model>, AppError> {
    paginate(conn, students::Entity::find(), route, req).await
}

pub async fn find_one(conn: &impl ConnectionTrait, ra: &str) -> Result<students::Model, AppError> {
    students::Entity::find_by_id(ra)
        .one(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?
        .ok_or_else(AppError::not_found)
}

pub async fn update(
    conn: &impl ConnectionTrait,
    ra: &str,
    changes: StudentChanges,
) -> Result<students::Model, AppError> {
    let student = find_one(conn, ra).await?;

    let mut active: students::ActiveModel = student.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    active.updated_at = Set(OffsetDateTime::now_utc());

    active
        .update(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))
}

pub async fn remove(conn: &impl ConnectionTrait, ra: &str) -> Result<(), AppError> {
    // Find first so a missing RA is a 404, not a silent no-op.
    let student = find_one(conn, ra).await?;

    student
        .delete(conn)
        .await
        .map_err(|e| AppError::from(map_db_err(e)))?;

    info!(ra = %ra, "student removed");

    Ok(())
}
