use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::pagination::Paginated;

/// Student record, keyed by registration number (RA).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub ra: String,
    #[sea_orm(unique)]
    pub cpf: String,
    pub name: String,
    pub email: String,
    #[sea_orm(column_name = "created_at")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Paginated for Entity {
    fn searchable_columns() -> Vec<Column> {
        vec![Column::Ra, Column::Cpf, Column::Name, Column::Email]
    }

    fn default_sort_column() -> Column {
        Column::Ra
    }
}
