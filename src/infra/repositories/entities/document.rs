//! Identity document database entity for SeaORM.
//!
//! One row per (user, kind); the pair is unique.

use sea_orm::entity::prelude::*;

use crate::domain::{Document, DocumentKind};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub kind: String,
    pub file_path: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Document {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = DocumentKind::parse(&model.kind).ok_or_else(|| {
            AppError::internal(format!(
                "document {} has unknown kind '{}'",
                model.id, model.kind
            ))
        })?;

        Ok(Document {
            id: model.id,
            user_id: model.user_id,
            kind,
            file_path: model.file_path,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
