//! Identity document repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::document;
use crate::domain::{Document, DocumentKind};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn find(&self, user_id: i32, kind: DocumentKind) -> AppResult<Option<Document>>;

    /// Point the user's document of `kind` at `file_path`, creating the row if needed.
    async fn upsert(&self, user_id: i32, kind: DocumentKind, file_path: String)
        -> AppResult<Document>;
}

pub struct DocumentStore {
    db: DatabaseConnection,
}

impl DocumentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(
        &self,
        user_id: i32,
        kind: DocumentKind,
    ) -> AppResult<Option<document::Model>> {
        Ok(document::Entity::find()
            .filter(document::Column::UserId.eq(user_id))
            .filter(document::Column::Kind.eq(kind.as_str()))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl DocumentRepository for DocumentStore {
    async fn find(&self, user_id: i32, kind: DocumentKind) -> AppResult<Option<Document>> {
        self.find_model(user_id, kind)
            .await?
            .map(Document::try_from)
            .transpose()
    }

    async fn upsert(
        &self,
        user_id: i32,
        kind: DocumentKind,
        file_path: String,
    ) -> AppResult<Document> {
        let now = Utc::now();

        let model = match self.find_model(user_id, kind).await? {
            Some(existing) => {
                let mut active: document::ActiveModel = existing.into();
                active.file_path = Set(file_path);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                document::ActiveModel {
                    user_id: Set(user_id),
                    kind: Set(kind.as_str().to_string()),
                    file_path: Set(file_path),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };

        Document::try_from(model)
    }
}
