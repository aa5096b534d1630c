//! Document service - SIM and NIK uploads.
//!
//! A user holds at most one document per kind. Uploading again replaces
//! the record and deletes the previously stored file first. If any step
//! after the new file is written fails, the new file is removed again.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Document, DocumentKind, UploadedFile};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{FileStorage, UnitOfWork};

#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn get(&self, user_id: i32, kind: DocumentKind) -> AppResult<Document>;

    async fn upload(
        &self,
        user_id: i32,
        kind: DocumentKind,
        file: UploadedFile,
    ) -> AppResult<Document>;
}

pub struct DocumentManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: FileStorage,
}

impl<U: UnitOfWork> DocumentManager<U> {
    pub fn new(uow: Arc<U>, storage: FileStorage) -> Self {
        Self { uow, storage }
    }
}

#[async_trait]
impl<U: UnitOfWork> DocumentService for DocumentManager<U> {
    async fn get(&self, user_id: i32, kind: DocumentKind) -> AppResult<Document> {
        self.uow
            .documents()
            .find(user_id, kind)
            .await?
            .ok_or_missing(&format!("You have not uploaded your {} yet", kind))
    }

    async fn upload(
        &self,
        user_id: i32,
        kind: DocumentKind,
        file: UploadedFile,
    ) -> AppResult<Document> {
        let documents = self.uow.documents();
        let new_path = self.storage.store(kind, &file).await?;

        let previous = match documents.find(user_id, kind).await {
            Ok(previous) => previous,
            Err(e) => {
                self.discard(&new_path).await;
                return Err(e);
            }
        };
        if let Some(previous) = &previous {
            if let Err(e) = self.storage.remove(&previous.file_path).await {
                self.discard(&new_path).await;
                return Err(e);
            }
        }

        match documents.upsert(user_id, kind, new_path.clone()).await {
            Ok(document) => {
                tracing::info!(user_id, %kind, replaced = previous.is_some(), "Document stored");
                Ok(document)
            }
            Err(e) => {
                self.discard(&new_path).await;
                Err(e)
            }
        }
    }
}

impl<U: UnitOfWork> DocumentManager<U> {
    async fn discard(&self, path: &str) {
        if let Err(e) = self.storage.remove(path).await {
            tracing::warn!(path, "Failed to discard orphaned upload: {}", e);
        }
    }
}
