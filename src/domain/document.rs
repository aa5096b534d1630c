//! Identity documents (SIM driving licence, NIK identity card) uploaded by users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::PUBLIC_URL_PREFIX;

/// Kind of identity document; a user holds at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Sim,
    Nik,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Sim => "sim",
            DocumentKind::Nik => "nik",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sim" => Some(DocumentKind::Sim),
            "nik" => Some(DocumentKind::Nik),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored document record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i32,
    pub user_id: i32,
    pub kind: DocumentKind,
    /// Path relative to the public directory
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A file received from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Document as returned to the customer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub kind: DocumentKind,
    #[schema(example = "/public/assets/sim/2f1c...-license.png")]
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            kind: document.kind,
            url: format!("{}/{}", PUBLIC_URL_PREFIX, document.file_path),
            updated_at: document.updated_at,
        }
    }
}
