//! SIM and NIK document handlers.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::get,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::MAX_UPLOAD_BYTES;
use crate::domain::{DocumentKind, DocumentResponse, UploadedFile};
use crate::errors::{AppError, AppResult, FieldError};
use crate::types::ApiResponse;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// Headroom for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/:kind", get(show).put(upload))
        .layer(DefaultBodyLimit::max(
            MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
        ))
}

fn parse_kind(kind: &str) -> AppResult<DocumentKind> {
    DocumentKind::parse(kind)
        .ok_or_else(|| AppError::missing(format!("Unknown document kind '{}'", kind)))
}

/// Fetch the customer's document of the given kind
#[utoipa::path(
    get,
    path = "/api/documents/{kind}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("kind" = String, Path, description = "Document kind: sim or nik")),
    responses(
        (status = 200, description = "Stored document", body = DocumentResponse),
        (status = 404, description = "Nothing uploaded yet or unknown kind")
    )
)]
pub async fn show(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(kind): Path<String>,
) -> AppResult<ApiResponse<DocumentResponse>> {
    let kind = parse_kind(&kind)?;
    let document = state.document_service.get(current_user.id, kind).await?;
    Ok(ApiResponse::ok("Document found", document.into()))
}

/// Upload or replace the customer's document of the given kind
#[utoipa::path(
    put,
    path = "/api/documents/{kind}",
    tag = "Documents",
    security(("bearer_auth" = [])),
    params(("kind" = String, Path, description = "Document kind: sim or nik")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "PNG or JPEG image in field `file`, at most 5 MiB"),
    responses(
        (status = 200, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Missing, empty, oversized or non-image file"),
        (status = 404, description = "Unknown kind")
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(kind): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<DocumentResponse>> {
    let kind = parse_kind(&kind)?;
    let file = read_file_field(multipart).await?;

    let document = state
        .document_service
        .upload(current_user.id, kind, file)
        .await?;

    Ok(ApiResponse::ok(
        format!("{} uploaded", kind.as_str().to_uppercase()),
        document.into(),
    ))
}

async fn read_file_field(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        return Ok(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::InvalidPayload(vec![FieldError {
        field: FILE_FIELD.to_string(),
        code: "required".to_string(),
        message: Some("A file is required".to_string()),
    }]))
}
