//! Local file storage for uploaded documents.
//!
//! Files land under `<public_path>/assets/<kind>/` and are referenced by
//! their path relative to the public directory.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::config::{ASSETS_DIRECTORY, MAX_UPLOAD_BYTES};
use crate::domain::{DocumentKind, UploadedFile};
use crate::errors::{AppError, AppResult};

/// Accepted image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Png,
    Jpeg,
}

impl ImageType {
    /// Detect the format from the file's magic bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

        if bytes.starts_with(PNG) {
            Some(ImageType::Png)
        } else if bytes.starts_with(JPEG) {
            Some(ImageType::Jpeg)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageType::Png => "image/png",
            ImageType::Jpeg => "image/jpeg",
        }
    }
}

/// Replace anything outside `[A-Za-z0-9._-]` and drop leading dots.
pub fn sanitize_file_name(name: &str) -> String {
    static UNSAFE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

    // Browsers may send a full client path
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned = UNSAFE.replace_all(base, "_");
    cleaned.trim_start_matches('.').to_string()
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served under the public URL prefix
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and write an upload, returning its path relative to the root.
    pub async fn store(&self, kind: DocumentKind, file: &UploadedFile) -> AppResult<String> {
        if file.bytes.is_empty() {
            return Err(AppError::bad_request("Uploaded file is empty"));
        }
        if file.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::bad_request(format!(
                "File exceeds the {} MiB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        let image = ImageType::sniff(&file.bytes)
            .ok_or_else(|| AppError::bad_request("Only PNG and JPEG images are accepted"))?;

        let relative = format!(
            "{}/{}/{}{}",
            ASSETS_DIRECTORY,
            kind.as_str(),
            Uuid::new_v4(),
            sanitize_file_name(&file.file_name)
        );
        let target = self.root.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write next to the target, then rename so readers never see a partial file
        let tmp = target.with_extension("part");
        fs::write(&tmp, &file.bytes).await?;
        if let Err(e) = fs::rename(&tmp, &target).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %relative, mime = image.mime(), "Stored upload");
        Ok(relative)
    }

    /// Delete a previously stored file. Missing files are ignored.
    pub async fn remove(&self, relative: &str) -> AppResult<()> {
        let path = Path::new(relative);
        let contained = path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !contained {
            return Err(AppError::internal(format!(
                "refusing to remove path outside storage: {}",
                relative
            )));
        }

        match fs::remove_file(self.root.join(path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %relative, "Stored file already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    fn upload(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_sniff_detects_png_and_jpeg() {
        assert_eq!(ImageType::sniff(PNG_HEADER), Some(ImageType::Png));
        assert_eq!(ImageType::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageType::Jpeg));
        assert_eq!(ImageType::sniff(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_sanitize_strips_paths_and_unsafe_characters() {
        assert_eq!(sanitize_file_name("my licence.png"), "my_licence.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\ktp.jpg"), "ktp.jpg");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
    }

    #[tokio::test]
    async fn test_store_writes_under_kind_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let relative = storage
            .store(DocumentKind::Sim, &upload("sim.png", PNG_HEADER))
            .await
            .unwrap();

        assert!(relative.starts_with("assets/sim/"));
        assert!(relative.ends_with("sim.png"));
        let written = std::fs::read(dir.path().join(&relative)).unwrap();
        assert_eq!(written, PNG_HEADER);
    }

    #[tokio::test]
    async fn test_store_rejects_non_images_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let err = storage
            .store(DocumentKind::Nik, &upload("doc.pdf", b"%PDF-1.7"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = storage
            .store(DocumentKind::Nik, &upload("empty.png", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(MAX_UPLOAD_BYTES + 1, 0);

        let err = storage
            .store(DocumentKind::Sim, &upload("big.png", &bytes))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_remove_ignores_missing_and_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage.remove("assets/sim/missing.png").await.unwrap();
        assert!(storage.remove("../outside.png").await.is_err());
    }
}
