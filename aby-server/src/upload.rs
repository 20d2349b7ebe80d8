//! Local upload storage
//!
//! Files live under `<UPLOAD_DIR>/<category>/<uuid>.<ext>` and are served
//! read-only at `/uploads/<category>/<file>`. Records store the relative
//! path (`clients/3f2a….png`).

use std::path::{Path, PathBuf};

use shared::error::{AppError, ErrorCode};
use uuid::Uuid;

/// Maximum image size (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;
/// Maximum CV size (10MB)
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

const IMAGE_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];
const DOCUMENT_FORMATS: &[&str] = &["pdf", "doc", "docx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Admins,
    Clients,
    Applicants,
    Cvs,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 4] = [
        UploadCategory::Admins,
        UploadCategory::Clients,
        UploadCategory::Applicants,
        UploadCategory::Cvs,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadCategory::Admins => "admins",
            UploadCategory::Clients => "clients",
            UploadCategory::Applicants => "applicants",
            UploadCategory::Cvs => "cvs",
        }
    }

    fn is_image(&self) -> bool {
        !matches!(self, UploadCategory::Cvs)
    }

    fn allowed_formats(&self) -> &'static [&'static str] {
        if self.is_image() {
            IMAGE_FORMATS
        } else {
            DOCUMENT_FORMATS
        }
    }

    fn max_size(&self) -> usize {
        if self.is_image() {
            MAX_IMAGE_SIZE
        } else {
            MAX_DOCUMENT_SIZE
        }
    }

    fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }
}

/// A file part read from a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Lowercased extension from the file name, falling back to the content type
    fn extension(&self) -> Option<String> {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        from_name.or_else(|| {
            let mime = self.content_type.as_deref()?;
            mime_guess::get_mime_extensions_str(mime)
                .and_then(|exts| exts.first())
                .map(|e| e.to_string())
        })
    }
}

/// Check size, extension and content of an upload; returns the extension to store
fn validate(category: UploadCategory, file: &UploadedFile) -> Result<String, AppError> {
    if file.data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    let max = category.max_size();
    if file.data.len() > max {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large. Maximum size is {}MB", max / 1024 / 1024),
        )
        .with_detail("max_bytes", max));
    }

    let allowed = category.allowed_formats();
    let ext = file
        .extension()
        .filter(|e| allowed.contains(&e.as_str()))
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("Unsupported file format. Supported: {}", allowed.join(", ")),
            )
        })?;

    if category.is_image() {
        if let Err(e) = image::load_from_memory(&file.data) {
            return Err(AppError::with_message(
                ErrorCode::InvalidImageFile,
                format!("Invalid image file ({ext}): {e}"),
            ));
        }
    } else if !document_signature_matches(&ext, &file.data) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("File content is not a valid {ext} document"),
        ));
    }

    Ok(ext)
}

/// Magic-byte check for CV documents
fn document_signature_matches(ext: &str, data: &[u8]) -> bool {
    match ext {
        "pdf" => data.starts_with(b"%PDF"),
        // OLE2 compound document
        "doc" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]),
        // OOXML is a zip archive
        "docx" => data.starts_with(b"PK\x03\x04"),
        _ => false,
    }
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create `<root>/<category>/` for every category
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for category in UploadCategory::ALL {
            tokio::fs::create_dir_all(self.root.join(category.dir_name())).await?;
        }
        Ok(())
    }

    /// Validate and store a file; returns its path relative to the uploads root
    pub async fn save(
        &self,
        category: UploadCategory,
        file: &UploadedFile,
    ) -> Result<String, AppError> {
        let ext = validate(category, file)?;

        let dir = self.root.join(category.dir_name());
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            tracing::error!(error = %e, dir = %dir.display(), "Failed to create upload directory");
            AppError::new(ErrorCode::FileStorageFailed)
        })?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let path = dir.join(&filename);
        tokio::fs::write(&path, &file.data).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to write upload");
            AppError::new(ErrorCode::FileStorageFailed)
        })?;

        tracing::info!(
            category = category.dir_name(),
            filename = %filename,
            size = file.data.len(),
            "File stored"
        );

        Ok(format!("{}/{}", category.dir_name(), filename))
    }

    /// Resolve a stored relative path, rejecting anything outside a category dir
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let (dir, name) = relative.split_once('/')?;
        UploadCategory::from_dir_name(dir)?;
        let valid_name = !name.is_empty()
            && !name.contains(['/', '\\'])
            && !name.starts_with('.');
        valid_name.then(|| self.root.join(dir).join(name))
    }

    /// Best-effort removal of a stored file
    pub async fn remove(&self, relative: &str) {
        let Some(path) = self.resolve(relative) else {
            tracing::warn!(path = relative, "Refusing to remove file outside uploads");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove upload");
        }
    }

    pub async fn remove_opt(&self, relative: Option<&str>) {
        if let Some(rel) = relative {
            self.remove(rel).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Smallest valid PNG (1x1)
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut buf = Vec::new();
        let img = image::RgbImage::new(1, 1);
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn file(name: &str, data: Vec<u8>) -> UploadedFile {
        UploadedFile {
            file_name: Some(name.to_string()),
            content_type: None,
            data,
        }
    }

    #[tokio::test]
    async fn test_save_image_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        let rel = store
            .save(UploadCategory::Clients, &file("avatar.PNG", tiny_png()))
            .await
            .unwrap();
        assert!(rel.starts_with("clients/"));
        assert!(rel.ends_with(".png"));
        assert!(tmp.path().join(&rel).exists());

        store.remove(&rel).await;
        assert!(!tmp.path().join(&rel).exists());
    }

    #[tokio::test]
    async fn test_rejects_fake_image() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        let err = store
            .save(UploadCategory::Admins, &file("me.jpg", b"not an image".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }

    #[tokio::test]
    async fn test_cv_rules() {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(tmp.path());

        let rel = store
            .save(UploadCategory::Cvs, &file("cv.pdf", b"%PDF-1.7 body".to_vec()))
            .await
            .unwrap();
        assert!(rel.starts_with("cvs/") && rel.ends_with(".pdf"));

        let err = store
            .save(UploadCategory::Cvs, &file("cv.exe", b"MZ".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = store
            .save(UploadCategory::Cvs, &file("cv.pdf", b"hello".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);

        let err = store
            .save(UploadCategory::Cvs, &file("cv.pdf", Vec::new()))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyFile);
    }

    #[test]
    fn test_size_limit() {
        let big = file("cv.pdf", vec![b'%'; MAX_DOCUMENT_SIZE + 1]);
        let err = validate(UploadCategory::Cvs, &big).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
    }

    #[test]
    fn test_extension_from_content_type() {
        let f = UploadedFile {
            file_name: None,
            content_type: Some("application/pdf".into()),
            data: b"%PDF".to_vec(),
        };
        assert_eq!(f.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let store = UploadStore::new("/srv/uploads");
        assert!(store.resolve("clients/a.png").is_some());
        assert!(store.resolve("../etc/passwd").is_none());
        assert!(store.resolve("clients/../../x").is_none());
        assert!(store.resolve("secrets/a.png").is_none());
        assert!(store.resolve("clients/").is_none());
    }
}
