use std::path::{Component, Path, PathBuf};

use tracing::{error, info, warn};
use uuid::Uuid;

pub const MAX_PROFILE_PICTURE_BYTES: usize = 1024 * 1024; // 1MB
pub const MAX_FEATURED_IMAGE_BYTES: usize = 1024 * 1024 * 2; // 2MB

const UPLOAD_DIR: &str = "uploads/images";
const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];
const STEM_MAX_CHARS: usize = 64;

/// Image uploads under `<static_root>/uploads/images`, served from `/static`.
#[derive(Clone, Debug)]
pub struct FileStore {
    static_root: PathBuf,
}

fn allowed_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    mime_guess::from_ext(&ext)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .map(|_| ext)
}

fn sanitized_stem(file_name: &str) -> String {
    let stem: String = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(STEM_MAX_CHARS)
        .collect();
    if stem.trim_matches('_').is_empty() {
        "image".to_owned()
    } else {
        stem
    }
}

impl FileStore {
    pub fn new(static_root: impl Into<PathBuf>) -> Self {
        Self {
            static_root: static_root.into(),
        }
    }

    pub fn static_root(&self) -> &Path {
        &self.static_root
    }

    /// Writes `bytes` and returns the path relative to the static root, or
    /// `None` when the name, size or write is rejected.
    pub async fn save(
        &self,
        file_name: &str,
        bytes: &[u8],
        max_size_bytes: usize,
    ) -> Option<String> {
        let Some(ext) = allowed_extension(file_name) else {
            warn!(file_name, "Upload rejected: extension not allowed");
            return None;
        };
        if bytes.is_empty() || bytes.len() > max_size_bytes {
            warn!(file_name, size = bytes.len(), max_size_bytes, "Upload rejected: size");
            return None;
        }

        let suffix = Uuid::new_v4().simple().to_string();
        let relative = format!(
            "{UPLOAD_DIR}/{}_{}.{ext}",
            sanitized_stem(file_name),
            &suffix[..8]
        );
        let target = self.static_root.join(&relative);

        if let Some(parent) = target.parent()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            error!(error = %e, dir = %parent.display(), "Could not create upload directory");
            return None;
        }
        if let Err(e) = tokio::fs::write(&target, bytes).await {
            error!(error = %e, path = %target.display(), "Could not write upload");
            return None;
        }

        info!(path = %relative, size = bytes.len(), "Upload stored");
        Some(relative)
    }

    /// Only paths this store handed out are eligible for deletion.
    pub fn is_managed(relative_path: &str) -> bool {
        let path = Path::new(relative_path);
        path.starts_with(UPLOAD_DIR)
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
    }

    pub async fn delete(&self, relative_path: &str) -> bool {
        if !Self::is_managed(relative_path) {
            warn!(path = relative_path, "Refusing to delete unmanaged path");
            return false;
        }
        match tokio::fs::remove_file(self.static_root.join(relative_path)).await {
            Ok(()) => {
                info!(path = relative_path, "Upload deleted");
                true
            }
            Err(e) => {
                warn!(error = %e, path = relative_path, "Could not delete upload");
                false
            }
        }
    }

    /// Drops a replaced or orphaned upload. External URLs are left alone.
    pub async fn discard(&self, relative_path: Option<&str>) {
        if let Some(path) = relative_path
            && Self::is_managed(path)
        {
            self.delete(path).await;
        }
    }
}
