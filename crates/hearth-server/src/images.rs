//! Gallery image host backed by a local directory.
//!
//! Every upload gets its own object, named by the SHA-256 of its content
//! and a per-upload id, so deleting one gallery entry never removes a
//! file another gallery lists. The router serves the directory under
//! `/images`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hearth_core::error::{HearthError, HearthResult};
use hearth_core::images::{ImageHost, extension_for};
use hearth_core::models::property::StoredImage;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LocalImageHost {
    root: PathBuf,
    base_url: String,
}

impl LocalImageHost {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handles are `<hex digest>-<hex upload id>.<ext>`; anything else
    /// never names a file in the root.
    fn path_for(&self, handle: &str) -> Option<PathBuf> {
        let (stem, ext) = handle.split_once('.')?;
        let (digest, upload_id) = stem.split_once('-')?;
        let hex = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit());
        let well_formed = hex(digest, 64)
            && hex(upload_id, 32)
            && !ext.is_empty()
            && ext.bytes().all(|b| b.is_ascii_alphanumeric());
        well_formed.then(|| self.root.join(handle))
    }
}

fn io_error(err: std::io::Error) -> HearthError {
    HearthError::Unavailable(format!("image storage: {err}"))
}

impl ImageHost for LocalImageHost {
    async fn upload(&self, bytes: Vec<u8>, content_type: &str) -> HearthResult<StoredImage> {
        let ext = extension_for(content_type)
            .ok_or_else(|| HearthError::validation("unsupported image type"))?;
        let handle = format!(
            "{}-{}.{ext}",
            hex::encode(Sha256::digest(&bytes)),
            Uuid::new_v4().simple()
        );

        tokio::fs::create_dir_all(&self.root).await.map_err(io_error)?;
        tokio::fs::write(self.root.join(&handle), &bytes)
            .await
            .map_err(io_error)?;
        debug!(handle = %handle, size = bytes.len(), "image stored");

        Ok(StoredImage {
            url: format!("{}/{handle}", self.base_url),
            handle,
        })
    }

    async fn delete(&self, handle: &str) -> HearthResult<()> {
        let Some(path) = self.path_for(handle) else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> LocalImageHost {
        let dir = std::env::temp_dir().join(format!("hearth-images-{}", uuid::Uuid::new_v4()));
        LocalImageHost::new(dir, "/images")
    }

    #[tokio::test]
    async fn identical_uploads_get_separate_objects() {
        let host = scratch();
        let a = host.upload(b"same".to_vec(), "image/png").await.unwrap();
        let b = host.upload(b"same".to_vec(), "image/png").await.unwrap();
        assert_ne!(a.handle, b.handle);
        assert!(a.handle.ends_with(".png"));
        assert_eq!(a.url, format!("/images/{}", a.handle));
        assert!(host.path_for(&a.handle).is_some());

        host.delete(&a.handle).await.unwrap();
        assert!(!host.root().join(&a.handle).exists());
        assert!(host.root().join(&b.handle).exists());
        // Already gone.
        host.delete(&a.handle).await.unwrap();
    }

    #[test]
    fn malformed_handles_name_no_file() {
        let host = scratch();
        assert!(host.path_for("../etc/passwd").is_none());
        assert!(host.path_for("abc.png").is_none());
        let ok = format!("{}-{}.jpg", "a".repeat(64), "b".repeat(32));
        assert!(host.path_for(&ok).is_some());
        // Digest-only handles are no longer issued.
        assert!(host.path_for(&format!("{}.jpg", "a".repeat(64))).is_none());
        let sneaky = format!("{}-{}./..", "a".repeat(64), "b".repeat(32));
        assert!(host.path_for(&sneaky).is_none());
    }
}
