//! Image host collaborator.
//!
//! The host accepts raw bytes and hands back a stable URL plus a handle
//! that can later be used to delete the object. Only the
//! [`StoredImage`] pair is ever persisted.

use crate::error::HearthResult;
use crate::models::property::StoredImage;

/// Content types accepted for gallery uploads, with the file extension
/// used by hosts that key objects by name.
const ACCEPTED: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// Extension for an accepted content type, `None` for anything else.
/// Parameters such as `; charset=...` are ignored.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

pub trait ImageHost: Send + Sync {
    fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = HearthResult<StoredImage>> + Send;

    /// Deleting an unknown handle is not an error.
    fn delete(&self, handle: &str) -> impl Future<Output = HearthResult<()>> + Send;
}
