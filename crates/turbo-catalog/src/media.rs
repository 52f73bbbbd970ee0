//! Product images and local preview leases.
//!
//! Picking a local file creates a preview URL (the object-URL analogue) that
//! must be released once the file is superseded or the editor goes away. A
//! [`PreviewLease`] releases its URL on drop; images share leases through
//! `Arc`, so the URL lives exactly as long as some draft row still shows it.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
struct RegistryInner {
    live: Mutex<HashSet<String>>,
}

impl RegistryInner {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        // A poisoned set of URLs is still a valid set of URLs.
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Issues and tracks preview URLs for locally chosen files.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a preview URL for a file.
    pub fn acquire(&self, file_name: &str) -> PreviewLease {
        let url = format!("blob:preview/{}/{}", Uuid::new_v4(), file_name);
        self.inner.lock().insert(url.clone());
        debug!(url = %url, "preview acquired");
        PreviewLease {
            url,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Number of preview URLs not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.inner.lock().contains(url)
    }
}

/// A live preview URL; released when dropped.
pub struct PreviewLease {
    url: String,
    registry: Arc<RegistryInner>,
}

impl PreviewLease {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for PreviewLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewLease").field(&self.url).finish()
    }
}

impl Drop for PreviewLease {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.url);
        debug!(url = %self.url, "preview released");
    }
}

/// A file picked by the admin, pending upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
    preview: Arc<PreviewLease>,
}

impl ImageFile {
    /// Wrap file contents, acquiring a preview URL from `registry`.
    pub fn new(
        registry: &PreviewRegistry,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let file_name = file_name.into();
        let preview = Arc::new(registry.acquire(&file_name));
        Self {
            file_name,
            content_type: content_type.into(),
            bytes: bytes.into(),
            preview,
        }
    }

    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }
}

impl PartialEq for ImageFile {
    fn eq(&self, other: &Self) -> bool {
        self.preview.url() == other.preview.url()
    }
}

impl Serialize for ImageFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ImageFile", 4)?;
        s.serialize_field("fileName", &self.file_name)?;
        s.serialize_field("contentType", &self.content_type)?;
        s.serialize_field("size", &self.bytes.len())?;
        s.serialize_field("previewUrl", self.preview.url())?;
        s.end()
    }
}

/// An image that is either already stored (URL) or freshly picked (file).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    Url { url: String },
    File(ImageFile),
}

impl ImageSource {
    pub fn url(url: impl Into<String>) -> Self {
        ImageSource::Url { url: url.into() }
    }

    /// URL to show in the UI: stored URL or local preview.
    pub fn display_url(&self) -> &str {
        match self {
            ImageSource::Url { url } => url,
            ImageSource::File(file) => file.preview_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_released_on_drop() {
        let registry = PreviewRegistry::new();
        let file = ImageFile::new(&registry, "front.png", "image/png", vec![1u8, 2, 3]);
        let url = file.preview_url().to_string();
        assert!(registry.is_live(&url));

        let copy = file.clone();
        drop(file);
        assert!(registry.is_live(&url), "clone still holds the preview");

        drop(copy);
        assert!(!registry.is_live(&url));
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_superseding_image_releases_old_preview() {
        let registry = PreviewRegistry::new();
        let mut slot = Some(ImageSource::File(ImageFile::new(
            &registry,
            "a.png",
            "image/png",
            vec![0u8],
        )));
        assert_eq!(registry.live_count(), 1);
        assert!(slot.as_ref().unwrap().display_url().ends_with("a.png"));

        slot = Some(ImageSource::File(ImageFile::new(
            &registry,
            "b.png",
            "image/png",
            vec![0u8],
        )));
        assert_eq!(registry.live_count(), 1);
        assert!(slot.unwrap().display_url().ends_with("b.png"));
    }

    #[test]
    fn test_url_source_has_no_lease() {
        let source = ImageSource::url("https://cdn.example.com/x.png");
        assert_eq!(source.display_url(), "https://cdn.example.com/x.png");
    }
}
