//! Upload - Staged local files, validated and pushed to a blob store.
//!
//! Files enter an `UploadBatch` through `add_files`, which validates each one
//! against an `UploadPolicy` and gives image files a preview handle. Invalid
//! files never enter the batch. `upload_batch` fans out one upload per item
//! to a `BlobStore`, streams `ProgressEvent`s back, and joins on all of them:
//! every item committed means the batch is cleared and the URLs returned;
//! any failure leaves the batch intact for a retry.
//!
//! Preview handles release themselves when dropped, so every exit path
//! (removal, clear, successful upload, teardown) releases each handle once.
//!
//! ## Example
//!
//! ```ignore
//! use folio_state::{InMemoryBlobStore, InMemoryPreviews, LocalFile, UploadBatch, UploadPolicy};
//!
//! let store = InMemoryBlobStore::new();
//! let mut batch = UploadBatch::new(UploadPolicy::images(), InMemoryPreviews::new());
//! batch.add_files(vec![LocalFile::new("cover.png", "image/png", png_bytes)]);
//!
//! let urls = batch.upload_batch(&store, "projects/cover").await;
//! ```

mod batch;
mod blob;
mod in_memory;
mod preview;
mod single;
mod validate;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const MIB: u64 = 1024 * 1024;

/// A file picked by the user, not yet uploaded.
///
/// Cloning is cheap: the payload is reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    name: String,
    mime_type: String,
    data: Bytes,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        LocalFile {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// What an upload form accepts.
///
/// Deserializable so forms can be configured from JSON; missing fields fall
/// back to the image preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Accepted MIME types. An entry like `image/*` accepts a whole family.
    pub allowed_types: Vec<String>,
    /// Largest accepted payload, in bytes.
    pub max_bytes: u64,
    /// Whether accepted files get a local preview handle.
    pub previews: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::images()
    }
}

impl UploadPolicy {
    /// JPEG, PNG, GIF and WebP up to 5 MB, with previews.
    pub fn images() -> Self {
        UploadPolicy {
            allowed_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_bytes: 5 * MIB,
            previews: true,
        }
    }

    /// PDF documents up to 10 MB, without previews.
    pub fn pdf() -> Self {
        UploadPolicy {
            allowed_types: vec!["application/pdf".to_string()],
            max_bytes: 10 * MIB,
            previews: false,
        }
    }

    pub fn with_allowed_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_previews(mut self, previews: bool) -> Self {
        self.previews = previews;
        self
    }

    /// True if `mime_type` matches an allowed entry.
    pub fn allows_type(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|allowed| {
            match allowed.strip_suffix("/*") {
                Some(family) => mime_type
                    .split_once('/')
                    .is_some_and(|(head, _)| head.eq_ignore_ascii_case(family)),
                None => allowed.eq_ignore_ascii_case(mime_type),
            }
        })
    }
}

/// Error type for blob store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// The store refused this file.
    Rejected { name: String, reason: String },
    /// The store could not be reached.
    Network(String),
    /// No blob at this URL.
    NotFound(String),
    /// The underlying lock was poisoned.
    LockPoisoned(&'static str),
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobError::Rejected { name, reason } => {
                write!(f, "upload of {} rejected: {}", name, reason)
            }
            BlobError::Network(msg) => write!(f, "network error: {}", msg),
            BlobError::NotFound(url) => write!(f, "blob not found: {}", url),
            BlobError::LockPoisoned(operation) => {
                write!(f, "blob store lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for BlobError {}

/// A preview could not be allocated for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewError(pub String);

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preview allocation failed: {}", self.0)
    }
}

impl std::error::Error for PreviewError {}

pub use batch::{Rejected, UploadBatch, UploadItem, UploadStatus};
pub use blob::{BlobStore, ProgressEvent, ProgressSink};
pub use in_memory::InMemoryBlobStore;
pub use preview::{InMemoryPreviews, PreviewFactory, PreviewHandle};
pub use single::SingleUpload;
pub use validate::{format_size, validate_file, Validation};
