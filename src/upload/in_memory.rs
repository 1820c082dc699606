//! InMemoryBlobStore - HashMap-backed blob store for testing and development.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::{BlobError, BlobStore, LocalFile, ProgressSink};

#[derive(Default)]
struct Bucket {
    blobs: HashMap<String, Bytes>,
    reject: HashSet<String>,
    offline: bool,
    seq: u64,
    uploads: usize,
}

/// In-memory blob store.
///
/// URLs look like `memory://{destination}/{seq}-{name}`. Clone-friendly via
/// Arc. Uploads report 0, 50 and 100 percent.
#[derive(Clone, Default)]
pub struct InMemoryBlobStore {
    bucket: Arc<RwLock<Bucket>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every later upload of a file with this name.
    pub fn reject_name(&self, name: impl Into<String>) {
        if let Ok(mut bucket) = self.bucket.write() {
            bucket.reject.insert(name.into());
        }
    }

    /// Fail every upload and delete with a network error while offline.
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut bucket) = self.bucket.write() {
            bucket.offline = offline;
        }
    }

    /// Contents stored at `url`.
    pub fn get(&self, url: &str) -> Option<Bytes> {
        self.bucket.read().ok()?.blobs.get(url).cloned()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.bucket.read().map(|b| b.blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upload attempts seen, successful or not.
    pub fn upload_attempts(&self) -> usize {
        self.bucket.read().map(|b| b.uploads).unwrap_or(0)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(
        &self,
        file: &LocalFile,
        destination: &str,
        mut progress: ProgressSink,
    ) -> Result<String, BlobError> {
        progress.report(0);

        let mut bucket = self
            .bucket
            .write()
            .map_err(|_| BlobError::LockPoisoned("blob upload"))?;
        bucket.uploads += 1;

        if bucket.offline {
            return Err(BlobError::Network("blob store unreachable".into()));
        }
        if bucket.reject.contains(file.name()) {
            return Err(BlobError::Rejected {
                name: file.name().to_string(),
                reason: "refused by storage rules".into(),
            });
        }

        progress.report(50);

        bucket.seq += 1;
        let url = format!(
            "memory://{}/{}-{}",
            destination.trim_matches('/'),
            bucket.seq,
            file.name()
        );
        bucket.blobs.insert(url.clone(), file.data().clone());

        progress.report(100);
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), BlobError> {
        let mut bucket = self
            .bucket
            .write()
            .map_err(|_| BlobError::LockPoisoned("blob delete"))?;
        if bucket.offline {
            return Err(BlobError::Network("blob store unreachable".into()));
        }
        match bucket.blobs.remove(url) {
            Some(_) => Ok(()),
            None => Err(BlobError::NotFound(url.to_string())),
        }
    }
}
