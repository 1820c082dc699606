use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{BlobError, LocalFile};

/// Progress of one batch item, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub index: usize,
    pub percent: u8,
}

/// Per-item progress reporter handed to a `BlobStore` upload.
///
/// Reports are clamped to 100 and never go backwards; a report lower than
/// the last one is dropped.
#[derive(Debug)]
pub struct ProgressSink {
    index: usize,
    last: Option<u8>,
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressSink {
    pub fn new(index: usize, tx: UnboundedSender<ProgressEvent>) -> Self {
        ProgressSink {
            index,
            last: None,
            tx: Some(tx),
        }
    }

    /// A sink nobody listens to.
    pub fn detached() -> Self {
        ProgressSink {
            index: 0,
            last: None,
            tx: None,
        }
    }

    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.last.is_some_and(|last| percent < last) {
            return;
        }
        self.last = Some(percent);
        if let Some(tx) = &self.tx {
            if tx
                .send(ProgressEvent {
                    index: self.index,
                    percent,
                })
                .is_err()
            {
                self.tx = None;
            }
        }
    }

    /// The last percentage reported, if any.
    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

/// Remote binary storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `file` under `destination`, reporting progress, and return its public URL.
    async fn upload(
        &self,
        file: &LocalFile,
        destination: &str,
        progress: ProgressSink,
    ) -> Result<String, BlobError>;

    /// Delete a previously uploaded blob.
    async fn delete(&self, url: &str) -> Result<(), BlobError>;
}
