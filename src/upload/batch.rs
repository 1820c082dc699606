use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{
    validate_file, BlobError, BlobStore, LocalFile, PreviewFactory, PreviewHandle, ProgressEvent,
    ProgressSink, UploadPolicy,
};

/// Where an item is in its upload lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// Staged, not sent yet.
    Pending,
    Uploading { progress: u8 },
    Committed { url: String },
    Failed { error: String },
}

/// One validated file staged in a batch.
#[derive(Debug)]
pub struct UploadItem {
    file: LocalFile,
    preview: Option<PreviewHandle>,
    status: UploadStatus,
}

impl UploadItem {
    /// The staged file.
    pub fn file(&self) -> &LocalFile {
        &self.file
    }

    /// Display name of the staged file.
    pub fn name(&self) -> &str {
        self.file.name()
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.file.size()
    }

    /// Local preview URL, if one was allocated.
    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::url)
    }

    /// Current lifecycle state.
    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    /// Upload progress in percent; 100 once committed.
    pub fn progress(&self) -> u8 {
        match &self.status {
            UploadStatus::Uploading { progress } => *progress,
            UploadStatus::Committed { .. } => 100,
            UploadStatus::Pending | UploadStatus::Failed { .. } => 0,
        }
    }

    fn committed_url(&self) -> Option<&str> {
        match &self.status {
            UploadStatus::Committed { url } => Some(url),
            _ => None,
        }
    }
}

/// Returns unsettled items to `Pending` when an upload future is dropped
/// before every item resolved.
struct InFlight<'a> {
    batch: &'a mut UploadBatch,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(batch: &'a mut UploadBatch) -> Self {
        InFlight {
            batch,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        for item in &mut self.batch.items {
            if matches!(item.status, UploadStatus::Uploading { .. }) {
                item.status = UploadStatus::Pending;
            }
        }
        tracing::warn!(count = self.batch.items.len(), "batch upload abandoned");
    }
}

/// A file turned away by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub name: String,
    pub reason: String,
}

/// Zero or more staged files uploaded together.
///
/// The batch only ever holds files that passed validation. Dropping the
/// batch releases every outstanding preview.
pub struct UploadBatch {
    policy: UploadPolicy,
    previews: Arc<dyn PreviewFactory>,
    items: Vec<UploadItem>,
    error: Option<String>,
    partial_urls: Vec<String>,
    observer: Option<UnboundedSender<ProgressEvent>>,
}

impl UploadBatch {
    /// Create an empty batch validating against `policy`.
    pub fn new(policy: UploadPolicy, previews: impl PreviewFactory + 'static) -> Self {
        Self::with_factory(policy, Arc::new(previews))
    }

    /// Create an empty batch sharing an existing preview factory.
    pub fn with_factory(policy: UploadPolicy, previews: Arc<dyn PreviewFactory>) -> Self {
        UploadBatch {
            policy,
            previews,
            items: Vec::new(),
            error: None,
            partial_urls: Vec::new(),
            observer: None,
        }
    }

    /// Validate and stage files in input order.
    ///
    /// Invalid files are dropped and returned; the first rejection becomes
    /// the batch error.
    pub fn add_files<I>(&mut self, files: I) -> Vec<Rejected>
    where
        I: IntoIterator<Item = LocalFile>,
    {
        self.error = None;
        let mut rejected = Vec::new();

        for file in files {
            let validation = validate_file(&self.policy, &file);
            if !validation.valid {
                let reason = validation.error.unwrap_or_default();
                tracing::warn!(file = %file.name(), reason = %reason, "file rejected");
                rejected.push(Rejected {
                    name: file.name().to_string(),
                    reason,
                });
                continue;
            }

            let preview = if self.policy.previews {
                match PreviewHandle::acquire(&self.previews, &file) {
                    Ok(handle) => Some(handle),
                    Err(err) => {
                        tracing::warn!(file = %file.name(), error = %err, "staging without preview");
                        None
                    }
                }
            } else {
                None
            };

            self.items.push(UploadItem {
                file,
                preview,
                status: UploadStatus::Pending,
            });
        }

        if let Some(first) = rejected.first() {
            self.error = Some(first.reason.clone());
        }
        rejected
    }

    /// Drop one item and release its preview. Out of range is a no-op
    /// returning false.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        let item = self.items.remove(index);
        tracing::debug!(index, file = %item.name(), "item removed");
        true
    }

    /// Drop every item and release their previews.
    pub fn clear_all(&mut self) {
        self.items.clear();
        self.error = None;
    }

    /// Receive a `ProgressEvent` for every progress change from now on.
    /// Replaces any earlier observer.
    pub fn observe_progress(&mut self) -> UnboundedReceiver<ProgressEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observer = Some(tx);
        rx
    }

    /// Upload every item concurrently and wait for all of them.
    ///
    /// Returns the URLs in batch order and clears the batch when every item
    /// committed. Returns None for an empty batch, or when any item failed;
    /// then the batch is left intact, failed items carry their error, and
    /// the batch error aggregates all failures. URLs of items that did
    /// commit in a failed batch are kept in `partial_urls`.
    pub async fn upload_batch<B>(&mut self, store: &B, destination: &str) -> Option<Vec<String>>
    where
        B: BlobStore + ?Sized,
    {
        if self.items.is_empty() {
            tracing::debug!("upload requested for empty batch");
            return None;
        }

        self.error = None;
        for item in &mut self.items {
            item.status = UploadStatus::Uploading { progress: 0 };
        }
        tracing::debug!(count = self.items.len(), destination, "batch upload started");

        let mut in_flight = InFlight::new(self);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let uploads = join_all(in_flight.batch.items.iter().enumerate().map(|(index, item)| {
            let file = item.file.clone();
            let sink = ProgressSink::new(index, tx.clone());
            async move { store.upload(&file, destination, sink).await }
        }));
        drop(tx);
        tokio::pin!(uploads);

        let results: Vec<Result<String, BlobError>> = loop {
            tokio::select! {
                biased;
                Some(event) = rx.recv() => in_flight.batch.apply_progress(event),
                results = &mut uploads => break results,
            }
        };
        while let Ok(event) = rx.try_recv() {
            in_flight.batch.apply_progress(event);
        }
        in_flight.settle();

        let total = results.len();
        let mut failures = Vec::new();
        for (item, result) in self.items.iter_mut().zip(results) {
            match result {
                Ok(url) => item.status = UploadStatus::Committed { url },
                Err(err) => {
                    failures.push(format!("{}: {}", item.file.name(), err));
                    item.status = UploadStatus::Failed {
                        error: err.to_string(),
                    };
                }
            }
        }

        let committed = self
            .items
            .iter()
            .filter_map(|item| item.committed_url().map(str::to_string));

        if failures.is_empty() {
            let urls: Vec<String> = committed.collect();
            self.items.clear();
            tracing::debug!(count = urls.len(), "batch upload committed");
            return Some(urls);
        }

        let partial: Vec<String> = committed.collect();
        self.partial_urls.extend(partial);
        let message = format!(
            "Failed to upload {} of {} files: {}",
            failures.len(),
            total,
            failures.join("; ")
        );
        tracing::warn!(error = %message, "batch upload failed");
        self.error = Some(message);
        None
    }

    /// Delete blobs left behind by failed batches. Returns how many were
    /// deleted; URLs that could not be deleted stay listed.
    pub async fn discard_partial<B>(&mut self, store: &B) -> usize
    where
        B: BlobStore + ?Sized,
    {
        let urls = std::mem::take(&mut self.partial_urls);
        let results = join_all(urls.iter().map(|url| store.delete(url))).await;

        let mut deleted = 0;
        for (url, result) in urls.into_iter().zip(results) {
            match result {
                Ok(()) | Err(BlobError::NotFound(_)) => deleted += 1,
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "failed to discard partial upload");
                    self.partial_urls.push(url);
                }
            }
        }
        deleted
    }

    fn apply_progress(&mut self, event: ProgressEvent) {
        if let Some(item) = self.items.get_mut(event.index) {
            if let UploadStatus::Uploading { progress } = &mut item.status {
                *progress = (*progress).max(event.percent);
            }
        }
        if let Some(observer) = &self.observer {
            if observer.send(event).is_err() {
                self.observer = None;
            }
        }
    }

    /// Staged items in batch order.
    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// Number of staged items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True while any item is still uploading.
    pub fn is_uploading(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item.status, UploadStatus::Uploading { .. }))
    }

    /// The latest validation or upload error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Remote URLs committed by items of failed batches.
    pub fn partial_urls(&self) -> &[String] {
        &self.partial_urls
    }

    /// The validation policy for this batch.
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }
}
