use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use super::{
    validate_file, BlobStore, LocalFile, PreviewFactory, ProgressEvent, Rejected, UploadBatch,
    UploadItem, UploadPolicy,
};

/// Single-file variant of `UploadBatch`, used for the resume PDF.
///
/// Setting a valid file replaces (and releases) the current one; an invalid
/// file is rejected and the current one stays.
pub struct SingleUpload {
    batch: UploadBatch,
}

impl SingleUpload {
    pub fn new(policy: UploadPolicy, previews: impl PreviewFactory + 'static) -> Self {
        SingleUpload {
            batch: UploadBatch::new(policy, previews),
        }
    }

    pub fn with_factory(policy: UploadPolicy, previews: Arc<dyn PreviewFactory>) -> Self {
        SingleUpload {
            batch: UploadBatch::with_factory(policy, previews),
        }
    }

    /// Stage `file`, replacing the current one if it passes validation.
    pub fn set_file(&mut self, file: LocalFile) -> Result<(), Rejected> {
        if validate_file(self.batch.policy(), &file).valid {
            self.batch.clear_all();
        }
        match self.batch.add_files(std::iter::once(file)).pop() {
            Some(rejected) => Err(rejected),
            None => Ok(()),
        }
    }

    /// Drop the staged file and release its preview.
    pub fn clear(&mut self) {
        self.batch.clear_all();
    }

    /// Upload the staged file. Returns its URL and clears it on success.
    pub async fn upload<B>(&mut self, store: &B, destination: &str) -> Option<String>
    where
        B: BlobStore + ?Sized,
    {
        self.batch
            .upload_batch(store, destination)
            .await
            .and_then(|urls| urls.into_iter().next())
    }

    pub fn observe_progress(&mut self) -> UnboundedReceiver<ProgressEvent> {
        self.batch.observe_progress()
    }

    /// The staged file, if any.
    pub fn item(&self) -> Option<&UploadItem> {
        self.batch.items().first()
    }

    pub fn is_uploading(&self) -> bool {
        self.batch.is_uploading()
    }

    pub fn error(&self) -> Option<&str> {
        self.batch.error()
    }

    pub fn partial_urls(&self) -> &[String] {
        self.batch.partial_urls()
    }
}
