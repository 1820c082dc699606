extern crate self as folio_state;

pub mod focus;
pub mod persist;
pub mod storage;
pub mod upload;

pub use focus::{
    contains, focusable_within, is_tabbable, Element, FocusHost, FocusTrap, InMemoryDocument,
    Key, KeyEvent, KeyOutcome, Modal, NodeId, Tag,
};
pub use persist::{FilterState, PersistError, PersistentState};
pub use storage::{InMemoryStorage, KeyValueStore, StorageError};
#[cfg(feature = "web")]
pub use storage::LocalStorage;
pub use upload::{
    format_size, validate_file, BlobError, BlobStore, InMemoryBlobStore, InMemoryPreviews,
    LocalFile, PreviewError, PreviewFactory, PreviewHandle, ProgressEvent, ProgressSink, Rejected,
    SingleUpload, UploadBatch, UploadItem, UploadPolicy, UploadStatus, Validation,
};

// Derive macro for `FilterState`, sharing the trait's name.
pub use folio_state_macros::FilterState;
