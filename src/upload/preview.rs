use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use super::{LocalFile, PreviewError};

/// Allocates and releases local preview URLs (object URLs in a browser).
///
/// Preview URLs are process-wide resources; every URL returned by `create`
/// must be passed to `revoke` exactly once. `PreviewHandle` enforces that.
pub trait PreviewFactory: Send + Sync {
    /// Allocate a preview URL for `file`.
    fn create(&self, file: &LocalFile) -> Result<String, PreviewError>;

    /// Release a URL previously returned by `create`.
    fn revoke(&self, url: &str);
}

/// Owned preview URL, released when dropped.
pub struct PreviewHandle {
    url: String,
    factory: Arc<dyn PreviewFactory>,
}

impl PreviewHandle {
    pub fn acquire(factory: &Arc<dyn PreviewFactory>, file: &LocalFile) -> Result<Self, PreviewError> {
        let url = factory.create(file)?;
        tracing::debug!(file = %file.name(), url = %url, "preview created");
        Ok(PreviewHandle {
            url,
            factory: Arc::clone(factory),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        tracing::debug!(url = %self.url, "preview released");
        self.factory.revoke(&self.url);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

#[derive(Default)]
struct Ledger {
    next: u64,
    live: HashSet<String>,
    created: usize,
    released: usize,
    double_released: usize,
}

/// In-memory preview allocator that keeps a ledger of every URL it issued.
///
/// Clone-friendly via Arc; tests hold a clone to audit releases.
#[derive(Clone, Default)]
pub struct InMemoryPreviews {
    ledger: Arc<Mutex<Ledger>>,
    failing: bool,
}

impl InMemoryPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator whose `create` always fails.
    pub fn failing() -> Self {
        InMemoryPreviews {
            ledger: Arc::default(),
            failing: true,
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        match self.ledger.lock() {
            Ok(ledger) => f(&ledger),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// URLs issued so far.
    pub fn created(&self) -> usize {
        self.read(|l| l.created)
    }

    /// URLs released so far.
    pub fn released(&self) -> usize {
        self.read(|l| l.released)
    }

    /// URLs issued but not yet released.
    pub fn live(&self) -> usize {
        self.read(|l| l.live.len())
    }

    /// Revocations of URLs that were not live.
    pub fn double_releases(&self) -> usize {
        self.read(|l| l.double_released)
    }
}

impl PreviewFactory for InMemoryPreviews {
    fn create(&self, file: &LocalFile) -> Result<String, PreviewError> {
        if self.failing {
            return Err(PreviewError(format!("cannot preview {}", file.name())));
        }
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| PreviewError("preview ledger poisoned".into()))?;
        ledger.next += 1;
        let url = format!("blob:folio/{}", ledger.next);
        ledger.live.insert(url.clone());
        ledger.created += 1;
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        let Ok(mut ledger) = self.ledger.lock() else {
            return;
        };
        if ledger.live.remove(url) {
            ledger.released += 1;
        } else {
            tracing::warn!(url = %url, "preview released twice or never issued");
            ledger.double_released += 1;
        }
    }
}
