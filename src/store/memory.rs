use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::error::StoreError;
use super::{Invoice, InvoiceStore, NewInvoice};

#[derive(Default)]
struct Inner {
    invoices: Vec<Invoice>,
    next_id: u64,
}

/// In-process invoice store with an optional JSON snapshot file.
///
/// Ids are assigned sequentially starting at 1 and survive snapshot
/// round-trips.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("count", &self.count())
            .finish()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a store from a JSON snapshot file. A missing file yields an
    /// empty store; a present but unreadable/unparsable file is an error.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "No invoice snapshot found, starting empty");
            return Ok(Self::new());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::SnapshotRead {
            path: path.to_path_buf(),
            source,
        })?;

        let invoices: Vec<Invoice> =
            serde_json::from_str(&raw).map_err(|source| StoreError::SnapshotParse {
                path: path.to_path_buf(),
                source,
            })?;

        let next_id = invoices.iter().map(|inv| inv.id).max().unwrap_or(0);

        info!(
            path = %path.display(),
            count = invoices.len(),
            "Loaded invoice snapshot"
        );

        Ok(Self {
            inner: RwLock::new(Inner { invoices, next_id }),
        })
    }

    /// Persists the current contents as a JSON snapshot (write-then-rename).
    pub fn persist(&self, path: &Path) -> Result<(), StoreError> {
        let write_err = |source| StoreError::SnapshotWrite {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let inner = self.inner.read();
        let raw = serde_json::to_vec(&inner.invoices).map_err(|source| {
            StoreError::SnapshotWrite {
                path: path.to_path_buf(),
                source: std::io::Error::other(source),
            }
        })?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &raw).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)?;

        info!(
            path = %path.display(),
            count = inner.invoices.len(),
            "Persisted invoice snapshot"
        );

        Ok(())
    }
}

impl InvoiceStore for MemoryStore {
    fn snapshot(&self) -> Vec<Invoice> {
        self.inner.read().invoices.clone()
    }

    fn insert_batch(&self, invoices: Vec<NewInvoice>) -> Result<usize, StoreError> {
        let mut inner = self.inner.write();
        let inserted = invoices.len();

        for new in invoices {
            inner.next_id += 1;
            let id = inner.next_id;
            inner.invoices.push(Invoice {
                id,
                file_name: new.file_name,
                contact_name: new.contact_name,
                contact_name_clean: new.contact_name_clean,
                date: new.date,
                amount: new.amount,
                contact_embedding: new.contact_embedding,
            });
        }

        Ok(inserted)
    }

    fn count(&self) -> usize {
        self.inner.read().invoices.len()
    }

    fn clear(&self) {
        let mut inner = self.inner.write();
        inner.invoices.clear();
        inner.next_id = 0;
    }
}
