//! Invoice records and the store seam.
//!
//! The matching core only ever sees a read-only snapshot of the invoice
//! collection; [`InvoiceStore`] is the seam between the two. The default
//! implementation is [`MemoryStore`], an in-process collection with an
//! optional JSON snapshot file.

mod error;
pub mod memory;


pub use error::StoreError;
pub use memory::MemoryStore;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored invoice record as seen by the matching core.
///
/// `date` and `contact_embedding` are optional: a record missing either
/// simply scores 0 on the affected factor and stays eligible on the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u64,
    pub file_name: String,
    pub contact_name: Option<String>,
    pub contact_name_clean: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: f64,
    /// Precomputed at ingest time, never by the matching core.
    pub contact_embedding: Option<Vec<f32>>,
}

/// A new invoice before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub file_name: String,
    pub contact_name: Option<String>,
    pub contact_name_clean: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub contact_embedding: Option<Vec<f32>>,
}

/// Read/write seam over the invoice collection.
pub trait InvoiceStore: Send + Sync {
    /// Returns a read-only snapshot of every invoice at call time.
    fn snapshot(&self) -> Vec<Invoice>;

    /// Inserts a batch, assigning sequential ids. Returns the count inserted.
    fn insert_batch(&self, invoices: Vec<NewInvoice>) -> Result<usize, StoreError>;

    fn count(&self) -> usize;

    fn clear(&self);
}
