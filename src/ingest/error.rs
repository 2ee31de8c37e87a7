use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
