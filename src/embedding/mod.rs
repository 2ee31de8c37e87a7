//! Contact-name embedding.
//!
//! [`ContactEncoder`] maps contact text to a fixed-length L2-normalized
//! vector (BERT mean pooling, or a deterministic stub when no model files
//! are configured). [`EncoderHandle`] wraps the encoder in an explicit
//! not-ready → ready lifecycle so callers can distinguish "service still
//! loading" from every other failure.

/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Contact encoder (BERT + tokenizer, with stub mode).
pub mod encoder;
mod error;
/// Readiness lifecycle around the encoder.
pub mod handle;

pub use encoder::{ContactEncoder, EncoderConfig};
pub use error::EmbeddingError;
pub use handle::EncoderHandle;
