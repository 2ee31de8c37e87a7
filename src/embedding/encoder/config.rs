use std::path::PathBuf;

use crate::constants::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN};
use crate::embedding::error::EmbeddingError;

/// Configuration for [`ContactEncoder`](super::ContactEncoder).
///
/// `model_dir` must contain `config.json`, `model.safetensors`, and
/// `tokenizer.json` (the layout of an exported sentence-transformers BERT
/// model). Use [`EncoderConfig::stub`] for tests and model-less operation.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Directory holding the model weights, config, and tokenizer.
    pub model_dir: PathBuf,
    /// Max tokens considered per contact name.
    pub max_seq_len: usize,
    /// Output embedding dimension.
    pub embedding_dim: usize,
    /// If true, produce deterministic stub vectors (no model files needed).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (deterministic vectors, no model files).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.testing_stub {
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }

    pub(super) fn weights_path(&self) -> PathBuf {
        self.model_dir.join("model.safetensors")
    }

    pub(super) fn model_config_path(&self) -> PathBuf {
        self.model_dir.join("config.json")
    }

    pub(super) fn tokenizer_path(&self) -> PathBuf {
        self.model_dir.join("tokenizer.json")
    }
}
