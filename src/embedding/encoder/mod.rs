//! Contact encoder (BERT mean pooling + tokenizer).
//!
//! Use [`EncoderConfig::stub`] for tests/operation without model files.

/// Encoder configuration.
pub mod config;


pub use config::EncoderConfig;

use candle_core::{Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;

enum EncoderBackend {
    Model {
        model: BertModel,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Deterministic text → fixed-length L2-normalized vector capability.
pub struct ContactEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for ContactEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({device:?})"),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl ContactEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Contact encoder running in STUB mode (no model files)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for contact encoder");

        let (model, tokenizer) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Contact encoder model loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    fn load_model(
        config: &EncoderConfig,
        device: &Device,
    ) -> Result<(BertModel, Tokenizer), EmbeddingError> {
        for required in [
            config.model_config_path(),
            config.weights_path(),
            config.tokenizer_path(),
        ] {
            if !required.is_file() {
                return Err(EmbeddingError::ModelNotFound { path: required });
            }
        }

        let bert_config: BertConfig =
            serde_json::from_str(&std::fs::read_to_string(config.model_config_path())?).map_err(
                |e| EmbeddingError::ModelLoadFailed {
                    reason: format!("Failed to parse config.json: {e}"),
                },
            )?;

        if config.embedding_dim > bert_config.hidden_size {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!(
                    "embedding_dim ({}) exceeds model hidden_size ({})",
                    config.embedding_dim, bert_config.hidden_size
                ),
            });
        }

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[config.weights_path()], DTYPE, device)?
        };

        // Exported checkpoints sometimes nest the encoder under a "bert" prefix.
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &bert_config)
        } else {
            BertModel::load(vb, &bert_config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to load BERT model: {e}"),
        })?;

        let mut tokenizer = Tokenizer::from_file(config.tokenizer_path()).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load tokenizer: {e}"),
            }
        })?;

        let truncation = TruncationParams {
            max_length: config.max_seq_len,
            ..Default::default()
        };
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to configure truncation: {e}"),
            })?;

        Ok((model, tokenizer))
    }

    /// Encodes one text into an L2-normalized vector.
    ///
    /// Deterministic for identical input text in both backends.
    pub fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.encode_with_model(text, model, tokenizer, device),
            EncoderBackend::Stub => Ok(self.encode_stub(text)),
        }
    }

    /// Encodes a batch of texts (sequential forward passes).
    pub fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    fn encode_with_model(
        &self,
        text: &str,
        model: &BertModel,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let tokens = encoding.get_ids();
        if tokens.is_empty() {
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = tokens.len(),
            "Encoding contact text"
        );

        let input_ids = Tensor::new(tokens, device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        // [1, seq_len, hidden_size]
        let hidden_states = model.forward(&input_ids, &type_ids, Some(&attention_mask))?;

        // Mean pooling over the sequence (single unpadded sequence).
        let mut pooled = hidden_states.mean(1)?.i(0)?.to_vec1::<f32>()?;
        pooled.truncate(self.config.embedding_dim);

        Ok(normalize(pooled))
    }

    fn encode_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.config.embedding_dim);
        let mut state = seed;

        for _ in 0..self.config.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        normalize(embedding)
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
