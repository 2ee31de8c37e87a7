use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use super::encoder::ContactEncoder;
use super::error::EmbeddingError;

/// Shared encoder slot with an explicit not-ready → ready lifecycle.
///
/// The handle starts empty; installing an encoder flips it to ready for
/// every holder. Callers that need the capability use [`EncoderHandle::get`]
/// and surface [`EmbeddingError::NotReady`] as a retryable "service not
/// ready" condition, distinct from validation failures.
#[derive(Default)]
pub struct EncoderHandle {
    slot: RwLock<Option<Arc<ContactEncoder>>>,
}

impl std::fmt::Debug for EncoderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncoderHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl EncoderHandle {
    /// Creates an empty (not-ready) handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle that is ready from the start.
    pub fn ready(encoder: ContactEncoder) -> Self {
        Self {
            slot: RwLock::new(Some(Arc::new(encoder))),
        }
    }

    /// Installs the encoder, flipping the handle to ready.
    pub fn install(&self, encoder: ContactEncoder) {
        info!(stub = encoder.is_stub(), "Contact encoder ready");
        *self.slot.write() = Some(Arc::new(encoder));
    }

    /// Returns the encoder, or [`EmbeddingError::NotReady`].
    pub fn get(&self) -> Result<Arc<ContactEncoder>, EmbeddingError> {
        self.slot.read().clone().ok_or(EmbeddingError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Current mode for readiness reporting.
    pub fn mode(&self) -> &'static str {
        match self.slot.read().as_deref() {
            None => "pending",
            Some(encoder) if encoder.is_stub() => "stub",
            Some(_) => "model",
        }
    }
}
