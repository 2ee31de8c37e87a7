use std::sync::Arc;

use crate::embedding::EncoderHandle;
use crate::store::InvoiceStore;

/// Shared per-request state: the invoice store and the encoder lifecycle
/// handle. Both are constructor-injected; the gateway owns nothing global.
#[derive(Clone)]
pub struct HandlerState {
    pub store: Arc<dyn InvoiceStore>,
    pub encoder: Arc<EncoderHandle>,
}

impl HandlerState {
    pub fn new(store: Arc<dyn InvoiceStore>, encoder: Arc<EncoderHandle>) -> Self {
        Self { store, encoder }
    }
}
