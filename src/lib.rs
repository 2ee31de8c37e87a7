//! Ledgermatch library crate (used by the server binary and integration
//! tests).
//!
//! Reconciles an incoming transaction (amount, date, optional contact name)
//! against stored invoice records, returning a ranked list of best-matching
//! invoices above a similarity threshold.
//!
//! # Public API Surface
//!
//! ## Core Scoring
//! - [`Matcher`] - matching orchestrator (scorers → aggregator → ranker)
//! - [`MatchInput`], [`MatchParams`], [`MatchResult`] - engine I/O
//! - [`Factor`], [`Weights`], [`DateMethod`] - the typed parameter surface
//!
//! ## Embedding
//! - [`ContactEncoder`], [`EncoderConfig`] - text → vector capability
//! - [`EncoderHandle`] - not-ready → ready lifecycle around the encoder
//!
//! ## Plumbing
//! - [`Config`], [`ConfigError`] - server configuration
//! - [`Invoice`], [`InvoiceStore`], [`MemoryStore`] - invoice records
//! - [`ingest_csv`] - bulk CSV ingestion with embedding precomputation
//! - [`gateway`] - axum router and handlers

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod ingest;
pub mod scoring;
pub mod store;

pub use config::{Config, ConfigError};
pub use embedding::{ContactEncoder, EmbeddingError, EncoderConfig, EncoderHandle};
pub use gateway::{HandlerState, create_router_with_state};
pub use ingest::{IngestError, IngestReport, ingest_csv};
pub use scoring::{
    DateMethod, Factor, MatchInput, MatchParams, MatchResult, Matcher, ScoringError, Weights,
};
pub use store::{Invoice, InvoiceStore, MemoryStore, NewInvoice, StoreError};
