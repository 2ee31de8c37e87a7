//! Shared defaults and bounds.
//!
//! Request-level defaults are part of the documented API contract; changing
//! them changes observable behavior for callers that rely on defaulting.

/// Default number of ranked matches returned.
pub const DEFAULT_TOP_N: usize = 3;

/// Smallest accepted `top_n`.
pub const MIN_TOP_N: usize = 1;

/// Largest accepted `top_n`.
pub const MAX_TOP_N: usize = 50;

/// Default minimum aggregate score for a match to be returned.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Default factor weights (need not sum to 1, but these do).
pub const DEFAULT_AMOUNT_WEIGHT: f64 = 0.90;
pub const DEFAULT_DATE_WEIGHT: f64 = 0.05;
pub const DEFAULT_CONTACT_WEIGHT: f64 = 0.05;

/// Linear date decay reaches zero at this many days apart.
pub const LINEAR_MAX_DAYS: f64 = 60.0;

/// Exponential date decay rate per day apart.
pub const EXPONENTIAL_DECAY_RATE: f64 = 0.01;

/// Default output dimension of the contact encoder.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Default max tokens considered per contact name.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Default batch size for ingest-time embedding precomputation.
pub const DEFAULT_INGEST_BATCH_SIZE: usize = 128;

/// Response header carrying the coarse outcome of a request.
pub const LEDGERMATCH_STATUS_HEADER: &str = "x-ledgermatch-status";

pub const STATUS_MATCHED: &str = "matched";
pub const STATUS_NO_MATCH: &str = "no_match";
pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_NOT_READY: &str = "not_ready";
pub const STATUS_ERROR: &str = "error";
