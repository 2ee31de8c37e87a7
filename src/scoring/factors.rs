//! Independent per-field similarity scorers.
//!
//! Each scorer maps one factor of a (transaction, invoice) pair to a score
//! in [0, 1], with the documented exception of mixed-sign amounts.

use chrono::NaiveDate;

use crate::constants::{EXPONENTIAL_DECAY_RATE, LINEAR_MAX_DAYS};

use super::types::DateMethod;

/// Scale-relative amount similarity: `1 - |a - b| / max(a, b)`.
///
/// `max(a, b) == 0` scores 0 (zero/zero is no-match, not perfect-match).
/// The formula is deliberately not clamped; for non-negative amounts it
/// stays in [0, 1], and mixed-sign inputs are outside the defined domain.
pub fn amount_score(invoice_amount: f64, input_amount: f64) -> f64 {
    let denom = invoice_amount.max(input_amount);
    if denom == 0.0 {
        return 0.0;
    }
    let diff = (invoice_amount - input_amount).abs();
    1.0 - diff / denom
}

/// Temporal proximity under the selected decay policy.
///
/// An invoice without a date scores 0 on this factor and stays eligible on
/// the others.
pub fn date_score(
    invoice_date: Option<NaiveDate>,
    input_date: NaiveDate,
    method: DateMethod,
) -> f64 {
    let Some(invoice_date) = invoice_date else {
        return 0.0;
    };

    let days = invoice_date
        .signed_duration_since(input_date)
        .num_days()
        .unsigned_abs() as f64;

    match method {
        DateMethod::Linear => (1.0 - days / LINEAR_MAX_DAYS).max(0.0),
        DateMethod::Exponential => (-EXPONENTIAL_DECAY_RATE * days).exp(),
    }
}

/// Semantic contact similarity against a pre-encoded query vector.
///
/// An invoice without a stored embedding scores 0.
pub fn contact_score(query: &[f32], invoice_embedding: Option<&[f32]>) -> f64 {
    match invoice_embedding {
        Some(embedding) if !embedding.is_empty() => cosine_similarity(query, embedding) as f64,
        _ => 0.0,
    }
}

/// Cosine similarity between two vectors.
///
/// Embedding magnitude carries no meaning for semantic text models, so only
/// direction is compared. Length mismatches, empty vectors, and zero-norm
/// vectors all score 0.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
