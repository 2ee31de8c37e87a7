//! Weighted aggregation of per-factor scores.

use super::types::{Factor, FactorScores, Weights};

/// Combines the computed factor scores into one weighted average.
///
/// Only factors that were actually computed contribute, and the total is
/// renormalized against their combined weight, so requesting a single
/// factor yields that factor's score unscaled. A total weight of zero is
/// the defined "no preference" fallback: every candidate scores 0 (no
/// match) rather than tying at 1.
pub fn aggregate(scores: &FactorScores, factors: &[Factor], weights: &Weights) -> f64 {
    let mut total = 0.0;
    let mut total_weight = 0.0;

    for &factor in factors {
        let Some(score) = scores.get(factor) else {
            continue;
        };
        let weight = weights.get(factor);
        total += score * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        total / total_weight
    } else {
        0.0
    }
}
