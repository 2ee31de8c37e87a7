//! Ordering and selection of scored candidates.

use std::cmp::Ordering;

/// Ranks candidates by score descending and selects the survivors.
///
/// Returns `(candidate_index, score)` pairs, best first. The sort is
/// stable, so equal scores keep first-seen candidate order. Top-N
/// truncation happens BEFORE threshold filtering: the threshold only ever
/// removes entries from the top-N cut, never admits candidates beyond it,
/// so the result holds between 0 and `top_n` entries.
pub fn rank_and_select(scores: &[f64], top_n: usize, threshold: f64) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();

    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ranked.truncate(top_n);
    ranked.retain(|&(_, score)| score >= threshold);
    ranked
}
