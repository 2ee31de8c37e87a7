//! Multi-factor similarity scoring and ranking.
//!
//! The pipeline is a pure function of its inputs: per-factor scorers
//! ([`factors`]) produce normalized scores in [0, 1], [`aggregate`] combines
//! them into one weighted score per candidate, [`rank`] orders and selects,
//! and [`Matcher`] wires the three together around a single optional
//! embedding lookup. No component mutates the candidate snapshot, and no
//! state survives across invocations.

pub mod aggregate;
pub mod error;
pub mod factors;
pub mod matcher;
pub mod rank;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ScoringError;
pub use matcher::Matcher;
pub use types::{DateMethod, Factor, FactorScores, MatchInput, MatchParams, MatchResult, Weights};
