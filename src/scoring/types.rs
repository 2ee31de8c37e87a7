use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AMOUNT_WEIGHT, DEFAULT_CONTACT_WEIGHT, DEFAULT_DATE_WEIGHT, DEFAULT_THRESHOLD,
    DEFAULT_TOP_N, MAX_TOP_N, MIN_TOP_N,
};
use crate::store::Invoice;

use super::error::ScoringError;

/// One of the three comparable attributes contributing to a match score.
///
/// A closed enumeration: unknown factor names fail deserialization at the
/// validation boundary instead of being silently ignored during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Amount,
    Date,
    Contact,
}

impl Factor {
    pub const ALL: [Factor; 3] = [Factor::Amount, Factor::Date, Factor::Contact];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Amount => "amount",
            Factor::Date => "date",
            Factor::Contact => "contact",
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date decay policy.
///
/// Linear suits strict reconciliation windows (zero at 60 days apart);
/// exponential suits fuzzy long-tail matching (asymptotic, never exactly 0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMethod {
    Linear,
    #[default]
    Exponential,
}

/// Per-factor weights. Non-negative, need not sum to 1; aggregation
/// renormalizes against the weights of the factors actually scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub amount: f64,
    pub date: f64,
    pub contact: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT_WEIGHT,
            date: DEFAULT_DATE_WEIGHT,
            contact: DEFAULT_CONTACT_WEIGHT,
        }
    }
}

impl Weights {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Amount => self.amount,
            Factor::Date => self.date,
            Factor::Contact => self.contact,
        }
    }
}

/// The incoming transaction to reconcile. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInput {
    pub amount: f64,
    pub date: NaiveDate,
    pub contact: Option<String>,
}

impl MatchInput {
    /// Trimmed contact text, or `None` when absent or whitespace-only.
    pub fn contact_text(&self) -> Option<&str> {
        self.contact
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Ephemeral per-candidate factor scores; `Some` only for factors that
/// were actually computed. Discarded after aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FactorScores {
    pub amount: Option<f64>,
    pub date: Option<f64>,
    pub contact: Option<f64>,
}

impl FactorScores {
    pub fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::Amount => self.amount,
            Factor::Date => self.date,
            Factor::Contact => self.contact,
        }
    }

    pub fn set(&mut self, factor: Factor, score: f64) {
        match factor {
            Factor::Amount => self.amount = Some(score),
            Factor::Date => self.date = Some(score),
            Factor::Contact => self.contact = Some(score),
        }
    }
}

/// Effective matching parameters after request defaulting.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchParams {
    pub top_n: usize,
    pub threshold: f64,
    pub factors: Vec<Factor>,
    pub weights: Weights,
    pub date_method: DateMethod,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            threshold: DEFAULT_THRESHOLD,
            factors: Factor::ALL.to_vec(),
            weights: Weights::default(),
            date_method: DateMethod::default(),
        }
    }
}

impl MatchParams {
    /// Checks ranges before any scoring is attempted.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.top_n < MIN_TOP_N || self.top_n > MAX_TOP_N {
            return Err(ScoringError::InvalidParams {
                reason: format!(
                    "top_n must be between {MIN_TOP_N} and {MAX_TOP_N}, got {}",
                    self.top_n
                ),
            });
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ScoringError::InvalidParams {
                reason: format!("threshold must be in [0, 1], got {}", self.threshold),
            });
        }

        for factor in Factor::ALL {
            let weight = self.weights.get(factor);
            // `!(w >= 0)` also rejects NaN.
            if !(weight >= 0.0) {
                return Err(ScoringError::InvalidParams {
                    reason: format!("weight for {factor} must be non-negative, got {weight}"),
                });
            }
        }

        Ok(())
    }
}

/// One ranked match, best-first. Constructed only by the ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Weighted aggregate score in [0, 1] for in-range factor scores.
    pub score: f64,
    /// Snapshot of the submitted input.
    pub input: MatchInput,
    /// Snapshot of the matched invoice.
    pub invoice: Invoice,
}
