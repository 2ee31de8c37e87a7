use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THRESHOLD, DEFAULT_TOP_N};
use crate::scoring::{DateMethod, Factor, MatchInput, MatchParams, Weights};
use crate::store::Invoice;

use super::error::GatewayError;

/// Body of `POST /reconcile`.
///
/// Everything except `amount` and `date` is optional and defaulted; the
/// response echoes the effective post-default parameters so callers can
/// audit what actually applied.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileRequest {
    pub amount: f64,

    /// ISO date string (`YYYY-MM-DD`).
    pub date: String,

    #[serde(default)]
    pub contact: Option<String>,

    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_factors")]
    pub factors: Vec<Factor>,

    #[serde(default)]
    pub weights: Option<WeightOverrides>,

    #[serde(default)]
    pub date_method: DateMethod,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_factors() -> Vec<Factor> {
    Factor::ALL.to_vec()
}

/// Partial per-factor weight overrides.
///
/// Unknown factor names fail deserialization (rejected at the validation
/// boundary). When a weight map is supplied it is used as-is: factors it
/// leaves out get weight 0, not their defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightOverrides {
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<f64>,
    #[serde(default)]
    pub contact: Option<f64>,
}

impl WeightOverrides {
    pub fn resolve(&self) -> Weights {
        Weights {
            amount: self.amount.unwrap_or(0.0),
            date: self.date.unwrap_or(0.0),
            contact: self.contact.unwrap_or(0.0),
        }
    }
}

impl ReconcileRequest {
    /// Validates the request and resolves defaults into core types.
    ///
    /// Rejected before any scoring: malformed dates, out-of-range `top_n`
    /// or `threshold`, negative weights.
    pub fn validate(&self) -> Result<(MatchInput, MatchParams), GatewayError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            GatewayError::InvalidRequest(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                self.date
            ))
        })?;

        let weights = self
            .weights
            .map(|overrides| overrides.resolve())
            .unwrap_or_default();

        let params = MatchParams {
            top_n: self.top_n,
            threshold: self.threshold,
            factors: self.factors.clone(),
            weights,
            date_method: self.date_method,
        };

        params
            .validate()
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

        let input = MatchInput {
            amount: self.amount,
            date,
            contact: self.contact.clone(),
        };

        Ok((input, params))
    }

    pub fn input_echo(&self) -> InputEcho {
        InputEcho {
            amount: self.amount,
            date: self.date.clone(),
            contact: self.contact.clone(),
        }
    }
}

/// Body of a `POST /reconcile` response.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub matches: Vec<MatchBody>,
    pub total_matches: usize,
    pub total_invoices: usize,
    pub request_params: EffectiveParams,
}

#[derive(Debug, Serialize)]
pub struct MatchBody {
    pub score: f64,
    pub input: InputEcho,
    pub invoice: InvoiceBody,
}

/// The submitted input, echoed back as received.
#[derive(Debug, Clone, Serialize)]
pub struct InputEcho {
    pub amount: f64,
    pub date: String,
    pub contact: Option<String>,
}

/// Invoice fields exposed to callers. The stored embedding is internal
/// and never serialized into responses.
#[derive(Debug, Serialize)]
pub struct InvoiceBody {
    pub id: u64,
    pub file_name: String,
    pub contact_name: Option<String>,
    pub contact_name_clean: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: f64,
}

impl From<Invoice> for InvoiceBody {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            file_name: invoice.file_name,
            contact_name: invoice.contact_name,
            contact_name_clean: invoice.contact_name_clean,
            date: invoice.date,
            amount: invoice.amount,
        }
    }
}

/// The effective parameters after defaulting, echoed for auditability.
#[derive(Debug, Serialize)]
pub struct EffectiveParams {
    pub threshold: f64,
    pub top_n: usize,
    pub factors: Vec<Factor>,
    pub weights: Weights,
    pub date_method: DateMethod,
    pub input: InputEcho,
}

impl EffectiveParams {
    pub fn new(params: &MatchParams, input: InputEcho) -> Self {
        Self {
            threshold: params.threshold,
            top_n: params.top_n,
            factors: params.factors.clone(),
            weights: params.weights,
            date_method: params.date_method,
            input,
        }
    }
}
