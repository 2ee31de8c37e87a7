use std::sync::Arc;

use tracing::debug;

use crate::embedding::ContactEncoder;
use crate::store::Invoice;

use super::aggregate::aggregate;
use super::error::ScoringError;
use super::factors;
use super::rank::rank_and_select;
use super::types::{Factor, FactorScores, MatchInput, MatchParams, MatchResult};

/// Matching orchestrator.
///
/// Holds the contact encoder as an explicit injected dependency and owns no
/// other state; every call is a pure request/response cycle over the
/// candidate snapshot it is given.
pub struct Matcher {
    encoder: Arc<ContactEncoder>,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("encoder", &self.encoder)
            .finish()
    }
}

impl Matcher {
    pub fn new(encoder: Arc<ContactEncoder>) -> Self {
        Self { encoder }
    }

    /// Scores, ranks, and filters the invoice snapshot against the input.
    ///
    /// The input contact is encoded at most once, and only when the contact
    /// factor is requested and the contact text is non-empty.
    pub fn find_best_matches(
        &self,
        input: &MatchInput,
        invoices: &[Invoice],
        params: &MatchParams,
    ) -> Result<Vec<MatchResult>, ScoringError> {
        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = match (
            params.factors.contains(&Factor::Contact),
            input.contact_text(),
        ) {
            (true, Some(text)) => Some(self.encoder.encode(text)?),
            _ => None,
        };

        let scores: Vec<f64> = invoices
            .iter()
            .map(|invoice| {
                let factor_scores =
                    score_invoice(input, invoice, params, query_embedding.as_deref());
                aggregate(&factor_scores, &params.factors, &params.weights)
            })
            .collect();

        let ranked = rank_and_select(&scores, params.top_n, params.threshold);

        debug!(
            candidates = invoices.len(),
            matches = ranked.len(),
            top_n = params.top_n,
            threshold = params.threshold,
            "Ranking complete"
        );

        Ok(ranked
            .into_iter()
            .map(|(index, score)| MatchResult {
                score,
                input: input.clone(),
                invoice: invoices[index].clone(),
            })
            .collect())
    }
}

/// Computes the requested factor scores for one invoice.
///
/// `query_embedding` is `None` when the contact factor was not requested or
/// the input carried no contact claim; absence of a claim is never evidence
/// of a match, so every candidate then scores 0 on that factor.
fn score_invoice(
    input: &MatchInput,
    invoice: &Invoice,
    params: &MatchParams,
    query_embedding: Option<&[f32]>,
) -> FactorScores {
    let mut scores = FactorScores::default();

    for &factor in &params.factors {
        let score = match factor {
            Factor::Amount => factors::amount_score(invoice.amount, input.amount),
            Factor::Date => factors::date_score(invoice.date, input.date, params.date_method),
            Factor::Contact => match query_embedding {
                Some(query) => {
                    factors::contact_score(query, invoice.contact_embedding.as_deref())
                }
                None => 0.0,
            },
        };
        scores.set(factor, score);
    }

    scores
}
