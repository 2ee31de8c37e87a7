use chrono::NaiveDate;
use std::sync::Arc;

use crate::embedding::{ContactEncoder, EncoderConfig};
use crate::store::Invoice;

use super::aggregate::aggregate;
use super::factors::{amount_score, contact_score, cosine_similarity, date_score};
use super::matcher::Matcher;
use super::rank::rank_and_select;
use super::types::{DateMethod, Factor, FactorScores, MatchInput, MatchParams, Weights};

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn invoice(id: u64, amount: f64, date: Option<NaiveDate>, embedding: Option<Vec<f32>>) -> Invoice {
    Invoice {
        id,
        file_name: format!("invoice_{id}.pdf"),
        contact_name: Some(format!("Contact {id}")),
        contact_name_clean: Some(format!("contact {id}")),
        date,
        amount,
        contact_embedding: embedding,
    }
}

fn stub_encoder() -> Arc<ContactEncoder> {
    Arc::new(ContactEncoder::load(EncoderConfig::stub()).unwrap())
}

#[test]
fn test_amount_score_identical() {
    assert!((amount_score(100.0, 100.0) - 1.0).abs() < EPS);
}

#[test]
fn test_amount_score_zero_zero_is_no_match() {
    assert_eq!(amount_score(0.0, 0.0), 0.0);
}

#[test]
fn test_amount_score_scale_relative() {
    assert!(approx(amount_score(50.0, 100.0), 0.5));
    assert!(approx(amount_score(100.0, 50.0), 0.5));
    assert!(approx(amount_score(95.0, 100.0), 0.95));
}

#[test]
fn test_amount_score_mixed_sign_is_unclamped() {
    // Documented open question: mixed-sign amounts leave [0, 1].
    assert!(amount_score(-100.0, 100.0) < 0.0);
}

#[test]
fn test_date_score_exponential_decay() {
    let input = day(1);
    assert!(approx(
        date_score(Some(input), input, DateMethod::Exponential),
        1.0
    ));

    let far = input + chrono::Days::new(100);
    let score = date_score(Some(far), input, DateMethod::Exponential);
    assert!((score - (-1.0f64).exp()).abs() < 1e-6);
    assert!((score - 0.3679).abs() < 1e-4);
}

#[test]
fn test_date_score_linear_window() {
    let input = day(1);
    let at = |days: u64| date_score(Some(input + chrono::Days::new(days)), input, DateMethod::Linear);

    assert!(approx(at(0), 1.0));
    assert!(approx(at(30), 0.5));
    assert!(approx(at(60), 0.0));
    // Clamped, not negative.
    assert_eq!(at(90), 0.0);
}

#[test]
fn test_date_score_symmetric() {
    let input = day(15);
    let before = day(10);
    let after = day(20);
    assert_eq!(
        date_score(Some(before), input, DateMethod::Linear),
        date_score(Some(after), input, DateMethod::Linear)
    );
}

#[test]
fn test_date_score_missing_date_is_zero() {
    assert_eq!(date_score(None, day(1), DateMethod::Linear), 0.0);
    assert_eq!(date_score(None, day(1), DateMethod::Exponential), 0.0);
}

#[test]
fn test_cosine_similarity_self_is_one() {
    let v = vec![0.3f32, -0.5, 0.8, 0.1];
    assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
}

#[test]
fn test_cosine_similarity_orthogonal_is_zero() {
    let a = vec![1.0f32, 0.0];
    let b = vec![0.0f32, 1.0];
    assert_eq!(cosine_similarity(&a, &b), 0.0);
}

#[test]
fn test_cosine_similarity_degenerate_inputs() {
    let v = vec![1.0f32, 2.0];
    assert_eq!(cosine_similarity(&v, &[1.0]), 0.0);
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&v, &[0.0, 0.0]), 0.0);
}

#[test]
fn test_contact_score_missing_embedding_is_zero() {
    let query = vec![1.0f32, 0.0];
    assert_eq!(contact_score(&query, None), 0.0);
    assert_eq!(contact_score(&query, Some(&[])), 0.0);
}

#[test]
fn test_aggregate_weighted_average() {
    let mut scores = FactorScores::default();
    scores.set(Factor::Amount, 1.0);
    scores.set(Factor::Date, 0.5);
    scores.set(Factor::Contact, 0.0);

    let weights = Weights::default();
    let total = aggregate(&scores, &Factor::ALL, &weights);

    // 1.0*0.90 + 0.5*0.05 + 0.0*0.05, weights sum to 1.
    assert!(approx(total, 0.925));
}

#[test]
fn test_aggregate_single_factor_renormalizes() {
    let mut scores = FactorScores::default();
    scores.set(Factor::Amount, 0.7);

    // Default weights, but only amount requested: result is the raw
    // amount score, renormalized against amount's own weight.
    let total = aggregate(&scores, &[Factor::Amount], &Weights::default());
    assert!(approx(total, 0.7));
}

#[test]
fn test_aggregate_zero_total_weight_is_zero() {
    let mut scores = FactorScores::default();
    scores.set(Factor::Amount, 1.0);

    let weights = Weights {
        amount: 0.0,
        date: 0.0,
        contact: 0.0,
    };
    assert_eq!(aggregate(&scores, &[Factor::Amount], &weights), 0.0);
}

#[test]
fn test_aggregate_skips_uncomputed_factors() {
    let mut scores = FactorScores::default();
    scores.set(Factor::Amount, 0.8);
    // Date requested but never computed: excluded from both sums.
    let weights = Weights {
        amount: 0.5,
        date: 0.5,
        contact: 0.0,
    };
    let total = aggregate(&scores, &[Factor::Amount, Factor::Date], &weights);
    assert!(approx(total, 0.8));
}

#[test]
fn test_rank_top_n_before_threshold() {
    // Spec example: the 0.60 candidate is excluded by top_n, not threshold,
    // and the 0.80 tie keeps original order.
    let scores = [0.95, 0.80, 0.80, 0.60];
    let ranked = rank_and_select(&scores, 3, 0.75);

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0], (0, 0.95));
    assert_eq!(ranked[1], (1, 0.80));
    assert_eq!(ranked[2], (2, 0.80));
}

#[test]
fn test_rank_threshold_filters_after_cut() {
    let scores = [0.95, 0.80, 0.60, 0.90];
    let ranked = rank_and_select(&scores, 3, 0.85);

    // Top-3 is [0.95, 0.90, 0.80]; threshold then drops the 0.80.
    assert_eq!(ranked, vec![(0, 0.95), (3, 0.90)]);
}

#[test]
fn test_rank_threshold_is_inclusive() {
    let scores = [0.8, 0.5];
    let ranked = rank_and_select(&scores, 2, 0.8);
    assert_eq!(ranked, vec![(0, 0.8)]);
}

#[test]
fn test_rank_top_n_larger_than_candidates() {
    let scores = [0.9, 0.7];
    let ranked = rank_and_select(&scores, 10, 0.0);
    assert_eq!(ranked.len(), 2);
}

#[test]
fn test_rank_empty() {
    assert!(rank_and_select(&[], 5, 0.5).is_empty());
}

#[test]
fn test_matcher_empty_candidate_set() {
    let matcher = Matcher::new(stub_encoder());
    let input = MatchInput {
        amount: 100.0,
        date: day(1),
        contact: None,
    };

    let results = matcher
        .find_best_matches(&input, &[], &MatchParams::default())
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_matcher_amount_only_ranking() {
    let matcher = Matcher::new(stub_encoder());
    let invoices = vec![
        invoice(1, 95.0, Some(day(1)), None),
        invoice(2, 80.0, Some(day(1)), None),
        invoice(3, 80.0, Some(day(1)), None),
        invoice(4, 60.0, Some(day(1)), None),
    ];
    let input = MatchInput {
        amount: 100.0,
        date: day(1),
        contact: None,
    };
    let params = MatchParams {
        top_n: 3,
        threshold: 0.75,
        factors: vec![Factor::Amount],
        weights: Weights {
            amount: 1.0,
            date: 0.0,
            contact: 0.0,
        },
        ..Default::default()
    };

    let results = matcher.find_best_matches(&input, &invoices, &params).unwrap();

    let ids: Vec<u64> = results.iter().map(|r| r.invoice.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(approx(results[0].score, 0.95));
    assert!(approx(results[1].score, 0.80));
    assert!(approx(results[2].score, 0.80));
}

#[test]
fn test_matcher_contact_self_similarity() {
    let encoder = stub_encoder();
    let stored = encoder.encode("ACME Corp").unwrap();

    let matcher = Matcher::new(encoder);
    let invoices = vec![
        invoice(1, 0.0, None, Some(stored)),
        invoice(2, 0.0, None, None),
    ];
    let input = MatchInput {
        amount: 0.0,
        date: day(1),
        contact: Some("ACME Corp".to_string()),
    };
    let params = MatchParams {
        top_n: 5,
        threshold: 0.9,
        factors: vec![Factor::Contact],
        weights: Weights {
            amount: 0.0,
            date: 0.0,
            contact: 1.0,
        },
        ..Default::default()
    };

    let results = matcher.find_best_matches(&input, &invoices, &params).unwrap();

    // Identical text encodes identically; only the invoice with a stored
    // embedding survives the threshold.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].invoice.id, 1);
    assert!((results[0].score - 1.0).abs() < 1e-5);
}

#[test]
fn test_matcher_empty_contact_never_matches_on_contact() {
    let encoder = stub_encoder();
    let stored = encoder.encode("ACME Corp").unwrap();

    let matcher = Matcher::new(encoder);
    let invoices = vec![invoice(1, 0.0, None, Some(stored))];
    let params = MatchParams {
        top_n: 5,
        threshold: 0.0,
        factors: vec![Factor::Contact],
        weights: Weights {
            amount: 0.0,
            date: 0.0,
            contact: 1.0,
        },
        ..Default::default()
    };

    for contact in [None, Some("   ".to_string())] {
        let input = MatchInput {
            amount: 0.0,
            date: day(1),
            contact,
        };
        let results = matcher.find_best_matches(&input, &invoices, &params).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 0.0);
    }
}

#[test]
fn test_matcher_all_zero_weights_yield_no_matches() {
    let matcher = Matcher::new(stub_encoder());
    let invoices = vec![invoice(1, 100.0, Some(day(1)), None)];
    let input = MatchInput {
        amount: 100.0,
        date: day(1),
        contact: None,
    };
    let params = MatchParams {
        top_n: 3,
        threshold: 0.5,
        factors: vec![Factor::Amount],
        weights: Weights {
            amount: 0.0,
            date: 0.0,
            contact: 0.0,
        },
        ..Default::default()
    };

    let results = matcher.find_best_matches(&input, &invoices, &params).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_matcher_partial_data_stays_eligible() {
    // Missing date scores 0 on the date factor but the record still wins
    // on amount.
    let matcher = Matcher::new(stub_encoder());
    let invoices = vec![
        invoice(1, 100.0, None, None),
        invoice(2, 10.0, Some(day(1)), None),
    ];
    let input = MatchInput {
        amount: 100.0,
        date: day(1),
        contact: None,
    };
    let params = MatchParams {
        top_n: 1,
        threshold: 0.5,
        factors: vec![Factor::Amount, Factor::Date],
        weights: Weights {
            amount: 0.9,
            date: 0.1,
            contact: 0.0,
        },
        ..Default::default()
    };

    let results = matcher.find_best_matches(&input, &invoices, &params).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].invoice.id, 1);
    assert!(approx(results[0].score, 0.9));
}

#[test]
fn test_matcher_idempotent() {
    let matcher = Matcher::new(stub_encoder());
    let invoices = vec![
        invoice(1, 95.0, Some(day(3)), None),
        invoice(2, 100.0, Some(day(20)), None),
    ];
    let input = MatchInput {
        amount: 100.0,
        date: day(1),
        contact: Some("Globex".to_string()),
    };
    let params = MatchParams {
        threshold: 0.0,
        ..Default::default()
    };

    let first = matcher.find_best_matches(&input, &invoices, &params).unwrap();
    let second = matcher.find_best_matches(&input, &invoices, &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_params_validate_ranges() {
    let base = MatchParams::default();
    assert!(base.validate().is_ok());

    let bad_top_n = MatchParams {
        top_n: 0,
        ..base.clone()
    };
    assert!(bad_top_n.validate().is_err());

    let bad_top_n = MatchParams {
        top_n: 51,
        ..base.clone()
    };
    assert!(bad_top_n.validate().is_err());

    let bad_threshold = MatchParams {
        threshold: 1.5,
        ..base.clone()
    };
    assert!(bad_threshold.validate().is_err());

    let bad_weight = MatchParams {
        weights: Weights {
            amount: -0.1,
            date: 0.0,
            contact: 0.0,
        },
        ..base.clone()
    };
    assert!(bad_weight.validate().is_err());

    let nan_weight = MatchParams {
        weights: Weights {
            amount: f64::NAN,
            date: 0.0,
            contact: 0.0,
        },
        ..base
    };
    assert!(nan_weight.validate().is_err());
}

#[test]
fn test_factor_serde_rejects_unknown_names() {
    assert_eq!(
        serde_json::from_str::<Factor>("\"amount\"").unwrap(),
        Factor::Amount
    );
    assert!(serde_json::from_str::<Factor>("\"payee\"").is_err());

    assert_eq!(
        serde_json::from_str::<DateMethod>("\"linear\"").unwrap(),
        DateMethod::Linear
    );
    assert!(serde_json::from_str::<DateMethod>("\"quadratic\"").is_err());
}

#[test]
fn test_contact_text_trims_whitespace() {
    let input = MatchInput {
        amount: 1.0,
        date: day(1),
        contact: Some("  ACME  ".to_string()),
    };
    assert_eq!(input.contact_text(), Some("ACME"));

    let blank = MatchInput {
        amount: 1.0,
        date: day(1),
        contact: Some("   ".to_string()),
    };
    assert_eq!(blank.contact_text(), None);
}
