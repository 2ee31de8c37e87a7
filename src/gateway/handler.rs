use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use crate::constants::{LEDGERMATCH_STATUS_HEADER, STATUS_MATCHED, STATUS_NO_MATCH};
use crate::scoring::Matcher;

use super::error::GatewayError;
use super::state::HandlerState;
use super::types::{EffectiveParams, MatchBody, ReconcileRequest, ReconcileResponse};

/// `POST /reconcile`: scores the invoice snapshot against the submitted
/// transaction and returns the ranked matches above the threshold.
///
/// Fails fast with 503 while the encoder is loading (retry-after-delay is
/// the right caller response), 400 on validation failures. An empty store
/// yields a well-formed empty response, not an error.
#[instrument(skip(state, request), fields(top_n = request.top_n, threshold = request.threshold))]
pub async fn reconcile_handler(
    State(state): State<HandlerState>,
    Json(request): Json<ReconcileRequest>,
) -> Result<Response, GatewayError> {
    let encoder = state
        .encoder
        .get()
        .map_err(|e| GatewayError::NotReady(e.to_string()))?;

    let (input, params) = request.validate()?;

    let input_echo = request.input_echo();
    let request_params = EffectiveParams::new(&params, input_echo.clone());

    let invoices = state.store.snapshot();
    let total_invoices = invoices.len();

    if total_invoices == 0 {
        debug!("Invoice store is empty, returning empty result");
        return Ok(make_response(Vec::new(), 0, request_params));
    }

    let matcher = Matcher::new(encoder);
    let results = matcher.find_best_matches(&input, &invoices, &params)?;

    let matches: Vec<MatchBody> = results
        .into_iter()
        .map(|result| MatchBody {
            score: result.score,
            input: input_echo.clone(),
            invoice: result.invoice.into(),
        })
        .collect();

    info!(
        total_invoices,
        total_matches = matches.len(),
        "Reconciliation complete"
    );

    Ok(make_response(matches, total_invoices, request_params))
}

fn make_response(
    matches: Vec<MatchBody>,
    total_invoices: usize,
    request_params: EffectiveParams,
) -> Response {
    let status = if matches.is_empty() {
        STATUS_NO_MATCH
    } else {
        STATUS_MATCHED
    };

    let mut headers = HeaderMap::new();
    headers.insert(LEDGERMATCH_STATUS_HEADER, HeaderValue::from_static(status));

    let body = ReconcileResponse {
        total_matches: matches.len(),
        matches,
        total_invoices,
        request_params,
    };

    (StatusCode::OK, headers, Json(body)).into_response()
}
