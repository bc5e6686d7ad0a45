use crate::{error::ApiError, server::ClaimsServer};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use claims_service::{ProcessingResult, RawClaim};
use database_layer::StoredClaim;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Accept a batch of claims.
///
/// Responds with one `{uid, net_fee}` per claim in submission order. A
/// rejected batch leaves the store untouched.
#[instrument(skip_all)]
pub async fn claim_process(
    State(server): State<ClaimsServer>,
    payload: Result<Json<Vec<RawClaim>>, JsonRejection>,
) -> Result<Json<Vec<ProcessingResult>>, ApiError> {
    let Json(raws) = payload?;
    debug!(batch_size = raws.len(), "Claim batch received");

    let results = server.processor.validate_and_process(&raws).await?;
    Ok(Json(results))
}

/// Fetch one committed claim
pub async fn get_claim(
    State(server): State<ClaimsServer>,
    Path(uid): Path<String>,
) -> Result<Json<StoredClaim>, ApiError> {
    let uid = Uuid::parse_str(&uid)
        .map_err(|_| ApiError::bad_request(format!("`{uid}` is not a valid claim uid")))?;

    server
        .processor
        .find_claim(uid)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("claim"))
}
