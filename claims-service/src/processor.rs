use crate::error::ClaimsResult;
use crate::models::{Claim, ProcessingResult, RawClaim};
use crate::validation::validate_batch;
use database_layer::{ClaimStore, ClaimTransaction, StoredClaim};
use logger_redacted::mask_identifier;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Source of claim identifiers
pub type UidSource = fn() -> Uuid;

/// Turns a batch of claims into stored records and per-claim results.
///
/// Each call to [`process`](Self::process) runs inside its own store
/// transaction: either every claim of the batch is committed or none is.
#[derive(Clone)]
pub struct ClaimBatchProcessor {
    store: Arc<dyn ClaimStore>,
    uid_source: UidSource,
}

impl ClaimBatchProcessor {
    /// Create a processor over an explicitly constructed store.
    ///
    /// Identifiers are time-ordered UUIDv7 values.
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self {
            store,
            uid_source: Uuid::now_v7,
        }
    }

    /// Replace the identifier source
    pub fn with_uid_source(mut self, uid_source: UidSource) -> Self {
        self.uid_source = uid_source;
        self
    }

    pub fn store(&self) -> &Arc<dyn ClaimStore> {
        &self.store
    }

    /// Validate raw records, then process them as one batch.
    ///
    /// A validation failure is returned before any transaction is opened.
    pub async fn validate_and_process(&self, raws: &[RawClaim]) -> ClaimsResult<Vec<ProcessingResult>> {
        let claims = validate_batch(raws)?;
        self.process(claims).await
    }

    /// Persist a batch of validated claims, returning results in input order
    #[instrument(skip_all, fields(batch_size = claims.len()))]
    pub async fn process(&self, claims: Vec<Claim>) -> ClaimsResult<Vec<ProcessingResult>> {
        // Fees are settled before the transaction opens; an unrepresentable fee writes nothing
        let net_fees = claims
            .iter()
            .enumerate()
            .map(|(index, claim)| claim.net_fee().map_err(|e| e.at_record(index)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = self.store.begin().await?;
        let mut results = Vec::with_capacity(claims.len());

        for (claim, net_fee) in claims.into_iter().zip(net_fees) {
            let uid = (self.uid_source)();

            debug!(
                uid = %uid,
                subscriber = %mask_identifier(&claim.subscriber_no),
                provider = %mask_identifier(&claim.provider_npi),
                procedure = %claim.submitted_procedure,
                net_fee = %net_fee,
                "Staging claim"
            );

            let stored = claim.into_stored(uid);
            if let Err(e) = tx.stage(&stored).await {
                warn!(
                    uid = %uid,
                    staged = tx.staged(),
                    error = %e,
                    "Failed to stage claim, rolling back batch"
                );
                rollback(tx).await;
                return Err(e.into());
            }

            results.push(ProcessingResult { uid, net_fee });
        }

        // A failed commit leaves nothing behind; the driver discards the transaction
        tx.commit().await?;

        info!(claims = results.len(), "Claim batch committed");
        Ok(results)
    }

    /// Look up a committed claim by identifier
    pub async fn find_claim(&self, uid: Uuid) -> ClaimsResult<Option<StoredClaim>> {
        Ok(self.store.find_by_uid(uid).await?)
    }
}

async fn rollback(tx: Box<dyn ClaimTransaction>) {
    if let Err(e) = tx.rollback().await {
        // Dropping the transaction still discards the staged rows
        warn!(error = %e, "Explicit rollback failed");
    }
}
