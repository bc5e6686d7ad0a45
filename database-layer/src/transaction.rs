// Per-request claim transactions
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::StoredClaim;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use tracing::debug;

/// A scoped unit of work against the claim store.
///
/// Writes staged through `stage` become visible to other readers only after
/// `commit`. Dropping a transaction without committing discards every staged
/// write, so early returns and `?` release the scope without further action.
#[async_trait]
pub trait ClaimTransaction: Send {
    /// Stage one claim row inside the transaction
    async fn stage(&mut self, claim: &StoredClaim) -> DatabaseResult<()>;

    /// Make all staged rows durable as one unit
    async fn commit(self: Box<Self>) -> DatabaseResult<()>;

    /// Discard all staged rows
    async fn rollback(self: Box<Self>) -> DatabaseResult<()>;

    /// Number of rows staged so far
    fn staged(&self) -> usize;
}

pub(crate) const INSERT_CLAIM_SQL: &str = r#"
    INSERT INTO claims (
        uid,
        service_date, submitted_procedure, quadrant,
        plan_or_group_no, subscriber_no, provider_npi,
        provider_fees, allowed_fees, member_coinsurance, member_copay
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
"#;

/// PostgreSQL transaction; rolls back on drop unless committed
pub struct PgClaimTransaction {
    tx: Transaction<'static, Postgres>,
    staged: usize,
}

impl PgClaimTransaction {
    pub(crate) fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self { tx, staged: 0 }
    }
}

#[async_trait]
impl ClaimTransaction for PgClaimTransaction {
    async fn stage(&mut self, claim: &StoredClaim) -> DatabaseResult<()> {
        sqlx::query(INSERT_CLAIM_SQL)
            .bind(claim.uid.to_string())
            .bind(&claim.service_date)
            .bind(&claim.submitted_procedure)
            .bind(&claim.quadrant)
            .bind(&claim.plan_or_group_no)
            .bind(&claim.subscriber_no)
            .bind(&claim.provider_npi)
            .bind(claim.provider_fees)
            .bind(claim.allowed_fees)
            .bind(claim.member_coinsurance)
            .bind(claim.member_copay)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to stage claim", e))?;

        self.staged += 1;
        debug!(uid = %claim.uid, staged = self.staged, "Claim staged");
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DatabaseResult<()> {
        let staged = self.staged;
        self.tx
            .commit()
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to commit transaction", e))?;

        debug!(staged, "Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DatabaseResult<()> {
        let staged = self.staged;
        self.tx
            .rollback()
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to roll back transaction", e))?;

        debug!(staged, "Transaction rolled back");
        Ok(())
    }

    fn staged(&self) -> usize {
        self.staged
    }
}
