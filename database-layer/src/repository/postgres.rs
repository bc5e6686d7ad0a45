//! PostgreSQL-backed claim store
//!
//! Claims live in the `claims` table created by the embedded migration.
//! `uid` is stored as text; monetary columns are unscaled `NUMERIC` so the
//! submitted amounts round-trip exactly.

use crate::{
    connection::DatabasePool,
    error::{DatabaseError, DatabaseResult},
    models::StoredClaim,
    repository::ClaimStore,
    transaction::{ClaimTransaction, PgClaimTransaction},
};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL-backed claim store
#[derive(Clone)]
pub struct PostgresClaimStore {
    pool: DatabasePool,
}

impl PostgresClaimStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    fn claim_from_row(row: &PgRow) -> DatabaseResult<StoredClaim> {
        let uid: String = row.try_get("uid")?;
        let uid = Uuid::parse_str(&uid)
            .map_err(|e| DatabaseError::InvalidRecord(format!("uid {uid} is not a UUID: {e}")))?;

        Ok(StoredClaim {
            uid,
            service_date: row.try_get("service_date")?,
            submitted_procedure: row.try_get("submitted_procedure")?,
            quadrant: row.try_get("quadrant")?,
            plan_or_group_no: row.try_get("plan_or_group_no")?,
            subscriber_no: row.try_get("subscriber_no")?,
            provider_npi: row.try_get("provider_npi")?,
            provider_fees: row.try_get("provider_fees")?,
            allowed_fees: row.try_get("allowed_fees")?,
            member_coinsurance: row.try_get("member_coinsurance")?,
            member_copay: row.try_get("member_copay")?,
        })
    }
}

#[async_trait]
impl ClaimStore for PostgresClaimStore {
    async fn begin(&self) -> DatabaseResult<Box<dyn ClaimTransaction>> {
        debug!("Beginning claim transaction");

        let tx = self
            .pool
            .pool()
            .begin()
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to begin transaction", e))?;

        Ok(Box::new(PgClaimTransaction::new(tx)))
    }

    async fn find_by_uid(&self, uid: Uuid) -> DatabaseResult<Option<StoredClaim>> {
        let row = sqlx::query(
            r#"
            SELECT uid, service_date, submitted_procedure, quadrant,
                   plan_or_group_no, subscriber_no, provider_npi,
                   provider_fees, allowed_fees, member_coinsurance, member_copay
            FROM claims
            WHERE uid = $1
            "#,
        )
        .bind(uid.to_string())
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| DatabaseError::from_sqlx("Failed to load claim", e))?;

        row.as_ref().map(Self::claim_from_row).transpose()
    }

    async fn count(&self) -> DatabaseResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM claims")
            .fetch_one(self.pool.pool())
            .await
            .map_err(|e| DatabaseError::from_sqlx("Failed to count claims", e))?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn is_healthy(&self) -> bool {
        self.pool.is_healthy().await
    }
}
