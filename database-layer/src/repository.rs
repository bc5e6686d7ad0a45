use crate::{
    error::{DatabaseError, DatabaseResult},
    models::StoredClaim,
    transaction::ClaimTransaction,
};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub mod postgres;

pub use postgres::PostgresClaimStore;

/// Repository interface for claim rows.
///
/// Writes only happen through a `ClaimTransaction`; reads see committed rows.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Open a transaction scoped to one batch
    async fn begin(&self) -> DatabaseResult<Box<dyn ClaimTransaction>>;

    /// Look up a committed claim
    async fn find_by_uid(&self, uid: Uuid) -> DatabaseResult<Option<StoredClaim>>;

    /// Number of committed claims
    async fn count(&self) -> DatabaseResult<u64>;

    async fn is_healthy(&self) -> bool;
}

/// In-memory claim store for testing and development
#[derive(Clone)]
pub struct InMemoryClaimStore {
    claims: Arc<DashMap<Uuid, StoredClaim>>,
    commit_lock: Arc<Mutex<()>>,
    fail_after: Option<usize>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self {
            claims: Arc::new(DashMap::new()),
            commit_lock: Arc::new(Mutex::new(())),
            fail_after: None,
        }
    }

    /// Make every transaction fail on its write after `staged` successful ones.
    ///
    /// Exercises the rollback path the way a lost connection mid-batch would.
    pub fn with_write_failure_after(mut self, staged: usize) -> Self {
        self.fail_after = Some(staged);
        self
    }
}

impl Default for InMemoryClaimStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn begin(&self) -> DatabaseResult<Box<dyn ClaimTransaction>> {
        Ok(Box::new(InMemoryClaimTransaction {
            claims: Arc::clone(&self.claims),
            commit_lock: Arc::clone(&self.commit_lock),
            fail_after: self.fail_after,
            staged: Vec::new(),
        }))
    }

    async fn find_by_uid(&self, uid: Uuid) -> DatabaseResult<Option<StoredClaim>> {
        Ok(self.claims.get(&uid).map(|entry| entry.value().clone()))
    }

    async fn count(&self) -> DatabaseResult<u64> {
        Ok(self.claims.len() as u64)
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Buffers staged rows until commit
pub struct InMemoryClaimTransaction {
    claims: Arc<DashMap<Uuid, StoredClaim>>,
    commit_lock: Arc<Mutex<()>>,
    fail_after: Option<usize>,
    staged: Vec<StoredClaim>,
}

impl InMemoryClaimTransaction {
    fn is_taken(&self, uid: &Uuid) -> bool {
        self.claims.contains_key(uid) || self.staged.iter().any(|c| c.uid == *uid)
    }
}

#[async_trait]
impl ClaimTransaction for InMemoryClaimTransaction {
    async fn stage(&mut self, claim: &StoredClaim) -> DatabaseResult<()> {
        if let Some(limit) = self.fail_after {
            if self.staged.len() >= limit {
                return Err(DatabaseError::ConnectionFailed(format!(
                    "simulated write failure after {limit} staged claims"
                )));
            }
        }

        if self.is_taken(&claim.uid) {
            return Err(DatabaseError::DuplicateKey(format!("claim uid {} already exists", claim.uid)));
        }

        self.staged.push(claim.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DatabaseResult<()> {
        let InMemoryClaimTransaction { claims, commit_lock, staged, .. } = *self;
        let _guard = commit_lock.lock();

        // Another transaction may have committed the same uid since staging
        if let Some(conflict) = staged.iter().find(|c| claims.contains_key(&c.uid)) {
            return Err(DatabaseError::DuplicateKey(format!("claim uid {} already exists", conflict.uid)));
        }

        let count = staged.len();
        for claim in staged {
            claims.insert(claim.uid, claim);
        }

        debug!(staged = count, "In-memory transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DatabaseResult<()> {
        debug!(staged = self.staged.len(), "In-memory transaction rolled back");
        Ok(())
    }

    fn staged(&self) -> usize {
        self.staged.len()
    }
}
