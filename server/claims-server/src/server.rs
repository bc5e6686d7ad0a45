use crate::config::{ServerConfig, StorageBackend};
use claims_service::ClaimBatchProcessor;
use database_layer::{ClaimStore, DatabasePool, InMemoryClaimStore, PostgresClaimStore};
use error_common::{IntakeError, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Main claim intake server state
#[derive(Clone)]
pub struct ClaimsServer {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Batch processor over the configured claim store
    pub processor: ClaimBatchProcessor,
    /// Used for the uptime reported by `/health`
    pub started_at: Instant,
}

impl ClaimsServer {
    /// Create a server instance, connecting the configured store
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let store: Arc<dyn ClaimStore> = match config.storage {
            StorageBackend::Postgres => {
                let url = config.database.url.as_deref().ok_or_else(|| {
                    IntakeError::ConfigError("database.url is not set".to_string())
                })?;

                let pool = DatabasePool::connect(url, &config.database.pool)
                    .await
                    .map_err(|e| IntakeError::DatabaseError(e.to_string()))?;

                if config.database.run_migrations {
                    pool.run_migrations()
                        .await
                        .map_err(|e| IntakeError::DatabaseError(e.to_string()))?;
                }

                Arc::new(PostgresClaimStore::new(pool))
            }
            StorageBackend::Memory => {
                warn!("Using in-memory claim store; accepted claims are lost on restart");
                Arc::new(InMemoryClaimStore::new())
            }
        };

        info!(storage = %config.storage, "Claim store ready");
        Ok(Self::with_store(config, store))
    }

    /// Create a server instance over an already constructed store
    pub fn with_store(config: ServerConfig, store: Arc<dyn ClaimStore>) -> Self {
        Self {
            config: Arc::new(config),
            processor: ClaimBatchProcessor::new(store),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ClaimStore> {
        self.processor.store()
    }
}
