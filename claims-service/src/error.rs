use crate::validation::ValidationError;
use database_layer::DatabaseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsError {
    /// A submitted record broke a field constraint; nothing was written
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The batch transaction failed and was rolled back
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

pub type ClaimsResult<T> = Result<T, ClaimsError>;
