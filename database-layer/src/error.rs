use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify a driver error raised while `context` was in progress.
    ///
    /// Unique violations become `DuplicateKey`; pool and I/O failures become
    /// `ConnectionFailed`; everything else is a `QueryFailed`.
    pub fn from_sqlx(context: &str, error: sqlx::Error) -> Self {
        if let Some(db_error) = error.as_database_error() {
            if db_error.is_unique_violation() {
                return DatabaseError::DuplicateKey(format!("{context}: {db_error}"));
            }
        }

        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::ConnectionFailed(format!("{context}: {error}"))
            }
            other => DatabaseError::QueryFailed(format!("{context}: {other}")),
        }
    }

    /// Whether the failure is about reaching the database rather than the statement itself
    pub fn is_connectivity(&self) -> bool {
        matches!(self, DatabaseError::ConnectionFailed(_))
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
