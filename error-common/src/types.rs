use thiserror::Error;

/// Process-level error for the service binary and its startup path
#[derive(Error, Debug)]
pub enum IntakeError {
    /// Network communication errors (bind, accept)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server runtime errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for process-level operations
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Log a process-level error with the context it surfaced in
pub fn log_error(context: &str, error: &IntakeError) {
    tracing::error!(
        context = context,
        error = %error,
        "Claim intake error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = IntakeError::ConfigError("missing database url".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing database url");

        let err: IntakeError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
