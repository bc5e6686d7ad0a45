//! Logging for the claim intake service with identifier redaction
//!
//! Claims carry member and provider identifiers (subscriber numbers, NPIs)
//! that must not reach log sinks in clear text. This crate installs the
//! process-wide `tracing` subscriber and provides the helpers the rest of the
//! workspace uses before putting an identifier into a log field.
//!
//! # Key Features
//!
//! - **Subscriber Setup**: `EnvFilter` driven, compact output for development
//!   and JSON output for production
//! - **Identifier Masking**: `mask_identifier` keeps only the trailing digits
//! - **Free-text Redaction**: `PiiRedactor` rewrites NPIs, SSNs, emails and
//!   phone numbers found in arbitrary text
//! - **Hash-based Correlation**: redacted values can be correlated across log
//!   lines through a short SHA-256 digest
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, mask_identifier, LoggerConfig};
//!
//! init_tracing(&LoggerConfig::default(), false).expect("subscriber installed once");
//!
//! tracing::info!(
//!     subscriber = %mask_identifier("6546546"),
//!     "Claim accepted"
//! );
//! // subscriber=***6546
//! ```

pub mod config;
pub mod redactor;

pub use config::*;
pub use redactor::*;

use error_common::{IntakeError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
pub fn init_tracing(config: &LoggerConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.log_level.as_str() };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "claims_server={level},claims_service={level},database_layer={level},tower_http=info,sqlx=warn,hyper=info"
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(verbose)
                    .with_line_number(verbose),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .json()
                    .flatten_event(true),
            )
            .try_init(),
    };

    installed.map_err(|e| IntakeError::ConfigError(format!("Failed to install tracing subscriber: {e}")))
}
