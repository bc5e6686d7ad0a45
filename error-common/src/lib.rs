//! Common error handling utilities for the claim intake service
//!
//! This crate holds the pieces of error handling that every other crate in the
//! workspace agrees on:
//!
//! - **Error Codes**: Structured, stable codes placed in API error bodies
//! - **Process Errors**: `IntakeError`, the error type of the server binary
//!
//! Domain crates keep their own `thiserror` enums (`ValidationError`,
//! `DatabaseError`, ...) and map onto these codes at the HTTP edge.
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, IntakeError};
//!
//! fn bind_port(raw: &str) -> error_common::Result<u16> {
//!     raw.parse()
//!         .map_err(|e| IntakeError::ConfigError(format!("invalid port {raw}: {e}")))
//! }
//!
//! assert!(bind_port("8080").is_ok());
//! assert_eq!(codes::validation::INVALID_FORMAT, "VALIDATION_1003");
//! ```

pub mod codes;
pub mod types;

pub use types::*;
