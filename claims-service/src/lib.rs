//! Claim intake service
//!
//! Accepts batches of dental claims and turns each one into a stored record
//! with a generated identifier and a computed net fee:
//!
//! - Validation of raw claim records against an ordered list of checks
//! - Net fee computation (`provider_fees + member_coinsurance + member_copay - allowed_fees`)
//! - All-or-nothing persistence of a batch through one store transaction
//!
//! Handing accepted claims to a payments system is out of scope. Such a step
//! would run after commit and mark a committed claim failed on error rather
//! than hold the claim transaction open.

pub mod error;
pub mod models;
pub mod processor;
pub mod validation;

pub use error::*;
pub use models::*;
pub use processor::*;
pub use validation::*;
