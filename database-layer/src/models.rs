// Database models
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted claim row, keyed by `uid`.
///
/// Rows are written once when a batch commits and are never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredClaim {
    pub uid: Uuid,
    /// ISO-8601 calendar date (`YYYY-MM-DD`)
    pub service_date: String,
    pub submitted_procedure: String,
    pub quadrant: Option<String>,
    pub plan_or_group_no: String,
    pub subscriber_no: String,
    pub provider_npi: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub provider_fees: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub allowed_fees: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub member_coinsurance: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub member_copay: Decimal,
}
