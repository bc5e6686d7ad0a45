use crate::validation::{Constraint, ValidationError};
use chrono::NaiveDate;
use database_layer::StoredClaim;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claim record as submitted, before validation.
///
/// Every field is optional so that a missing field is reported by the
/// validator with its name instead of failing deserialization. Monetary
/// fields accept JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawClaim {
    pub service_date: Option<String>,
    pub submitted_procedure: Option<String>,
    pub quadrant: Option<String>,
    #[serde(alias = "plan_or_Group_no")]
    pub plan_or_group_no: Option<String>,
    pub subscriber_no: Option<String>,
    pub provider_npi: Option<String>,
    pub provider_fees: Option<serde_json::Value>,
    pub allowed_fees: Option<serde_json::Value>,
    pub member_coinsurance: Option<serde_json::Value>,
    pub member_copay: Option<serde_json::Value>,
}

/// A validated dental claim
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    pub service_date: NaiveDate,
    pub submitted_procedure: String,
    pub quadrant: Option<String>,
    pub plan_or_group_no: String,
    pub subscriber_no: String,
    pub provider_npi: String,
    pub provider_fees: Decimal,
    pub allowed_fees: Decimal,
    pub member_coinsurance: Decimal,
    pub member_copay: Decimal,
}

impl Claim {
    /// `provider_fees + member_coinsurance + member_copay - allowed_fees`.
    ///
    /// May be zero or negative. See [`checked_net_fee`].
    pub fn net_fee(&self) -> Result<Decimal, ValidationError> {
        checked_net_fee(
            self.provider_fees,
            self.allowed_fees,
            self.member_coinsurance,
            self.member_copay,
        )
    }

    /// Row to persist under `uid`
    pub fn into_stored(self, uid: Uuid) -> StoredClaim {
        StoredClaim {
            uid,
            service_date: self.service_date.format("%Y-%m-%d").to_string(),
            submitted_procedure: self.submitted_procedure,
            quadrant: self.quadrant,
            plan_or_group_no: self.plan_or_group_no,
            subscriber_no: self.subscriber_no,
            provider_npi: self.provider_npi,
            provider_fees: self.provider_fees,
            allowed_fees: self.allowed_fees,
            member_coinsurance: self.member_coinsurance,
            member_copay: self.member_copay,
        }
    }
}

/// `provider_fees + member_coinsurance + member_copay - allowed_fees` without
/// leaving the `Decimal` range.
///
/// An overflow is reported against the first term that caused it.
pub fn checked_net_fee(
    provider_fees: Decimal,
    allowed_fees: Decimal,
    member_coinsurance: Decimal,
    member_copay: Decimal,
) -> Result<Decimal, ValidationError> {
    let out_of_range = |field| ValidationError::new(field, Constraint::OutOfRange);

    provider_fees
        .checked_add(member_coinsurance)
        .ok_or_else(|| out_of_range("member_coinsurance"))?
        .checked_add(member_copay)
        .ok_or_else(|| out_of_range("member_copay"))?
        .checked_sub(allowed_fees)
        .ok_or_else(|| out_of_range("allowed_fees"))
}

/// Per-claim outcome returned to the submitter, in submission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub uid: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_fee: Decimal,
}
