//! Claim validation
//!
//! A raw record is checked against [`CLAIM_CHECKS`], an ordered list of
//! predicates. Validation stops at the first failing check and reports the
//! field and the constraint it broke. Only a record that passes every check
//! is converted into a typed [`Claim`].

use crate::models::{checked_net_fee, Claim, RawClaim};
use chrono::{NaiveDate, NaiveDateTime};
use error_common::codes;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every `submitted_procedure` must start with this prefix (CDT dental codes)
pub const PROCEDURE_PREFIX: char = 'D';

/// Length of a National Provider Identifier
pub const NPI_LENGTH: usize = 10;

/// Accepted `service_date` formats: ISO date, then the legacy export format (`3/28/18 0:00`)
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const LEGACY_DATETIME_FORMAT: &str = "%m/%d/%y %H:%M";

/// Constraint a field failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Required,
    ExactLength(usize),
    InvalidDate,
    NotANumber,
    Negative,
    /// Numeric, but outside what a `Decimal` amount or the computed fee can hold
    OutOfRange,
    MissingPrefix(char),
}

impl Constraint {
    /// Stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Constraint::Required => codes::validation::MISSING_REQUIRED_FIELD,
            Constraint::ExactLength(_) | Constraint::InvalidDate | Constraint::NotANumber | Constraint::MissingPrefix(_) => {
                codes::validation::INVALID_FORMAT
            }
            Constraint::Negative | Constraint::OutOfRange => codes::validation::OUT_OF_RANGE,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "is required and must not be empty"),
            Constraint::ExactLength(len) => write!(f, "must be exactly {len} characters"),
            Constraint::InvalidDate => write!(f, "must be a calendar date (YYYY-MM-DD)"),
            Constraint::NotANumber => write!(f, "must be a number"),
            Constraint::Negative => write!(f, "must be greater than or equal to 0"),
            Constraint::OutOfRange => write!(f, "is outside the supported amount range"),
            Constraint::MissingPrefix(prefix) => write!(f, "must start with \"{prefix}\""),
        }
    }
}

/// A record failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}field `{field}` {constraint}", record_prefix(.record))]
pub struct ValidationError {
    /// Zero-based position of the record in the submitted batch
    pub record: Option<usize>,
    pub field: &'static str,
    pub constraint: Constraint,
}

impl ValidationError {
    pub fn new(field: &'static str, constraint: Constraint) -> Self {
        Self {
            record: None,
            field,
            constraint,
        }
    }

    pub fn at_record(mut self, record: usize) -> Self {
        self.record = Some(record);
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.constraint.error_code()
    }
}

fn record_prefix(record: &Option<usize>) -> String {
    record.map(|index| format!("claim {index}: ")).unwrap_or_default()
}

/// One validation predicate
pub type ClaimCheck = fn(&RawClaim) -> Result<(), ValidationError>;

/// Checks applied to every record, in order
pub const CLAIM_CHECKS: [(&str, ClaimCheck); 5] = [
    ("required_fields", check_required_fields),
    ("provider_npi_length", check_provider_npi_length),
    ("service_date", check_service_date),
    ("monetary_fields", check_monetary_fields),
    ("procedure_prefix", check_procedure_prefix),
];

/// Validate a single record and convert it into a [`Claim`]
pub fn validate(raw: &RawClaim) -> Result<Claim, ValidationError> {
    for (_, check) in CLAIM_CHECKS {
        check(raw)?;
    }

    Ok(Claim {
        service_date: parse_service_date(required(&raw.service_date, "service_date")?)
            .ok_or_else(|| ValidationError::new("service_date", Constraint::InvalidDate))?,
        submitted_procedure: required(&raw.submitted_procedure, "submitted_procedure")?.to_string(),
        quadrant: raw.quadrant.clone(),
        plan_or_group_no: required(&raw.plan_or_group_no, "plan_or_group_no")?.to_string(),
        subscriber_no: required(&raw.subscriber_no, "subscriber_no")?.to_string(),
        provider_npi: required(&raw.provider_npi, "provider_npi")?.to_string(),
        provider_fees: amount(&raw.provider_fees, "provider_fees")?,
        allowed_fees: amount(&raw.allowed_fees, "allowed_fees")?,
        member_coinsurance: amount(&raw.member_coinsurance, "member_coinsurance")?,
        member_copay: amount(&raw.member_copay, "member_copay")?,
    })
}

/// Validate every record of a batch, in order.
///
/// The first failure rejects the whole batch and carries the record index.
pub fn validate_batch(raws: &[RawClaim]) -> Result<Vec<Claim>, ValidationError> {
    raws.iter()
        .enumerate()
        .map(|(index, raw)| validate(raw).map_err(|e| e.at_record(index)))
        .collect()
}

pub fn check_required_fields(raw: &RawClaim) -> Result<(), ValidationError> {
    required(&raw.service_date, "service_date")?;
    required(&raw.submitted_procedure, "submitted_procedure")?;
    required(&raw.plan_or_group_no, "plan_or_group_no")?;
    required(&raw.subscriber_no, "subscriber_no")?;
    required(&raw.provider_npi, "provider_npi")?;
    Ok(())
}

/// Any ten characters are accepted; the NPI check digit is not verified
pub fn check_provider_npi_length(raw: &RawClaim) -> Result<(), ValidationError> {
    let npi = required(&raw.provider_npi, "provider_npi")?;
    if npi.chars().count() != NPI_LENGTH {
        return Err(ValidationError::new("provider_npi", Constraint::ExactLength(NPI_LENGTH)));
    }
    Ok(())
}

pub fn check_service_date(raw: &RawClaim) -> Result<(), ValidationError> {
    let date = required(&raw.service_date, "service_date")?;
    parse_service_date(date)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("service_date", Constraint::InvalidDate))
}

/// Each amount must parse and be non-negative, and together they must yield a representable net fee
pub fn check_monetary_fields(raw: &RawClaim) -> Result<(), ValidationError> {
    checked_net_fee(
        amount(&raw.provider_fees, "provider_fees")?,
        amount(&raw.allowed_fees, "allowed_fees")?,
        amount(&raw.member_coinsurance, "member_coinsurance")?,
        amount(&raw.member_copay, "member_copay")?,
    )?;
    Ok(())
}

pub fn check_procedure_prefix(raw: &RawClaim) -> Result<(), ValidationError> {
    let procedure = required(&raw.submitted_procedure, "submitted_procedure")?;
    if !procedure.starts_with(PROCEDURE_PREFIX) {
        return Err(ValidationError::new(
            "submitted_procedure",
            Constraint::MissingPrefix(PROCEDURE_PREFIX),
        ));
    }
    Ok(())
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::new(field, Constraint::Required)),
    }
}

fn amount(value: &Option<Value>, field: &'static str) -> Result<Decimal, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => Err(Constraint::Required),
        // serde_json only yields finite numbers, so a parse failure is a range problem
        Some(Value::Number(n)) => parse_decimal(&n.to_string()).ok_or(Constraint::OutOfRange),
        Some(Value::String(s)) => {
            let s = s.trim();
            parse_decimal(s).ok_or_else(|| {
                if s.parse::<f64>().is_ok_and(f64::is_finite) {
                    Constraint::OutOfRange
                } else {
                    Constraint::NotANumber
                }
            })
        }
        Some(_) => Err(Constraint::NotANumber),
    }
    .map_err(|constraint| ValidationError::new(field, constraint))?;

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(ValidationError::new(field, Constraint::Negative));
    }
    Ok(parsed)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn parse_service_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, ISO_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, LEGACY_DATETIME_FORMAT).map(|dt| dt.date()))
        .ok()
}
