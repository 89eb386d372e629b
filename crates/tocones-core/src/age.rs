//! # Age Calculator
//!
//! Elapsed plantation age between the planting and evaluation dates.
//!
//! Age is `(evaluation - planting).days / 365.25`, rounded to one decimal.
//! The division is done on integers (`days * 40 / 1461`) so that the result
//! is exact; the odd denominator means a rounding tie cannot occur.
//! A negative age (evaluation before planting) is allowed.

use crate::primitives::{AGE_TENTHS_DENOMINATOR, AGE_TENTHS_NUMERATOR, DATE_FORMAT};
use crate::{Age, ToconesError};
use chrono::NaiveDate;

/// Parse a `dd/mm/yyyy` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ToconesError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ToconesError::InvalidDateFormat(raw.to_string()))
}

/// Age between two calendar dates.
#[must_use]
pub fn age_between(planting: NaiveDate, evaluation: NaiveDate) -> Age {
    let days = evaluation.signed_duration_since(planting).num_days();
    let scaled = days.saturating_mul(AGE_TENTHS_NUMERATOR);

    let quotient = scaled.div_euclid(AGE_TENTHS_DENOMINATOR);
    let remainder = scaled.rem_euclid(AGE_TENTHS_DENOMINATOR);

    let tenths = if remainder * 2 > AGE_TENTHS_DENOMINATOR {
        quotient + 1
    } else {
        quotient
    };
    Age::from_tenths(tenths)
}

/// Parse both dates and compute the age.
///
/// Fails with `InvalidDateFormat` naming the first date that does not parse.
pub fn calculate_age(planting: &str, evaluation: &str) -> Result<Age, ToconesError> {
    let planting = parse_date(planting)?;
    let evaluation = parse_date(evaluation)?;
    Ok(age_between(planting, evaluation))
}

// =============================================================================
// TESTS
// =============================================================================
