//! # Ratio Calculator
//!
//! Cut ratios of a stump, each as a percentage of the diameter `d`:
//!
//! | Ratio    | Formula    | Pass when                 |
//! |----------|------------|---------------------------|
//! | CT/d*100 | CT / d×100 | `|ratio − 65| < 0.1`      |
//! | CD/d*100 | CD / d×100 | `20 ≤ ratio ≤ 25`         |
//! | AB/d*100 | AB / d×100 | `ratio ≤ 10`              |
//!
//! The CT tolerance is an open interval and must stay that way.

use crate::primitives::{
    AB_MAX_PERCENT, CD_MAX_PERCENT, CD_MIN_PERCENT, CT_TARGET_PERCENT, CT_TOLERANCE_PERCENT,
};
use crate::{Ratio, RatioSet, ToconesError};

/// Parse a decimal measurement typed by the user.
///
/// Surrounding whitespace is ignored. Empty, non-numeric and non-finite
/// input is rejected.
pub fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, ToconesError> {
    let invalid = || ToconesError::InvalidNumericInput {
        field,
        value: raw.to_string(),
    };

    let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() { Ok(value) } else { Err(invalid()) }
}

/// Express `part` as a percentage of `diameter`.
#[must_use]
pub fn percent_of(part: f64, diameter: f64) -> f64 {
    part / diameter * 100.0
}

/// Classify a CT/d*100 percentage.
#[must_use]
pub fn ct_passes(percent: f64) -> bool {
    (percent - CT_TARGET_PERCENT).abs() < CT_TOLERANCE_PERCENT
}

/// Classify a CD/d*100 percentage.
#[must_use]
pub fn cd_passes(percent: f64) -> bool {
    (CD_MIN_PERCENT..=CD_MAX_PERCENT).contains(&percent)
}

/// Classify an AB/d*100 percentage.
#[must_use]
pub fn ab_passes(percent: f64) -> bool {
    percent <= AB_MAX_PERCENT
}

/// Compute the three ratios from numeric measurements.
///
/// A zero diameter is rejected as invalid input.
pub fn compute_ratios(diameter: f64, ct: f64, cd: f64, ab: f64) -> Result<RatioSet, ToconesError> {
    if diameter == 0.0 {
        return Err(ToconesError::InvalidNumericInput {
            field: "d",
            value: diameter.to_string(),
        });
    }

    let ct = percent_of(ct, diameter);
    let cd = percent_of(cd, diameter);
    let ab = percent_of(ab, diameter);

    Ok(RatioSet {
        ct: Ratio {
            percent: ct,
            pass: ct_passes(ct),
        },
        cd: Ratio {
            percent: cd,
            pass: cd_passes(cd),
        },
        ab: Ratio {
            percent: ab,
            pass: ab_passes(ab),
        },
    })
}

/// Parse the four ratio inputs from text and compute the ratios.
pub fn calculate_ratios(
    diameter: &str,
    ct: &str,
    cd: &str,
    ab: &str,
) -> Result<RatioSet, ToconesError> {
    let d = parse_decimal("d", diameter)?;
    let ct = parse_decimal("CT", ct)?;
    let cd = parse_decimal("CD", cd)?;
    let ab = parse_decimal("AB", ab)?;
    compute_ratios(d, ct, cd, ab)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_stump_passes_everything() {
        let ratios = calculate_ratios("20", "13", "4.6", "1.8").expect("valid input");

        assert_eq!(ratios.ct.to_string(), "65.0% ✅");
        assert_eq!(ratios.cd.to_string(), "23.0% ✅");
        assert_eq!(ratios.ab.to_string(), "9.0% ✅");
        assert!(ratios.all_pass());
    }

    #[test]
    fn ct_tolerance_is_strict() {
        assert!(ct_passes(65.0));
        assert!(ct_passes(65.09));
        assert!(ct_passes(64.91));
        assert!(!ct_passes(65.11));
        assert!(!ct_passes(64.89));
        assert!(!ct_passes(65.2));
        assert!(!ct_passes(60.0));
    }

    #[test]
    fn cd_band_is_inclusive() {
        assert!(cd_passes(20.0));
        assert!(cd_passes(25.0));
        assert!(!cd_passes(19.99));
        assert!(!cd_passes(25.01));
    }

    #[test]
    fn ab_limit_is_inclusive() {
        assert!(ab_passes(10.0));
        assert!(ab_passes(0.0));
        assert!(!ab_passes(10.01));
    }

    #[test]
    fn failing_stump_reports_each_ratio() {
        // CT 70%, CD 30%, AB 12%
        let ratios = calculate_ratios("50", "35", "15", "6").expect("valid input");
        assert!(!ratios.ct.pass);
        assert!(!ratios.cd.pass);
        assert!(!ratios.ab.pass);
        assert_eq!(ratios.ct.to_string(), "70.0% ❌");
    }

    #[test]
    fn non_numeric_input_names_the_field() {
        let err = calculate_ratios("20", "trece", "4.6", "1.8").expect_err("text rejected");
        assert!(matches!(
            err,
            ToconesError::InvalidNumericInput { field: "CT", ref value } if value == "trece"
        ));
    }

    #[test]
    fn empty_and_non_finite_input_rejected() {
        assert!(parse_decimal("d", "").is_err());
        assert!(parse_decimal("d", "   ").is_err());
        assert!(parse_decimal("d", "NaN").is_err());
        assert!(parse_decimal("d", "inf").is_err());
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(parse_decimal("d", " 12.5 ").expect("valid"), 12.5);
    }

    #[test]
    fn zero_diameter_rejected() {
        let err = calculate_ratios("0", "13", "4.6", "1.8").expect_err("zero diameter");
        assert!(matches!(
            err,
            ToconesError::InvalidNumericInput { field: "d", .. }
        ));
    }
}
