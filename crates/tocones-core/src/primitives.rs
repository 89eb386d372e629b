//! # Field Primitives
//!
//! Fixed constants of the stump evaluation protocol.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! The ratio thresholds encode the felling-technique standard (Humboldt /
//! Dinamarquez cut) and must be reproduced exactly.

/// Number of stumps evaluated per session.
pub const STUMP_COUNT: usize = 12;

/// Date format accepted and produced by the header form (`dd/mm/yyyy`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// =============================================================================
// AGE
// =============================================================================

/// Numerator of the days → tenths-of-a-year conversion.
///
/// `tenths = days * 10 / 365.25 = days * 40 / 1461`.
pub const AGE_TENTHS_NUMERATOR: i64 = 40;

/// Denominator of the days → tenths-of-a-year conversion (four Julian years).
pub const AGE_TENTHS_DENOMINATOR: i64 = 1461;

// =============================================================================
// RATIO THRESHOLDS
// =============================================================================

/// Target CT/d*100 percentage.
pub const CT_TARGET_PERCENT: f64 = 65.0;

/// Tolerance around the CT target. The comparison is strict (`<`).
pub const CT_TOLERANCE_PERCENT: f64 = 0.1;

/// Lower bound of the CD/d*100 band (inclusive).
pub const CD_MIN_PERCENT: f64 = 20.0;

/// Upper bound of the CD/d*100 band (inclusive).
pub const CD_MAX_PERCENT: f64 = 25.0;

/// Maximum AB/d*100 percentage (inclusive).
pub const AB_MAX_PERCENT: f64 = 10.0;

// =============================================================================
// EXPORT
// =============================================================================

/// File name prefix of every exported spreadsheet.
pub const EXPORT_FILE_PREFIX: &str = "Evaluacion_Tocones_";

/// Timestamp format appended to the spreadsheet name.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Spreadsheet extension.
pub const EXPORT_FILE_EXTENSION: &str = "xlsx";

/// Fixed QR image name; every export overwrites the previous one.
pub const QR_FILE_NAME: &str = "qr_tocones.png";

/// Signature column text when the pad holds strokes.
pub const SIGNATURE_CAPTURED: &str = "Firma guardada";

/// Signature column text when the pad is empty.
pub const SIGNATURE_MISSING: &str = "Sin firma";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_fraction_is_julian_year() {
        // 40 / 1461 == 1000 / 36525 == 10 / 365.25
        assert_eq!(AGE_TENTHS_DENOMINATOR * 1000, 36_525 * AGE_TENTHS_NUMERATOR);
    }

    #[test]
    fn stump_count_is_twelve() {
        assert_eq!(STUMP_COUNT, 12);
    }
}
