//! # Core Type Definitions
//!
//! This module contains the plain data carried through one evaluation:
//! - Stump identifiers (`StumpIndex`)
//! - Derived values (`Age`, `Ratio`, `RatioSet`)
//! - Records (`HeaderRecord`, `StumpRecord`)
//! - Personnel roles (`PersonnelRole`)
//! - Error types (`ToconesError`)
//!
//! ## Ordering Guarantees
//!
//! `StumpIndex` implements `Ord` so that session slots live in a `BTreeMap`
//! and every scan (completeness guard, export rows) runs 1..=12 in order.

use crate::primitives::{DATE_FORMAT, STUMP_COUNT};
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

// =============================================================================
// STUMP INDEX
// =============================================================================

/// Position of a stump within an evaluation (1..=12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StumpIndex(u8);

impl StumpIndex {
    /// Create an index, rejecting anything outside 1..=12.
    pub fn new(value: usize) -> Result<Self, ToconesError> {
        if (1..=STUMP_COUNT).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ToconesError::InvalidStumpIndex(value))
        }
    }

    /// All valid indices in ascending order.
    pub fn all() -> impl Iterator<Item = StumpIndex> {
        (1..=STUMP_COUNT as u8).map(StumpIndex)
    }

    /// Get the raw index value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Label used on buttons and messages ("Tocón 3").
    #[must_use]
    pub fn label(self) -> String {
        format!("Tocón {}", self.0)
    }
}

impl fmt::Display for StumpIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// AGE
// =============================================================================

/// Plantation age in tenths of a year.
///
/// Stored as an integer so that the one-decimal rounding happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age {
    tenths: i64,
}

impl Age {
    /// Create an age from a count of tenths of a year.
    #[must_use]
    pub const fn from_tenths(tenths: i64) -> Self {
        Self { tenths }
    }

    /// Get the age in tenths of a year.
    #[must_use]
    pub const fn tenths(self) -> i64 {
        self.tenths
    }

    /// Get the age in years.
    #[must_use]
    pub fn years(self) -> f64 {
        self.tenths as f64 / 10.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.tenths < 0 { "-" } else { "" };
        let abs = self.tenths.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

// =============================================================================
// RATIOS
// =============================================================================

/// One cut ratio, as a percentage of the stump diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio {
    /// Percentage of the diameter.
    pub percent: f64,
    /// Whether the percentage meets the felling standard.
    pub pass: bool,
}

impl Ratio {
    /// Marker shown next to the percentage.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        if self.pass { "✅" } else { "❌" }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}% {}", self.percent, self.marker())
    }
}

/// The three cut ratios of a stump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioSet {
    /// Felling cut height over diameter (CT/d*100).
    pub ct: Ratio,
    /// Directional cut height over diameter (CD/d*100).
    pub cd: Ratio,
    /// Hinge width over diameter (AB/d*100).
    pub ab: Ratio,
}

impl RatioSet {
    /// True when all three ratios meet the standard.
    #[must_use]
    pub fn all_pass(&self) -> bool {
        self.ct.pass && self.cd.pass && self.ab.pass
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Raw measurements and derived ratios for one stump.
///
/// A saved record always carries all six measurements and all three ratios;
/// an empty slot is represented by the absence of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct StumpRecord {
    /// Stump diameter (d).
    pub diameter: f64,
    /// Stump height.
    pub stump_height: f64,
    /// Felling cut height (CT).
    pub cut_height_front: f64,
    /// Directional cut height (CD).
    pub cut_height_back: f64,
    /// Hinge width (AB).
    pub hinge_width: f64,
    /// Height between the CT and CD cuts.
    pub height_between_cuts: f64,
    /// Ratios computed from the measurements above.
    pub ratios: RatioSet,
}

/// Site, date and personnel metadata shared by the twelve stumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    pub farm: String,
    pub plot: String,
    pub species: String,
    pub planting_date: NaiveDate,
    pub evaluation_date: NaiveDate,
    pub supervisor: String,
    pub evaluator: String,
    pub chainsaw_operator: String,
    pub age: Age,
}

impl HeaderRecord {
    /// Planting date in `dd/mm/yyyy` form.
    #[must_use]
    pub fn planting_date_text(&self) -> String {
        self.planting_date.format(DATE_FORMAT).to_string()
    }

    /// Evaluation date in `dd/mm/yyyy` form.
    #[must_use]
    pub fn evaluation_date_text(&self) -> String {
        self.evaluation_date.format(DATE_FORMAT).to_string()
    }
}

// =============================================================================
// PERSONNEL ROLES
// =============================================================================

/// The three roster-backed header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PersonnelRole {
    Supervisor,
    Evaluator,
    ChainsawOperator,
}

impl PersonnelRole {
    /// Field label shown on the header form.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PersonnelRole::Supervisor => "Supervisor",
            PersonnelRole::Evaluator => "Evaluador",
            PersonnelRole::ChainsawOperator => "Motosierrista",
        }
    }
}

impl fmt::Display for PersonnelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while recording or exporting an evaluation.
///
/// - No silent failures
/// - Every variant is recoverable at the screen level
#[derive(Debug, Error)]
pub enum ToconesError {
    /// A date did not match `dd/mm/yyyy`.
    #[error("Invalid date format: '{0}' (use dd/mm/yyyy)")]
    InvalidDateFormat(String),

    /// A measurement was empty, non-numeric, non-finite, or a zero diameter.
    #[error("Invalid numeric value for {field}: '{value}'")]
    InvalidNumericInput { field: &'static str, value: String },

    /// Export attempted while a stump slot is still empty.
    #[error("Missing data for stump {0}")]
    IncompleteSession(StumpIndex),

    /// The spreadsheet writer or QR generator failed.
    #[error("Export failed: {0}")]
    ExportIoError(String),

    /// A stump index outside 1..=12.
    #[error("Stump index out of range: {0}")]
    InvalidStumpIndex(usize),

    /// A personnel name that is not on the roster.
    #[error("{role} '{name}' is not on the roster")]
    UnknownPersonnel { role: PersonnelRole, name: String },

    /// Export attempted before the header form was saved.
    #[error("Header has not been recorded")]
    MissingHeader,

    /// A main-menu module that is not implemented yet.
    #[error("Module not available yet: {0}")]
    ModuleUnavailable(String),

    /// An operation invoked on a screen that does not offer it.
    #[error("Action '{action}' is not available on screen {screen}")]
    InvalidTransition { screen: String, action: &'static str },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Terminal or platform I/O outside the export.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stump_index_bounds() {
        assert!(StumpIndex::new(0).is_err());
        assert!(StumpIndex::new(1).is_ok());
        assert!(StumpIndex::new(12).is_ok());
        assert!(matches!(
            StumpIndex::new(13),
            Err(ToconesError::InvalidStumpIndex(13))
        ));
    }

    #[test]
    fn stump_index_all_is_ordered() {
        let all: Vec<u8> = StumpIndex::all().map(StumpIndex::get).collect();
        assert_eq!(all, (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn stump_index_label() {
        assert_eq!(StumpIndex::new(4).map(StumpIndex::label).ok(), Some("Tocón 4".to_string()));
    }

    #[test]
    fn age_display() {
        assert_eq!(Age::from_tenths(20).to_string(), "2.0");
        assert_eq!(Age::from_tenths(37).to_string(), "3.7");
        assert_eq!(Age::from_tenths(-5).to_string(), "-0.5");
        assert_eq!(Age::from_tenths(-12).to_string(), "-1.2");
    }

    #[test]
    fn ratio_display_markers() {
        let pass = Ratio {
            percent: 65.0,
            pass: true,
        };
        let fail = Ratio {
            percent: 30.04,
            pass: false,
        };
        assert_eq!(pass.to_string(), "65.0% ✅");
        assert_eq!(fail.to_string(), "30.0% ❌");
    }

    #[test]
    fn header_dates_round_trip_text() {
        let header = HeaderRecord {
            farm: "La Esperanza".to_string(),
            plot: "Lote A".to_string(),
            species: "Pinus patula".to_string(),
            planting_date: NaiveDate::from_ymd_opt(2020, 3, 7).unwrap_or_default(),
            evaluation_date: NaiveDate::from_ymd_opt(2022, 11, 25).unwrap_or_default(),
            supervisor: "s".to_string(),
            evaluator: "e".to_string(),
            chainsaw_operator: "m".to_string(),
            age: Age::from_tenths(27),
        };
        assert_eq!(header.planting_date_text(), "07/03/2020");
        assert_eq!(header.evaluation_date_text(), "25/11/2022");
    }
}
