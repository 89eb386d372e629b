//! # Session Module
//!
//! The in-memory store for one evaluation: a single header, twelve stump
//! slots and the two signature pads.
//!
//! - Slots start empty and are filled as each stump form is saved
//! - Any slot may be overwritten any number of times before export
//! - Never persisted except through the one-shot export
//! - Discarded when the flow returns to the main menu

use crate::roster::Roster;
use crate::signature::Signatures;
use crate::{HeaderRecord, PersonnelRole, StumpIndex, StumpRecord, ToconesError};
use std::collections::BTreeMap;

/// One evaluation in progress.
#[derive(Debug, Clone)]
pub struct Session {
    /// Personnel the header may name.
    roster: Roster,
    /// Site/date/personnel metadata, once the header form is saved.
    header: Option<HeaderRecord>,
    /// Stump slots 1..=12; `None` until saved.
    stumps: BTreeMap<StumpIndex, Option<StumpRecord>>,
    /// Evaluator and chainsaw operator signatures.
    signatures: Signatures,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Roster::default())
    }
}

impl Session {
    /// Create an empty session checking personnel against `roster`.
    #[must_use]
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            header: None,
            stumps: StumpIndex::all().map(|i| (i, None)).collect(),
            signatures: Signatures::default(),
        }
    }

    /// Discard every recorded value, keeping the roster.
    pub fn reset(&mut self) {
        self.header = None;
        for slot in self.stumps.values_mut() {
            *slot = None;
        }
        self.signatures = Signatures::default();
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    // =========================================================================
    // HEADER
    // =========================================================================

    /// Replace the header after checking its personnel against the roster.
    pub fn set_header(&mut self, header: HeaderRecord) -> Result<(), ToconesError> {
        self.roster
            .validate(PersonnelRole::Supervisor, &header.supervisor)?;
        self.roster
            .validate(PersonnelRole::Evaluator, &header.evaluator)?;
        self.roster
            .validate(PersonnelRole::ChainsawOperator, &header.chainsaw_operator)?;
        self.header = Some(header);
        Ok(())
    }

    #[must_use]
    pub fn header(&self) -> Option<&HeaderRecord> {
        self.header.as_ref()
    }

    // =========================================================================
    // STUMPS
    // =========================================================================

    /// Store (or overwrite) a stump record.
    pub fn set_stump(&mut self, index: StumpIndex, record: StumpRecord) {
        self.stumps.insert(index, Some(record));
    }

    /// Current record of a stump, if it was saved.
    #[must_use]
    pub fn stump(&self, index: StumpIndex) -> Option<&StumpRecord> {
        self.stumps.get(&index).and_then(Option::as_ref)
    }

    /// All slots in index order.
    pub fn stumps(&self) -> impl Iterator<Item = (StumpIndex, Option<&StumpRecord>)> {
        self.stumps.iter().map(|(i, r)| (*i, r.as_ref()))
    }

    /// First empty slot scanning 1..=12.
    #[must_use]
    pub fn first_missing(&self) -> Option<StumpIndex> {
        self.stumps
            .iter()
            .find(|(_, record)| record.is_none())
            .map(|(i, _)| *i)
    }

    /// True once all twelve slots hold a saved record.
    ///
    /// The header is not part of this check.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }

    /// Number of saved stump records.
    #[must_use]
    pub fn saved_count(&self) -> usize {
        self.stumps.values().filter(|r| r.is_some()).count()
    }

    // =========================================================================
    // SIGNATURES
    // =========================================================================

    #[must_use]
    pub fn signatures(&self) -> &Signatures {
        &self.signatures
    }

    pub fn signatures_mut(&mut self) -> &mut Signatures {
        &mut self.signatures
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios::compute_ratios;
    use crate::signature::{Point, Signer};
    use crate::{Age, RatioSet};
    use chrono::NaiveDate;

    fn ratios() -> RatioSet {
        compute_ratios(20.0, 13.0, 4.6, 1.8).expect("valid")
    }

    fn record(diameter: f64) -> StumpRecord {
        StumpRecord {
            diameter,
            stump_height: 10.0,
            cut_height_front: 13.0,
            cut_height_back: 4.6,
            hinge_width: 1.8,
            height_between_cuts: 3.0,
            ratios: ratios(),
        }
    }

    fn header(supervisor: &str) -> HeaderRecord {
        HeaderRecord {
            farm: "Lote A".to_string(),
            plot: "7".to_string(),
            species: "Pinus".to_string(),
            planting_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            evaluation_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            supervisor: supervisor.to_string(),
            evaluator: "Hernandez, Erika".to_string(),
            chainsaw_operator: "Cruz Cardona, Cristian Danilo".to_string(),
            age: Age::from_tenths(20),
        }
    }

    #[test]
    fn new_session_has_twelve_empty_slots() {
        let session = Session::default();
        assert_eq!(session.stumps().count(), 12);
        assert_eq!(session.saved_count(), 0);
        assert!(!session.is_complete());
        assert_eq!(session.first_missing(), StumpIndex::new(1).ok());
    }

    #[test]
    fn incomplete_until_every_slot_saved() {
        let mut session = Session::default();
        for i in StumpIndex::all().filter(|i| i.get() != 7) {
            session.set_stump(i, record(20.0));
        }
        assert!(!session.is_complete());
        assert_eq!(session.first_missing(), StumpIndex::new(7).ok());

        session.set_stump(StumpIndex::new(7).expect("index"), record(20.0));
        assert!(session.is_complete());
    }

    #[test]
    fn completeness_ignores_header() {
        let mut session = Session::default();
        session
            .set_header(header("Hernandez, Erika"))
            .expect("valid header");
        assert!(!session.is_complete());

        let mut headless = Session::default();
        for i in StumpIndex::all() {
            headless.set_stump(i, record(20.0));
        }
        assert!(headless.header().is_none());
        assert!(headless.is_complete());
    }

    #[test]
    fn overwrite_replaces_slot() {
        let mut session = Session::default();
        let index = StumpIndex::new(3).expect("index");
        session.set_stump(index, record(20.0));
        session.set_stump(index, record(31.5));
        assert_eq!(session.stump(index).map(|r| r.diameter), Some(31.5));
        assert_eq!(session.saved_count(), 1);
    }

    #[test]
    fn header_personnel_checked_against_roster() {
        let mut session = Session::default();
        let err = session
            .set_header(header("Seleccione"))
            .expect_err("placeholder is not a supervisor");
        assert!(matches!(
            err,
            ToconesError::UnknownPersonnel {
                role: PersonnelRole::Supervisor,
                ..
            }
        ));
        assert!(session.header().is_none());
    }

    #[test]
    fn injected_roster_is_used() {
        let roster = Roster {
            supervisors: vec!["Nuevo, Supervisor".to_string()],
            ..Roster::default()
        };
        let mut session = Session::new(roster);
        assert!(session.set_header(header("Nuevo, Supervisor")).is_ok());
        assert!(session.set_header(header("Hernandez, Erika")).is_err());
    }

    #[test]
    fn reset_discards_everything_but_roster() {
        let mut session = Session::default();
        session
            .set_header(header("Hernandez, Erika"))
            .expect("valid header");
        session.set_stump(StumpIndex::new(1).expect("index"), record(20.0));
        session
            .signatures_mut()
            .pad_mut(Signer::Evaluator)
            .begin_stroke(Point::new(0.0, 0.0));

        session.reset();

        assert!(session.header().is_none());
        assert_eq!(session.saved_count(), 0);
        assert!(session.signatures().pad(Signer::Evaluator).is_empty());
        assert_eq!(session.roster(), &Roster::default());
    }
}
