//! # Screen Flow Controller
//!
//! Sequences the user through the evaluation, one active screen at a time:
//!
//! ```text
//! Menu ─▶ Header ─▶ StumpIndex ─▶ StumpForm(i) ─▶ StumpIndex ─▶ … ─▶ ExportResult ─▶ Menu
//! ```
//!
//! Every transition is an explicit user action. The controller owns only UI
//! state: the current screen, the header draft, the lazily created stump
//! forms and the last export report. Business data lives in the [`Session`]
//! passed to each call.

use crate::age::{age_between, calculate_age, parse_date};
use crate::export::{ExportReport, Exporter, QrGenerator, SpreadsheetWriter};
use crate::ratios::{compute_ratios, parse_decimal};
use crate::signature::{SignaturePad, Signer};
use crate::{
    Age, HeaderRecord, PersonnelRole, RatioSet, Session, StumpIndex, StumpRecord, ToconesError,
};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;

/// Text shown by a personnel picker before a choice is made.
pub const PERSONNEL_PLACEHOLDER: &str = "Seleccione";

// =============================================================================
// SCREENS
// =============================================================================

/// The screen currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Header,
    StumpIndex,
    StumpForm(StumpIndex),
    ExportResult,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Menu => f.write_str("Menu"),
            Screen::Header => f.write_str("Header"),
            Screen::StumpIndex => f.write_str("StumpIndex"),
            Screen::StumpForm(i) => write!(f, "StumpForm({})", i),
            Screen::ExportResult => f.write_str("ExportResult"),
        }
    }
}

/// Modules offered by the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Tocones,
    Corredores,
    Cubicacion,
    Microplaneacion,
}

impl MenuOption {
    /// Menu entries in display order.
    pub const ALL: [MenuOption; 4] = [
        MenuOption::Tocones,
        MenuOption::Corredores,
        MenuOption::Cubicacion,
        MenuOption::Microplaneacion,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Tocones => "TOCONES",
            MenuOption::Corredores => "CORREDORES",
            MenuOption::Cubicacion => "CUBICACIÓN",
            MenuOption::Microplaneacion => "MICROPLANEACIÓN",
        }
    }

    /// Only the stump evaluation is implemented.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, MenuOption::Tocones)
    }
}

// =============================================================================
// HEADER FORM
// =============================================================================

/// Free-text fields of the header form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Farm,
    Plot,
    Species,
    PlantingDate,
    EvaluationDate,
}

impl HeaderField {
    pub const ALL: [HeaderField; 5] = [
        HeaderField::Farm,
        HeaderField::Plot,
        HeaderField::Species,
        HeaderField::PlantingDate,
        HeaderField::EvaluationDate,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            HeaderField::Farm => "Finca",
            HeaderField::Plot => "Lote",
            HeaderField::Species => "Especie",
            HeaderField::PlantingDate => "Plantación (dd/mm/aaaa)",
            HeaderField::EvaluationDate => "Evaluación (dd/mm/aaaa)",
        }
    }
}

/// Draft of the header form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderForm {
    farm: String,
    plot: String,
    species: String,
    planting_date: String,
    evaluation_date: String,
    supervisor: Option<String>,
    evaluator: Option<String>,
    chainsaw_operator: Option<String>,
    age: Option<Age>,
}

impl HeaderForm {
    #[must_use]
    pub fn field(&self, field: HeaderField) -> &str {
        match field {
            HeaderField::Farm => &self.farm,
            HeaderField::Plot => &self.plot,
            HeaderField::Species => &self.species,
            HeaderField::PlantingDate => &self.planting_date,
            HeaderField::EvaluationDate => &self.evaluation_date,
        }
    }

    pub fn set_field(&mut self, field: HeaderField, value: impl Into<String>) {
        let slot = match field {
            HeaderField::Farm => &mut self.farm,
            HeaderField::Plot => &mut self.plot,
            HeaderField::Species => &mut self.species,
            HeaderField::PlantingDate => &mut self.planting_date,
            HeaderField::EvaluationDate => &mut self.evaluation_date,
        };
        *slot = value.into();
    }

    /// Current pick for a personnel role, if any.
    #[must_use]
    pub fn selection(&self, role: PersonnelRole) -> Option<&str> {
        match role {
            PersonnelRole::Supervisor => self.supervisor.as_deref(),
            PersonnelRole::Evaluator => self.evaluator.as_deref(),
            PersonnelRole::ChainsawOperator => self.chainsaw_operator.as_deref(),
        }
    }

    pub fn select(&mut self, role: PersonnelRole, name: impl Into<String>) {
        let slot = match role {
            PersonnelRole::Supervisor => &mut self.supervisor,
            PersonnelRole::Evaluator => &mut self.evaluator,
            PersonnelRole::ChainsawOperator => &mut self.chainsaw_operator,
        };
        *slot = Some(name.into());
    }

    /// Last age shown on the form.
    #[must_use]
    pub fn age(&self) -> Option<Age> {
        self.age
    }

    /// Compute and show the age. On error the displayed age is left as is.
    pub fn compute_age(&mut self) -> Result<Age, ToconesError> {
        let age = calculate_age(&self.planting_date, &self.evaluation_date)?;
        self.age = Some(age);
        Ok(age)
    }

    /// Build a header record; the age is always recomputed from the dates.
    pub fn to_record(&self) -> Result<HeaderRecord, ToconesError> {
        let planting_date = parse_date(&self.planting_date)?;
        let evaluation_date = parse_date(&self.evaluation_date)?;

        let pick = |role: PersonnelRole| -> Result<String, ToconesError> {
            self.selection(role)
                .map(str::to_string)
                .ok_or(ToconesError::UnknownPersonnel {
                    role,
                    name: PERSONNEL_PLACEHOLDER.to_string(),
                })
        };

        Ok(HeaderRecord {
            farm: self.farm.trim().to_string(),
            plot: self.plot.trim().to_string(),
            species: self.species.trim().to_string(),
            planting_date,
            evaluation_date,
            supervisor: pick(PersonnelRole::Supervisor)?,
            evaluator: pick(PersonnelRole::Evaluator)?,
            chainsaw_operator: pick(PersonnelRole::ChainsawOperator)?,
            age: age_between(planting_date, evaluation_date),
        })
    }
}

// =============================================================================
// STUMP FORM
// =============================================================================

/// Measurement fields of a stump form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StumpField {
    Diameter,
    StumpHeight,
    CutHeightFront,
    CutHeightBack,
    HingeWidth,
    HeightBetweenCuts,
}

impl StumpField {
    pub const ALL: [StumpField; 6] = [
        StumpField::Diameter,
        StumpField::StumpHeight,
        StumpField::CutHeightFront,
        StumpField::CutHeightBack,
        StumpField::HingeWidth,
        StumpField::HeightBetweenCuts,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StumpField::Diameter => "Diámetro (d)",
            StumpField::StumpHeight => "Altura tocon",
            StumpField::CutHeightFront => "Corte de tala (CT)",
            StumpField::CutHeightBack => "Corte de dirección (CD)",
            StumpField::HingeWidth => "Ancho Bisagra (AB)",
            StumpField::HeightBetweenCuts => "Altura entre CT y CD",
        }
    }

    /// Short name used in validation errors.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            StumpField::Diameter => "d",
            StumpField::StumpHeight => "altura",
            StumpField::CutHeightFront => "CT",
            StumpField::CutHeightBack => "CD",
            StumpField::HingeWidth => "AB",
            StumpField::HeightBetweenCuts => "altura CT-CD",
        }
    }
}

/// Draft of one stump form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StumpForm {
    fields: [String; 6],
    ratios: Option<RatioSet>,
}

impl StumpForm {
    /// Form pre-populated from a saved record (or empty).
    #[must_use]
    pub fn from_record(record: Option<&StumpRecord>) -> Self {
        let Some(r) = record else {
            return Self::default();
        };
        Self {
            fields: [
                r.diameter,
                r.stump_height,
                r.cut_height_front,
                r.cut_height_back,
                r.hinge_width,
                r.height_between_cuts,
            ]
            .map(|v| v.to_string()),
            ratios: Some(r.ratios),
        }
    }

    fn slot(field: StumpField) -> usize {
        match field {
            StumpField::Diameter => 0,
            StumpField::StumpHeight => 1,
            StumpField::CutHeightFront => 2,
            StumpField::CutHeightBack => 3,
            StumpField::HingeWidth => 4,
            StumpField::HeightBetweenCuts => 5,
        }
    }

    #[must_use]
    pub fn field(&self, field: StumpField) -> &str {
        &self.fields[Self::slot(field)]
    }

    pub fn set_field(&mut self, field: StumpField, value: impl Into<String>) {
        self.fields[Self::slot(field)] = value.into();
    }

    /// Ratios currently shown on the form.
    #[must_use]
    pub fn ratios(&self) -> Option<&RatioSet> {
        self.ratios.as_ref()
    }

    fn parse(&self, field: StumpField) -> Result<f64, ToconesError> {
        parse_decimal(field.key(), self.field(field))
    }

    /// Parse every field and compute the ratios.
    pub fn to_record(&self) -> Result<StumpRecord, ToconesError> {
        let diameter = self.parse(StumpField::Diameter)?;
        let stump_height = self.parse(StumpField::StumpHeight)?;
        let cut_height_front = self.parse(StumpField::CutHeightFront)?;
        let cut_height_back = self.parse(StumpField::CutHeightBack)?;
        let hinge_width = self.parse(StumpField::HingeWidth)?;
        let height_between_cuts = self.parse(StumpField::HeightBetweenCuts)?;
        let ratios = compute_ratios(diameter, cut_height_front, cut_height_back, hinge_width)?;

        Ok(StumpRecord {
            diameter,
            stump_height,
            cut_height_front,
            cut_height_back,
            hinge_width,
            height_between_cuts,
            ratios,
        })
    }

    /// Compute and show the ratios from d, CT, CD and AB.
    pub fn calculate(&mut self) -> Result<RatioSet, ToconesError> {
        let ratios = compute_ratios(
            self.parse(StumpField::Diameter)?,
            self.parse(StumpField::CutHeightFront)?,
            self.parse(StumpField::CutHeightBack)?,
            self.parse(StumpField::HingeWidth)?,
        )?;
        self.ratios = Some(ratios);
        Ok(ratios)
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Screen state machine for one running app.
#[derive(Debug, Clone)]
pub struct FlowController {
    screen: Screen,
    header_form: HeaderForm,
    /// Stump forms, created the first time each index is opened.
    stump_forms: BTreeMap<StumpIndex, StumpForm>,
    last_export: Option<ExportReport>,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowController {
    /// Start on the main menu.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: Screen::Menu,
            header_form: HeaderForm::default(),
            stump_forms: BTreeMap::new(),
            last_export: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Number of stump forms instantiated in this session.
    #[must_use]
    pub fn instantiated_forms(&self) -> usize {
        self.stump_forms.len()
    }

    #[must_use]
    pub fn last_export(&self) -> Option<&ExportReport> {
        self.last_export.as_ref()
    }

    fn invalid(&self, action: &'static str) -> ToconesError {
        ToconesError::InvalidTransition {
            screen: self.screen.to_string(),
            action,
        }
    }

    fn require(&self, screen: Screen, action: &'static str) -> Result<(), ToconesError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn current_stump(&self, action: &'static str) -> Result<StumpIndex, ToconesError> {
        match self.screen {
            Screen::StumpForm(index) => Ok(index),
            _ => Err(self.invalid(action)),
        }
    }

    /// Drop the session and every form, back to a blank evaluation.
    fn discard(&mut self, session: &mut Session) {
        session.reset();
        self.header_form = HeaderForm::default();
        self.stump_forms.clear();
        self.last_export = None;
    }

    // =========================================================================
    // MENU
    // =========================================================================

    /// Pick a main-menu module. Starting TOCONES opens a fresh session.
    pub fn select_menu(
        &mut self,
        session: &mut Session,
        option: MenuOption,
    ) -> Result<(), ToconesError> {
        self.require(Screen::Menu, "select_menu")?;
        if !option.is_available() {
            return Err(ToconesError::ModuleUnavailable(option.label().to_string()));
        }
        self.discard(session);
        self.screen = Screen::Header;
        Ok(())
    }

    // =========================================================================
    // HEADER
    // =========================================================================

    pub fn header_form(&self) -> Result<&HeaderForm, ToconesError> {
        self.require(Screen::Header, "header_form")?;
        Ok(&self.header_form)
    }

    pub fn header_form_mut(&mut self) -> Result<&mut HeaderForm, ToconesError> {
        self.require(Screen::Header, "header_form")?;
        Ok(&mut self.header_form)
    }

    /// Pick a roster member by 1-based position.
    pub fn select_personnel<'s>(
        &mut self,
        session: &'s Session,
        role: PersonnelRole,
        position: usize,
    ) -> Result<&'s str, ToconesError> {
        self.require(Screen::Header, "select_personnel")?;
        let name = session
            .roster()
            .pick(role, position)
            .ok_or_else(|| ToconesError::UnknownPersonnel {
                role,
                name: position.to_string(),
            })?;
        self.header_form.select(role, name);
        Ok(name)
    }

    /// Signature pad of a signer, drawn on the header screen.
    pub fn signature_pad<'s>(
        &self,
        session: &'s mut Session,
        signer: Signer,
    ) -> Result<&'s mut SignaturePad, ToconesError> {
        self.require(Screen::Header, "signature_pad")?;
        Ok(session.signatures_mut().pad_mut(signer))
    }

    pub fn compute_age(&mut self) -> Result<Age, ToconesError> {
        self.require(Screen::Header, "compute_age")?;
        self.header_form.compute_age()
    }

    /// Store the header and continue to the stump index.
    pub fn save_header(&mut self, session: &mut Session) -> Result<(), ToconesError> {
        self.require(Screen::Header, "save_header")?;
        let record = self.header_form.to_record()?;
        self.header_form.age = Some(record.age);
        session.set_header(record)?;
        self.screen = Screen::StumpIndex;
        Ok(())
    }

    // =========================================================================
    // STUMPS
    // =========================================================================

    /// Open a stump form, loading the saved record and discarding any
    /// edits left unsaved from an earlier visit.
    pub fn open_stump(&mut self, session: &Session, index: StumpIndex) -> Result<(), ToconesError> {
        self.require(Screen::StumpIndex, "open_stump")?;
        let saved = StumpForm::from_record(session.stump(index));
        match self.stump_forms.get_mut(&index) {
            Some(form) => *form = saved,
            None => {
                self.stump_forms.insert(index, saved);
            }
        }
        self.screen = Screen::StumpForm(index);
        Ok(())
    }

    pub fn stump_form(&self) -> Result<(StumpIndex, &StumpForm), ToconesError> {
        let index = self.current_stump("stump_form")?;
        let form = self
            .stump_forms
            .get(&index)
            .ok_or_else(|| self.invalid("stump_form"))?;
        Ok((index, form))
    }

    pub fn stump_form_mut(&mut self) -> Result<(StumpIndex, &mut StumpForm), ToconesError> {
        let index = self.current_stump("stump_form")?;
        let screen = self.screen.to_string();
        let form = self
            .stump_forms
            .get_mut(&index)
            .ok_or(ToconesError::InvalidTransition {
                screen,
                action: "stump_form",
            })?;
        Ok((index, form))
    }

    pub fn calculate_ratios(&mut self) -> Result<RatioSet, ToconesError> {
        let (_, form) = self.stump_form_mut()?;
        form.calculate()
    }

    /// Save the open form. Ratios are recomputed from the current fields.
    pub fn save_stump(&mut self, session: &mut Session) -> Result<StumpIndex, ToconesError> {
        let (index, form) = self.stump_form_mut()?;
        let record = form.to_record()?;
        form.ratios = Some(record.ratios);
        session.set_stump(index, record);
        Ok(index)
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Go back one screen. Leaving the header for the menu discards the session.
    pub fn back(&mut self, session: &mut Session) -> Result<Screen, ToconesError> {
        self.screen = match self.screen {
            Screen::StumpForm(_) => Screen::StumpIndex,
            Screen::StumpIndex => Screen::Header,
            Screen::Header => {
                self.discard(session);
                Screen::Menu
            }
            Screen::Menu | Screen::ExportResult => return Err(self.invalid("back")),
        };
        Ok(self.screen)
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Export the session. On failure the index screen and all data remain.
    pub fn export<W: SpreadsheetWriter, Q: QrGenerator>(
        &mut self,
        session: &Session,
        exporter: &Exporter<W, Q>,
        timestamp: NaiveDateTime,
    ) -> Result<&ExportReport, ToconesError> {
        self.require(Screen::StumpIndex, "export")?;
        let report = exporter.export_session(session, timestamp)?;
        self.screen = Screen::ExportResult;
        Ok(self.last_export.insert(report))
    }

    /// Leave the result screen; the finished session is discarded.
    pub fn close_export(&mut self, session: &mut Session) -> Result<(), ToconesError> {
        self.require(Screen::ExportResult, "close_export")?;
        self.discard(session);
        self.screen = Screen::Menu;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Point;
    use std::path::Path;

    struct NullWriter;

    impl SpreadsheetWriter for NullWriter {
        fn write(&self, _: &crate::export::Dataset, _: &Path) -> Result<(), ToconesError> {
            Ok(())
        }
    }

    struct NullQr;

    impl QrGenerator for NullQr {
        fn generate(&self, _: &str, _: &Path) -> Result<(), ToconesError> {
            Ok(())
        }
    }

    fn exporter() -> Exporter<NullWriter, NullQr> {
        Exporter::with_backends("/tmp/tocones", NullWriter, NullQr)
    }

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap_or_default()
    }

    fn idx(i: usize) -> StumpIndex {
        StumpIndex::new(i).expect("index")
    }

    fn fill_header(flow: &mut FlowController, session: &Session) {
        let form = flow.header_form_mut().expect("header screen");
        form.set_field(HeaderField::Farm, "Lote A");
        form.set_field(HeaderField::Plot, "4");
        form.set_field(HeaderField::Species, "Pinus patula");
        form.set_field(HeaderField::PlantingDate, "01/01/2020");
        form.set_field(HeaderField::EvaluationDate, "01/01/2022");
        flow.select_personnel(session, PersonnelRole::Supervisor, 1)
            .expect("supervisor");
        flow.select_personnel(session, PersonnelRole::Evaluator, 4)
            .expect("evaluator");
        flow.select_personnel(session, PersonnelRole::ChainsawOperator, 7)
            .expect("operator");
    }

    fn fill_stump(flow: &mut FlowController, values: [&str; 6]) {
        let (_, form) = flow.stump_form_mut().expect("stump screen");
        for (field, value) in StumpField::ALL.into_iter().zip(values) {
            form.set_field(field, value);
        }
    }

    const REFERENCE: [&str; 6] = ["20", "9", "13", "4.6", "1.8", "3"];

    fn at_index(session: &mut Session) -> FlowController {
        let mut flow = FlowController::new();
        flow.select_menu(session, MenuOption::Tocones).expect("menu");
        fill_header(&mut flow, session);
        flow.save_header(session).expect("save header");
        flow
    }

    #[test]
    fn unavailable_modules_keep_menu() {
        let mut session = Session::default();
        let mut flow = FlowController::new();
        let err = flow
            .select_menu(&mut session, MenuOption::Cubicacion)
            .expect_err("not implemented");
        assert!(matches!(err, ToconesError::ModuleUnavailable(ref m) if m == "CUBICACIÓN"));
        assert_eq!(flow.screen(), Screen::Menu);
    }

    #[test]
    fn header_save_computes_age_and_advances() {
        let mut session = Session::default();
        let flow = at_index(&mut session);

        assert_eq!(flow.screen(), Screen::StumpIndex);
        let header = session.header().expect("header stored");
        assert_eq!(header.age.to_string(), "2.0");
        assert_eq!(header.supervisor, "Astudillo Pungo, Elkin Antonio");
        assert_eq!(header.chainsaw_operator, "Cruz Cardona, Cristian Danilo");
    }

    #[test]
    fn header_with_bad_date_stays_on_header() {
        let mut session = Session::default();
        let mut flow = FlowController::new();
        flow.select_menu(&mut session, MenuOption::Tocones).expect("menu");
        fill_header(&mut flow, &session);
        flow.header_form_mut()
            .expect("header")
            .set_field(HeaderField::EvaluationDate, "2022/01/01");

        assert!(matches!(
            flow.compute_age(),
            Err(ToconesError::InvalidDateFormat(_))
        ));
        assert_eq!(flow.header_form().expect("header").age(), None);
        assert!(matches!(
            flow.save_header(&mut session),
            Err(ToconesError::InvalidDateFormat(_))
        ));
        assert_eq!(flow.screen(), Screen::Header);
        assert!(session.header().is_none());
    }

    #[test]
    fn header_requires_personnel_picks() {
        let mut session = Session::default();
        let mut flow = FlowController::new();
        flow.select_menu(&mut session, MenuOption::Tocones).expect("menu");
        let form = flow.header_form_mut().expect("header");
        form.set_field(HeaderField::PlantingDate, "01/01/2020");
        form.set_field(HeaderField::EvaluationDate, "01/01/2021");

        let err = flow.save_header(&mut session).expect_err("no supervisor");
        assert!(matches!(
            err,
            ToconesError::UnknownPersonnel { role: PersonnelRole::Supervisor, ref name }
                if name == PERSONNEL_PLACEHOLDER
        ));
        assert!(flow
            .select_personnel(&session, PersonnelRole::Supervisor, 99)
            .is_err());
    }

    #[test]
    fn stump_forms_are_created_lazily_and_reused() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);
        assert_eq!(flow.instantiated_forms(), 0);

        flow.open_stump(&session, idx(3)).expect("open");
        flow.back(&mut session).expect("back");
        flow.open_stump(&session, idx(3)).expect("reopen");
        flow.back(&mut session).expect("back");
        flow.open_stump(&session, idx(9)).expect("open");

        assert_eq!(flow.instantiated_forms(), 2);
        assert_eq!(flow.screen(), Screen::StumpForm(idx(9)));
    }

    #[test]
    fn reopened_form_prepopulates_saved_values() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);

        flow.open_stump(&session, idx(1)).expect("open");
        fill_stump(&mut flow, REFERENCE);
        flow.save_stump(&mut session).expect("save");
        let saved_form = flow.stump_form().expect("form").1.clone();
        flow.back(&mut session).expect("back");

        flow.open_stump(&session, idx(1)).expect("reopen");
        let (_, form) = flow.stump_form().expect("form");
        for (field, value) in StumpField::ALL.into_iter().zip(REFERENCE) {
            assert_eq!(form.field(field), value);
        }
        assert_eq!(form, &saved_form);
        let ratios = form.ratios().expect("ratios");
        assert_eq!(ratios.ct.to_string(), "65.0% ✅");
        assert_eq!(ratios.cd.to_string(), "23.0% ✅");
        assert_eq!(ratios.ab.to_string(), "9.0% ✅");
    }

    #[test]
    fn leaving_without_saving_discards_edits() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);

        flow.open_stump(&session, idx(2)).expect("open");
        fill_stump(&mut flow, REFERENCE);
        flow.save_stump(&mut session).expect("save");
        flow.stump_form_mut()
            .expect("form")
            .1
            .set_field(StumpField::Diameter, "35");
        flow.back(&mut session).expect("back");

        flow.open_stump(&session, idx(2)).expect("reopen");
        assert_eq!(
            flow.stump_form().expect("form").1.field(StumpField::Diameter),
            "20"
        );
        assert_eq!(session.stump(idx(2)).map(|r| r.diameter), Some(20.0));
    }

    #[test]
    fn save_recomputes_stale_ratios() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);

        flow.open_stump(&session, idx(5)).expect("open");
        fill_stump(&mut flow, REFERENCE);
        flow.calculate_ratios().expect("calculate");
        flow.stump_form_mut()
            .expect("form")
            .1
            .set_field(StumpField::CutHeightFront, "15");
        flow.save_stump(&mut session).expect("save");

        let saved = session.stump(idx(5)).expect("saved");
        assert!(!saved.ratios.ct.pass);
        assert_eq!(saved.ratios.ct.to_string(), "75.0% ❌");
    }

    #[test]
    fn invalid_measurement_keeps_slot_empty() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);

        flow.open_stump(&session, idx(6)).expect("open");
        fill_stump(&mut flow, ["20", "", "13", "4.6", "1.8", "3"]);
        let err = flow.save_stump(&mut session).expect_err("height missing");
        assert!(matches!(
            err,
            ToconesError::InvalidNumericInput { field: "altura", .. }
        ));
        assert!(session.stump(idx(6)).is_none());

        // Ratios only need d, CT, CD and AB.
        assert!(flow.calculate_ratios().is_ok());
    }

    #[test]
    fn incomplete_export_keeps_index_screen() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);
        let exporter = exporter();

        let err = flow
            .export(&session, &exporter, now())
            .expect_err("nothing saved");
        assert!(matches!(err, ToconesError::IncompleteSession(i) if i.get() == 1));
        assert_eq!(flow.screen(), Screen::StumpIndex);
        assert!(session.header().is_some());
    }

    #[test]
    fn full_flow_exports_and_returns_to_menu() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);

        flow.back(&mut session).expect("back to header");
        flow.signature_pad(&mut session, Signer::Evaluator)
            .expect("pad")
            .begin_stroke(Point::new(1.0, 1.0));
        flow.save_header(&mut session).expect("save header again");

        for i in StumpIndex::all() {
            flow.open_stump(&session, i).expect("open");
            fill_stump(&mut flow, REFERENCE);
            flow.save_stump(&mut session).expect("save");
            flow.back(&mut session).expect("back");
        }

        let exporter = exporter();
        let report = flow
            .export(&session, &exporter, now())
            .expect("export")
            .clone();
        assert_eq!(report.rows, 12);
        assert_eq!(flow.screen(), Screen::ExportResult);
        assert_eq!(flow.last_export(), Some(&report));

        flow.close_export(&mut session).expect("close");
        assert_eq!(flow.screen(), Screen::Menu);
        assert_eq!(session.saved_count(), 0);
        assert!(session.header().is_none());
        assert_eq!(flow.instantiated_forms(), 0);
    }

    #[test]
    fn actions_on_wrong_screen_are_rejected() {
        let mut session = Session::default();
        let mut flow = FlowController::new();

        assert!(matches!(
            flow.save_header(&mut session),
            Err(ToconesError::InvalidTransition { action: "save_header", .. })
        ));
        assert!(flow.open_stump(&session, idx(1)).is_err());
        assert!(flow.back(&mut session).is_err());
        assert!(flow.close_export(&mut session).is_err());
        assert!(flow.calculate_ratios().is_err());
    }

    #[test]
    fn header_back_to_menu_discards_session() {
        let mut session = Session::default();
        let mut flow = at_index(&mut session);
        flow.open_stump(&session, idx(1)).expect("open");
        fill_stump(&mut flow, REFERENCE);
        flow.save_stump(&mut session).expect("save");

        assert_eq!(flow.back(&mut session).expect("index"), Screen::StumpIndex);
        assert_eq!(flow.back(&mut session).expect("header"), Screen::Header);
        assert_eq!(flow.back(&mut session).expect("menu"), Screen::Menu);
        assert_eq!(session.saved_count(), 0);
        assert!(session.header().is_none());
    }
}
