//! # tocones-core
//!
//! The stump evaluation engine behind the TOCONES form.
//!
//! One evaluation is a header (site, dates, personnel, signatures) plus twelve
//! stump measurements. This crate validates what is typed into the forms,
//! derives the plantation age and the three cut ratios, keeps the session in
//! memory and exports it as a spreadsheet with a companion QR code.
//!
//! ## Layout
//!
//! - `types`, `primitives` → plain data and constants
//! - `age`, `ratios` → pure calculators
//! - `roster`, `signature`, `session` → the in-memory evaluation
//! - `export`, `formats` → dataset flattening, xlsx and QR backends
//! - `flow` → the screen state machine driven by a front end
//!
//! ## Constraints
//!
//! - No I/O outside `export`/`formats`
//! - No logging: errors are returned, the front end reports them
//! - Nothing is persisted except through an explicit export

// =============================================================================
// MODULES
// =============================================================================

pub mod age;
pub mod export;
pub mod flow;
pub mod formats;
pub mod primitives;
pub mod ratios;
pub mod roster;
pub mod session;
pub mod signature;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Age, HeaderRecord, PersonnelRole, Ratio, RatioSet, StumpIndex, StumpRecord, ToconesError,
};

// =============================================================================
// RE-EXPORTS: Evaluation
// =============================================================================

pub use age::{age_between, calculate_age, parse_date};
pub use ratios::{calculate_ratios, compute_ratios};
pub use roster::Roster;
pub use session::Session;
pub use signature::{Point, SignaturePad, Signatures, Signer};

// =============================================================================
// RE-EXPORTS: Export and Flow
// =============================================================================

pub use export::{
    COLUMNS, Cell, Dataset, ExportReport, Exporter, QrGenerator, SpreadsheetWriter, build_dataset,
    export_file_name, qr_summary,
};
pub use flow::{
    FlowController, HeaderField, HeaderForm, MenuOption, Screen, StumpField, StumpForm,
};
pub use formats::{PngQrGenerator, XlsxSpreadsheetWriter};
