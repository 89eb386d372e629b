//! # Export Module
//!
//! Flattens a completed session into the evaluation spreadsheet and writes
//! the companion QR summary.
//!
//! The export is all-or-nothing:
//! - An incomplete session never reaches the writer
//! - If the spreadsheet or QR step fails, the spreadsheet file is removed
//!
//! Output encodings live in [`crate::formats`] behind the
//! [`SpreadsheetWriter`] and [`QrGenerator`] traits.

use crate::formats::{PngQrGenerator, XlsxSpreadsheetWriter};
use crate::primitives::{
    EXPORT_FILE_EXTENSION, EXPORT_FILE_PREFIX, EXPORT_TIMESTAMP_FORMAT, QR_FILE_NAME,
    SIGNATURE_CAPTURED, SIGNATURE_MISSING, STUMP_COUNT,
};
use crate::signature::{SignaturePad, Signer};
use crate::{HeaderRecord, Session, ToconesError};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

// =============================================================================
// DATASET
// =============================================================================

/// Spreadsheet columns, in order.
pub const COLUMNS: [&str; 21] = [
    "tocon",
    "finca",
    "lote",
    "especie",
    "plantacion",
    "evaluacion",
    "supervisor",
    "evaluador",
    "motosierista",
    "firma_evaluad",
    "firma_motosierista",
    "diametro",
    "altura",
    "tocon_num",
    "CT",
    "CD",
    "Ancho Bisagra (AB)",
    "Altura entre CT y CD",
    "CT/d*100",
    "CD/d*100",
    "AB/d*100",
];

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Integer(u32),
    Number(f64),
    Text(String),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }
}

/// A rendered signature to embed alongside the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureImage {
    pub title: &'static str,
    pub png: Vec<u8>,
}

/// The flat table handed to a [`SpreadsheetWriter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<Vec<Cell>>,
    signature_images: Vec<SignatureImage>,
}

impl Dataset {
    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Every cell of a named column, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let position = COLUMNS.iter().position(|c| *c == name)?;
        Some(self.rows.iter().filter_map(|r| r.get(position)).collect())
    }

    #[must_use]
    pub fn signature_images(&self) -> &[SignatureImage] {
        &self.signature_images
    }
}

fn signature_marker(pad: &SignaturePad) -> &'static str {
    if pad.is_empty() {
        SIGNATURE_MISSING
    } else {
        SIGNATURE_CAPTURED
    }
}

/// Build the 12-row dataset from a session.
///
/// Fails with `IncompleteSession` naming the first empty slot, then with
/// `MissingHeader` if the header was never saved.
pub fn build_dataset(session: &Session) -> Result<Dataset, ToconesError> {
    if let Some(missing) = session.first_missing() {
        return Err(ToconesError::IncompleteSession(missing));
    }
    let header = session.header().ok_or(ToconesError::MissingHeader)?;
    let signatures = session.signatures();

    let evaluator_marker = signature_marker(signatures.pad(Signer::Evaluator));
    let operator_marker = signature_marker(signatures.pad(Signer::ChainsawOperator));

    let mut rows = Vec::with_capacity(STUMP_COUNT);
    for (index, record) in session.stumps() {
        let record = record.ok_or(ToconesError::IncompleteSession(index))?;
        let number = u32::from(index.get());
        rows.push(vec![
            Cell::Integer(number),
            Cell::text(&header.farm),
            Cell::text(&header.plot),
            Cell::text(&header.species),
            Cell::text(header.planting_date_text()),
            Cell::text(header.evaluation_date_text()),
            Cell::text(&header.supervisor),
            Cell::text(&header.evaluator),
            Cell::text(&header.chainsaw_operator),
            Cell::text(evaluator_marker),
            Cell::text(operator_marker),
            Cell::Number(record.diameter),
            Cell::Number(record.stump_height),
            Cell::Integer(number),
            Cell::Number(record.cut_height_front),
            Cell::Number(record.cut_height_back),
            Cell::Number(record.hinge_width),
            Cell::Number(record.height_between_cuts),
            Cell::text(record.ratios.ct.to_string()),
            Cell::text(record.ratios.cd.to_string()),
            Cell::text(record.ratios.ab.to_string()),
        ]);
    }

    let mut signature_images = Vec::new();
    for signer in [Signer::Evaluator, Signer::ChainsawOperator] {
        let pad = signatures.pad(signer);
        if !pad.is_empty() {
            signature_images.push(SignatureImage {
                title: signer.title(),
                png: pad.render_png()?,
            });
        }
    }

    Ok(Dataset {
        rows,
        signature_images,
    })
}

/// Spreadsheet file name for an export started at `timestamp`.
#[must_use]
pub fn export_file_name(timestamp: NaiveDateTime) -> String {
    format!(
        "{}{}.{}",
        EXPORT_FILE_PREFIX,
        timestamp.format(EXPORT_TIMESTAMP_FORMAT),
        EXPORT_FILE_EXTENSION
    )
}

/// Text encoded in the QR image.
#[must_use]
pub fn qr_summary(header: &HeaderRecord, spreadsheet: &Path) -> String {
    format!(
        "EVALUACIÓN DE TOCONES - DATOS COMPLETOS\n\
         Finca: {}\n\
         Lote: {}\n\
         Fecha: {}\n\
         \n\
         ARCHIVO GENERADO:\n\
         {}",
        header.farm,
        header.plot,
        header.evaluation_date_text(),
        spreadsheet.display()
    )
}

// =============================================================================
// OUTPUT BACKENDS
// =============================================================================

/// Writes a dataset as one spreadsheet file.
pub trait SpreadsheetWriter {
    fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), ToconesError>;
}

/// Writes a QR code image encoding `text`.
pub trait QrGenerator {
    fn generate(&self, text: &str, path: &Path) -> Result<(), ToconesError>;
}

// =============================================================================
// EXPORTER
// =============================================================================

/// Remove a spreadsheet left by a failed export.
///
/// Returns the original error; if the file cannot be removed either, the
/// leftover path is appended to its message.
fn discard_partial(spreadsheet: &Path, error: ToconesError) -> ToconesError {
    match std::fs::remove_file(spreadsheet) {
        Ok(()) => error,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => error,
        Err(e) => {
            let detail = match error {
                ToconesError::ExportIoError(message) => message,
                other => other.to_string(),
            };
            ToconesError::ExportIoError(format!(
                "{} (partial file '{}' left behind: {})",
                detail,
                spreadsheet.display(),
                e
            ))
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub spreadsheet_path: PathBuf,
    pub qr_path: PathBuf,
    pub rows: usize,
    pub summary: String,
}

/// Runs the export against an output directory.
#[derive(Debug, Clone)]
pub struct Exporter<W = XlsxSpreadsheetWriter, Q = PngQrGenerator> {
    output_dir: PathBuf,
    writer: W,
    qr: Q,
}

impl Exporter {
    /// Exporter writing `.xlsx` + PNG QR into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_backends(
            output_dir,
            XlsxSpreadsheetWriter::default(),
            PngQrGenerator::default(),
        )
    }
}

impl<W: SpreadsheetWriter, Q: QrGenerator> Exporter<W, Q> {
    /// Exporter with explicit output backends.
    #[must_use]
    pub fn with_backends(output_dir: impl Into<PathBuf>, writer: W, qr: Q) -> Self {
        Self {
            output_dir: output_dir.into(),
            writer,
            qr,
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export a session: guard, spreadsheet, then QR summary.
    ///
    /// Nothing is written when the guard fails. When either output step
    /// fails the spreadsheet is removed again and the error is returned.
    pub fn export_session(
        &self,
        session: &Session,
        timestamp: NaiveDateTime,
    ) -> Result<ExportReport, ToconesError> {
        let dataset = build_dataset(session)?;
        let header = session.header().ok_or(ToconesError::MissingHeader)?;

        let spreadsheet_path = self.output_dir.join(export_file_name(timestamp));
        let qr_path = self.output_dir.join(QR_FILE_NAME);

        if let Err(e) = self.writer.write(&dataset, &spreadsheet_path) {
            return Err(discard_partial(&spreadsheet_path, e));
        }

        let summary = qr_summary(header, &spreadsheet_path);
        if let Err(e) = self.qr.generate(&summary, &qr_path) {
            return Err(discard_partial(&spreadsheet_path, e));
        }

        Ok(ExportReport {
            spreadsheet_path,
            qr_path,
            rows: dataset.row_count(),
            summary,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
