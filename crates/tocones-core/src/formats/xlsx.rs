//! Spreadsheet writer backed by `rust_xlsxwriter`.
//!
//! Layout: a bold header row followed by one row per stump on the first
//! worksheet. Signatures that were drawn go on a second worksheet, one
//! titled image per signer.

use crate::ToconesError;
use crate::export::{Cell, Dataset, SpreadsheetWriter};
use rust_xlsxwriter::{Format, Image, Workbook, XlsxError};
use std::path::Path;

/// Name of the worksheet holding the stump table.
pub const TABLE_SHEET_NAME: &str = "Tocones";

/// Name of the worksheet holding the signature images.
pub const SIGNATURE_SHEET_NAME: &str = "Firmas";

/// Rows reserved per signature image on the signature sheet.
const ROWS_PER_SIGNATURE: u32 = 13;

fn xlsx_error(e: XlsxError) -> ToconesError {
    ToconesError::ExportIoError(format!("Write spreadsheet: {}", e))
}

/// Writes the dataset as an `.xlsx` workbook.
#[derive(Debug, Clone, Default)]
pub struct XlsxSpreadsheetWriter;

impl SpreadsheetWriter for XlsxSpreadsheetWriter {
    fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), ToconesError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        let table = workbook.add_worksheet();
        table.set_name(TABLE_SHEET_NAME).map_err(xlsx_error)?;

        for (col, name) in dataset.columns().iter().enumerate() {
            table
                .write_string_with_format(0, col as u16, *name, &bold)
                .map_err(xlsx_error)?;
        }

        for (r, row) in dataset.rows().iter().enumerate() {
            let r = r as u32 + 1;
            for (c, cell) in row.iter().enumerate() {
                let c = c as u16;
                match cell {
                    Cell::Integer(v) => table.write_number(r, c, f64::from(*v)),
                    Cell::Number(v) => table.write_number(r, c, *v),
                    Cell::Text(s) => table.write_string(r, c, s),
                }
                .map_err(xlsx_error)?;
            }
        }

        if !dataset.signature_images().is_empty() {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SIGNATURE_SHEET_NAME).map_err(xlsx_error)?;

            let mut row = 0;
            for signature in dataset.signature_images() {
                sheet
                    .write_string_with_format(row, 0, signature.title, &bold)
                    .map_err(xlsx_error)?;
                let image = Image::new_from_buffer(&signature.png).map_err(xlsx_error)?;
                sheet.insert_image(row + 1, 0, &image).map_err(xlsx_error)?;
                row += ROWS_PER_SIGNATURE;
            }
        }

        workbook.save(path).map_err(xlsx_error)
    }
}
