//! # Output Formats
//!
//! Concrete backends for the export traits:
//! - `xlsx` → spreadsheet writer (rust_xlsxwriter)
//! - `qr` → QR code PNG generator (qrcode + image)
//!
//! Both write straight to the given path; directory resolution is the
//! caller's concern.

mod qr;
mod xlsx;

pub use qr::PngQrGenerator;
pub use xlsx::{SIGNATURE_SHEET_NAME, TABLE_SHEET_NAME, XlsxSpreadsheetWriter};
