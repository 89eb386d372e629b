//! QR code generator backed by `qrcode`, rendered to PNG with `image`.

use crate::ToconesError;
use crate::export::QrGenerator;
use image::Luma;
use qrcode::QrCode;
use std::path::Path;

/// Default pixel size of one QR module.
pub const DEFAULT_MODULE_SIZE: u32 = 10;

/// Renders black-on-white QR codes with a 4-module quiet zone.
#[derive(Debug, Clone)]
pub struct PngQrGenerator {
    module_size: u32,
}

impl Default for PngQrGenerator {
    fn default() -> Self {
        Self {
            module_size: DEFAULT_MODULE_SIZE,
        }
    }
}

impl QrGenerator for PngQrGenerator {
    fn generate(&self, text: &str, path: &Path) -> Result<(), ToconesError> {
        let code = QrCode::new(text.as_bytes())
            .map_err(|e| ToconesError::ExportIoError(format!("Encode QR: {}", e)))?;

        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        image
            .save(path)
            .map_err(|e| ToconesError::ExportIoError(format!("Write QR image: {}", e)))
    }
}
