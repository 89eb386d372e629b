//! # Platform Capabilities
//!
//! Where exports land and how a finished file is handed to the user.

use std::path::{Path, PathBuf};
use std::process::Command;
use tocones_core::ToconesError;

/// Folder created inside the downloads directory.
pub const APP_DIR_NAME: &str = "ToconesApp";

/// Host services the interactive flow depends on.
pub trait Platform {
    /// Directory exports are written to; created if absent.
    fn resolve_output_dir(&self) -> Result<PathBuf, ToconesError>;

    /// Hand a generated file to the user (open it with the system viewer).
    fn offer_file(&self, path: &Path) -> Result<(), ToconesError>;
}

/// Desktop implementation: downloads folder + OS file opener.
#[derive(Debug, Clone, Default)]
pub struct DesktopPlatform {
    output_dir: Option<PathBuf>,
}

impl DesktopPlatform {
    /// Use `output_dir` instead of the downloads folder when given.
    #[must_use]
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    fn candidates(&self) -> Vec<PathBuf> {
        if let Some(dir) = &self.output_dir {
            return vec![dir.clone()];
        }
        let mut found = Vec::new();
        if let Some(downloads) = dirs::download_dir() {
            found.push(downloads.join(APP_DIR_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            found.push(home.join("Downloads").join(APP_DIR_NAME));
        }
        found
    }
}

impl Platform for DesktopPlatform {
    fn resolve_output_dir(&self) -> Result<PathBuf, ToconesError> {
        let mut last_error = String::from("no downloads or home directory");
        for dir in self.candidates() {
            match std::fs::create_dir_all(&dir) {
                Ok(()) => {
                    tracing::debug!(dir = %dir.display(), "Output directory ready");
                    return Ok(dir);
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Cannot use output directory");
                    last_error = format!("'{}': {}", dir.display(), e);
                }
            }
        }
        Err(ToconesError::ExportIoError(format!(
            "No usable output directory ({})",
            last_error
        )))
    }

    fn offer_file(&self, path: &Path) -> Result<(), ToconesError> {
        tracing::info!(file = %path.display(), "Opening file");
        opener(path)
            .spawn()
            .map(|_| ())
            .map_err(|e| ToconesError::IoError(format!("Cannot open '{}': {}", path.display(), e)))
    }
}

#[cfg(target_os = "windows")]
fn opener(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(target_os = "macos")]
fn opener(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
