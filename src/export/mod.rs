// src/export/mod.rs

mod fs_utils;
mod json_csv;
pub mod logic;
mod model;

pub use logic::ExportLogic;
pub use model::ActivityExport;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Default output name of a JSON export.
pub const DEFAULT_EXPORT_FILE: &str = "user_activities.json";

/// Common completion message.
pub(crate) fn notify_export_success(label: &str, count: usize, path: &Path) {
    success(format!("{label} export completed: {count} activities → {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// `user_activities.<ext>`
    pub fn default_file_name(&self) -> String {
        match self {
            ExportFormat::Json => DEFAULT_EXPORT_FILE.to_string(),
            ExportFormat::Csv => format!("user_activities.{}", self.as_str()),
        }
    }
}
