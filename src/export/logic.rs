// src/export/logic.rs

use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::models::activity::ActivityRecord;
use crate::ui::messages::warning;
use std::env;
use std::path::{Path, PathBuf};

/// High-level export logic.
pub struct ExportLogic;

impl ExportLogic {
    /// Where the export goes: `file` (relative paths against the current
    /// directory) or `user_activities.<ext>` in the current directory.
    pub fn resolve_path(format: ExportFormat, file: &Option<String>) -> AppResult<PathBuf> {
        let name = file.clone().unwrap_or_else(|| format.default_file_name());
        let path = Path::new(&name);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(env::current_dir()?.join(path))
        }
    }

    /// Write `records` to `path`. An empty list still produces a file
    /// (`[]` or a bare header), with a warning.
    pub fn export(
        records: &[ActivityRecord],
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<()> {
        ensure_writable(path, force)?;

        if records.is_empty() {
            warning("No activities to export.");
        }

        match format {
            ExportFormat::Json => export_json(records, path)?,
            ExportFormat::Csv => export_csv(records, path)?,
        }

        Ok(())
    }
}
