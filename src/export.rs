use crate::error::{ExportError, Result};
use crate::harvest::ResultRow;
use crate::log_info;
use crate::utils::ensure_parent_dir;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

pub fn export_rows(rows: &[ResultRow], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match ExportFormat::from_path(path) {
        ExportFormat::Csv => write_csv(rows, path),
        ExportFormat::Json => save_json(rows, path),
    }
}

pub fn write_csv(rows: &[ResultRow], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path).map_err(ExportError::Csv)?;
    if rows.is_empty() {
        writer
            .write_record(ResultRow::COLUMNS)
            .map_err(ExportError::Csv)?;
    }
    for row in rows {
        writer.serialize(row).map_err(ExportError::Csv)?;
    }
    writer.flush().map_err(|source| ExportError::Flush {
        path: path.display().to_string(),
        source,
    })?;

    log_info!("[export] Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn save_json(data: &(impl serde::Serialize + ?Sized), path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let json_string = serde_json::to_string_pretty(data)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;

    log_info!("[export] Saved JSON to {}", path.display());
    Ok(())
}
