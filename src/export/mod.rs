//! Read-only document exports of the contact listing.

mod pdf;
mod spreadsheet;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::info;

use crate::models::ContactRecord;

pub use pdf::{write_pdf, ROWS_PER_PAGE};
pub use spreadsheet::{render_xlsx, write_xlsx};

/// Column titles shared by every export format, in record field order.
pub const EXPORT_HEADERS: [&str; 6] = ["ID", "NAME", "AGE", "NATIONAL ID", "EMAIL", "PHONE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Spreadsheet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Spreadsheet => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Pdf => f.write_str("PDF"),
            ExportFormat::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

/// `DATA 2024-05-01_13-45-10.pdf` style names, one per export moment.
pub fn export_file_name(format: ExportFormat, now: DateTime<Local>) -> String {
    format!(
        "{}.{}",
        now.format("DATA %Y-%m-%d_%H-%M-%S"),
        format.extension()
    )
}

/// `dir/name`, or `dir/DATA ... (2).ext` and so on when an export from the
/// same second already sits there.
fn unused_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = name.rsplit_once('.').unwrap_or((name, ""));
    (2..)
        .map(|n| {
            if extension.is_empty() {
                dir.join(format!("{stem} ({n})"))
            } else {
                dir.join(format!("{stem} ({n}).{extension}"))
            }
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// The cells of one record as text, in `EXPORT_HEADERS` order.
pub(crate) fn record_cells(record: &ContactRecord) -> [String; 6] {
    [
        record.id.to_string(),
        record.name.clone(),
        record.age.to_string(),
        record.national_id.clone(),
        record.email.clone(),
        record.phone.clone(),
    ]
}

/// Write `records` into `dir` in the requested format and return the path of
/// the new file.
pub fn export_contacts(
    records: &[ContactRecord],
    format: ExportFormat,
    dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = unused_path(dir, &export_file_name(format, now));
    match format {
        ExportFormat::Pdf => write_pdf(records, &path)?,
        ExportFormat::Spreadsheet => write_xlsx(records, &path)?,
    }

    info!(
        "event=export module=export status=ok format={} rows={} path={}",
        format.extension(),
        records.len(),
        path.display()
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn file_name_uses_timestamp_and_extension() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 13, 45, 10).unwrap();
        assert_eq!(
            export_file_name(ExportFormat::Pdf, now),
            "DATA 2024-05-01_13-45-10.pdf"
        );
        assert_eq!(
            export_file_name(ExportFormat::Spreadsheet, now),
            "DATA 2024-05-01_13-45-10.xlsx"
        );
    }

    #[test]
    fn taken_names_get_a_counter() {
        let dir = tempfile::tempdir().unwrap();
        let name = "DATA 2024-05-01_13-45-10.pdf";
        assert_eq!(unused_path(dir.path(), name), dir.path().join(name));

        fs::write(dir.path().join(name), b"first").unwrap();
        fs::write(dir.path().join("DATA 2024-05-01_13-45-10 (2).pdf"), b"second").unwrap();
        assert_eq!(
            unused_path(dir.path(), name),
            dir.path().join("DATA 2024-05-01_13-45-10 (3).pdf")
        );
    }
}
