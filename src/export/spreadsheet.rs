use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::models::ContactRecord;

use super::{record_cells, EXPORT_HEADERS};

const SHEET_NAME: &str = "Contacts";
/// Column widths in characters, matching `EXPORT_HEADERS`.
const COLUMN_WIDTHS: [f64; 6] = [6.0, 28.0, 6.0, 14.0, 34.0, 12.0];

/// Build the workbook in memory. Every cell, numbers included, is written as
/// a string cell so nothing a user typed can turn into a formula.
pub fn render_xlsx(records: &[ContactRecord]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(records).context("failed to build spreadsheet")?;
    workbook
        .save_to_buffer()
        .context("failed to encode spreadsheet")
}

pub fn write_xlsx(records: &[ContactRecord], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(records).context("failed to build spreadsheet")?;
    workbook
        .save(path)
        .with_context(|| format!("failed to write spreadsheet {}", path.display()))
}

fn build_workbook(records: &[ContactRecord]) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, (title, width)) in EXPORT_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, width)?;
        sheet.write_string_with_format(0, col, *title, &header_format)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        for (col, cell) in record_cells(record).iter().enumerate() {
            sheet.write_string(row, col as u16, cell)?;
        }
    }

    Ok(workbook)
}
