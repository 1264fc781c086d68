use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Local, TimeZone};
use contact_book::export::ROWS_PER_PAGE;
use contact_book::{export_contacts, ContactId, ContactRecord, ExportFormat};
use lopdf::Document;
use zip::ZipArchive;

fn record(id: i64, name: &str) -> ContactRecord {
    ContactRecord {
        id: ContactId(id),
        name: name.to_string(),
        age: 22,
        national_id: "1712345678".to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "0991112233".to_string(),
    }
}

#[test]
fn pdf_export_paginates_rows() {
    let dir = tempfile::tempdir().unwrap();
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let records: Vec<ContactRecord> = (1..=ROWS_PER_PAGE as i64 + 1)
        .map(|id| record(id, "Ana"))
        .collect();

    let path = export_contacts(&records, ExportFormat::Pdf, dir.path(), now).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "DATA 2024-01-02_03-04-05.pdf"
    );
    let doc = Document::load(&path).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

fn read_entry(path: &Path, entry: &str) -> String {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut xml = String::new();
    archive
        .by_name(entry)
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[test]
fn spreadsheet_export_writes_every_cell_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let mut hostile = record(7, "María");
    hostile.email = "=HYPERLINK(\"http://evil.example\")@x.com".to_string();
    let records = vec![hostile, record(9, "Mark")];

    let path = export_contacts(
        &records,
        ExportFormat::Spreadsheet,
        &dir.path().join("out"),
        now,
    )
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "DATA 2024-01-02_03-04-05.xlsx"
    );
    let sheet = read_entry(&path, "xl/worksheets/sheet1.xml");
    assert!(!sheet.contains("<f>"));
    assert_eq!(sheet.matches("t=\"s\"").count(), 18);

    let strings = read_entry(&path, "xl/sharedStrings.xml");
    for expected in ["NATIONAL ID", "María", "=HYPERLINK(", "evil.example", "0991112233"] {
        assert!(strings.contains(expected), "missing {expected}");
    }
}

#[test]
fn exports_in_the_same_second_do_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let records = vec![record(1, "Ana")];

    let first = export_contacts(&records, ExportFormat::Pdf, dir.path(), now).unwrap();
    let second = export_contacts(&records, ExportFormat::Pdf, dir.path(), now).unwrap();

    assert_ne!(first, second);
    assert_eq!(
        second.file_name().unwrap().to_str().unwrap(),
        "DATA 2024-01-02_03-04-05 (2).pdf"
    );
    assert!(first.exists());
}
