use std::path::Path;

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::models::ContactRecord;

use super::{record_cells, EXPORT_HEADERS};

/// Table rows (excluding the header) that fit on one A4 page.
pub const ROWS_PER_PAGE: usize = 40;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN_LEFT: i64 = 40;
const TITLE_Y: i64 = 800;
const TABLE_TOP_Y: i64 = 770;
const ROW_HEIGHT: i64 = 14;
const FOOTER_Y: i64 = 30;
const TITLE_FONT_SIZE: i64 = 14;
const BODY_FONT_SIZE: i64 = 9;
/// Courier glyphs are 600/1000 em wide.
const CHAR_WIDTH_PER_MILLE: i64 = 600;
const TITLE: &str = "Contact Book";

/// Column widths in characters, matching `EXPORT_HEADERS`.
const COLUMN_WIDTHS: [usize; 6] = [6, 24, 5, 13, 34, 11];

/// Lay the listing out as a fixed-width table over as many pages as needed and
/// save it to `path`.
pub fn write_pdf(records: &[ContactRecord], path: &Path) -> Result<()> {
    let mut doc = build_document(records)?;
    doc.save(path)
        .with_context(|| format!("failed to write PDF {}", path.display()))?;
    Ok(())
}

fn build_document(records: &[ContactRecord]) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let header = format_row(EXPORT_HEADERS.iter().copied());
    let rows: Vec<String> = records
        .iter()
        .map(|record| {
            let cells = record_cells(record);
            format_row(cells.iter().map(String::as_str))
        })
        .collect();

    let mut chunks: Vec<&[String]> = rows.chunks(ROWS_PER_PAGE).collect();
    if chunks.is_empty() {
        chunks.push(&[]);
    }

    let mut kids = Vec::with_capacity(chunks.len());
    for (page_idx, chunk) in chunks.iter().enumerate() {
        let content = page_content(&header, chunk, page_idx + 1);
        let encoded = content.encode().context("failed to encode PDF page")?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = add_page(&mut doc, pages_id, content_id);
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}

fn add_page(doc: &mut Document, pages_id: ObjectId, content_id: ObjectId) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    })
}

fn page_content(header: &str, rows: &[String], page_number: usize) -> Content {
    let mut operations = Vec::new();

    let title_width = text_width(TITLE, TITLE_FONT_SIZE);
    push_text(
        &mut operations,
        TITLE,
        TITLE_FONT_SIZE,
        (PAGE_WIDTH - title_width) / 2,
        TITLE_Y,
    );

    push_text(
        &mut operations,
        header,
        BODY_FONT_SIZE,
        MARGIN_LEFT,
        TABLE_TOP_Y,
    );
    for (idx, row) in rows.iter().enumerate() {
        let y = TABLE_TOP_Y - ROW_HEIGHT * (idx as i64 + 1);
        push_text(&mut operations, row, BODY_FONT_SIZE, MARGIN_LEFT, y);
    }

    let footer = format!("Page {page_number}");
    let footer_width = text_width(&footer, BODY_FONT_SIZE);
    push_text(
        &mut operations,
        &footer,
        BODY_FONT_SIZE,
        (PAGE_WIDTH - footer_width) / 2,
        FOOTER_Y,
    );

    Content { operations }
}

fn push_text(operations: &mut Vec<Operation>, text: &str, size: i64, x: i64, y: i64) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![Object::Name(b"F1".to_vec()), Object::Integer(size)],
    ));
    operations.push(Operation::new(
        "Td",
        vec![Object::Integer(x), Object::Integer(y)],
    ));
    operations.push(Operation::new(
        "Tj",
        vec![Object::string_literal(win_ansi_bytes(text))],
    ));
    operations.push(Operation::new("ET", vec![]));
}

fn text_width(text: &str, size: i64) -> i64 {
    text.chars().count() as i64 * CHAR_WIDTH_PER_MILLE * size / 1000
}

/// Pad or cut every cell to its column width so Courier lines up the table.
fn format_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::new();
    for (cell, width) in cells.zip(COLUMN_WIDTHS) {
        let visible: String = cell.chars().take(width - 1).collect();
        let padding = width - visible.chars().count();
        line.push_str(&visible);
        line.push_str(&" ".repeat(padding));
    }
    line.trim_end().to_string()
}

/// The standard fonts only cover WinAnsi; Latin-1 code points map straight
/// through and anything else becomes `?`.
fn win_ansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}
