//! Spreadsheet files for the row interchange. Writes `.xlsx`; reads the first
//! sheet of `.xlsx` or `.xls`.

use crate::error::{ExportError, ImportError};
use crate::table::{Cell, Row, HEADERS};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::io::Cursor;
use std::path::Path;

pub const SHEET_NAME: &str = "Fishbone Diagram";
pub const EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

pub fn write_xlsx(rows: &[Row]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, h) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *h)?;
    }
    for (i, r) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, text) in [&r.category, &r.cause, &r.subcause, &r.comments].iter().enumerate() {
            if !text.is_empty() {
                sheet.write_string(row, col as u16, text.as_str())?;
            }
        }
        for (col, cell) in [(4u16, &r.x), (5, &r.y), (6, &r.spine_x)] {
            match cell {
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                Cell::Text(s) if !s.is_empty() => {
                    sheet.write_string(row, col, s.as_str())?;
                }
                _ => {}
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

fn cell_text(d: &Data) -> String {
    match d {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

fn cell_value(d: &Data) -> Cell {
    match d {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn column_of(header: &str) -> Option<usize> {
    let h: String = header
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match h.as_str() {
        "category" => Some(0),
        "cause" => Some(1),
        "subcause" | "sub-cause" => Some(2),
        "comments" | "comment" => Some(3),
        "x" => Some(4),
        "y" => Some(5),
        "spinex" => Some(6),
        _ => None,
    }
}

/// Map a sheet (header row first) to rows by header name.
pub fn rows_from_grid<'a, I>(mut grid: I) -> Result<Vec<Row>, ImportError>
where
    I: Iterator<Item = &'a [Data]>,
{
    let header = grid.find(|r| r.iter().any(|d| !matches!(d, Data::Empty)));
    let mut cols: [Option<usize>; 7] = [None; 7];
    if let Some(header) = header {
        for (i, d) in header.iter().enumerate() {
            if let Some(c) = column_of(&cell_text(d)) {
                cols[c].get_or_insert(i);
            }
        }
    }
    if cols[0].is_none() {
        return Err(ImportError::MissingColumn("Category"));
    }
    let text = |r: &[Data], c: usize| cols[c].and_then(|i| r.get(i)).map(cell_text).unwrap_or_default();
    let value = |r: &[Data], c: usize| cols[c].and_then(|i| r.get(i)).map(cell_value).unwrap_or_default();
    Ok(grid
        .map(|r| Row {
            category: text(r, 0),
            cause: text(r, 1),
            subcause: text(r, 2),
            comments: text(r, 3),
            x: value(r, 4),
            y: value(r, 5),
            spine_x: value(r, 6),
        })
        .collect())
}

pub fn read_workbook_bytes(bytes: Vec<u8>) -> Result<Vec<Row>, ImportError> {
    let mut wb =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| ImportError::Read(e.to_string()))?;
    let range = wb
        .worksheet_range_at(0)
        .ok_or(ImportError::NoSheet)?
        .map_err(|e| ImportError::Read(e.to_string()))?;
    rows_from_grid(range.rows())
}

pub fn read_workbook_path(path: &Path) -> Result<Vec<Row>, ImportError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if !EXTENSIONS.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(path.display().to_string()));
    }
    read_workbook_bytes(std::fs::read(path)?)
}
