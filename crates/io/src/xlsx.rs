// Excel grid import/export (xlsx, xls, xlsb, ods in; xlsx out)

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{
    open_workbook_auto, open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader, Sheets,
};
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use sheetmatch_recon::TableModel;

/// Name of the single worksheet written on export.
pub const SHEET_NAME: &str = "Sheet1";

/// Read the first worksheet of an Excel file as a ragged grid of strings.
///
/// The grid is anchored at A1: rows and columns before the first used cell
/// come back as empty strings, so header positions match what a user sees.
/// Trailing empty cells are trimmed from each row. A workbook without
/// sheets yields an empty grid.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<String>>, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;
    first_sheet_grid(&mut workbook)
}

/// Same as [`read_grid`] for an in-memory upload.
pub fn read_grid_from_bytes(bytes: &[u8]) -> Result<Vec<Vec<String>>, String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| format!("Failed to open Excel data: {}", e))?;
    first_sheet_grid(&mut workbook)
}

fn first_sheet_grid<RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<Vec<Vec<String>>, String> {
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        log::warn!("Excel file contains no sheets");
        return Ok(Vec::new());
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let grid = range_to_grid(&range);
    log::debug!("read sheet '{}': {} rows", sheet_name, grid.len());
    Ok(grid)
}

fn range_to_grid(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut grid: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        grid.push(cells);
    }
    grid
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format_datetime(dt),
    }
}

/// Dates as `%Y-%m-%d`, with `%H:%M:%S` when the cell carries a time of day.
/// Durations, and serials outside chrono's range, stay numeric.
fn format_datetime(dt: &ExcelDateTime) -> String {
    let serial = dt.as_f64();
    if dt.is_duration() {
        return format_number(serial);
    }
    match dt.as_datetime() {
        Some(value) if serial < 1.0 => value.format("%H:%M:%S").to_string(),
        Some(value) if serial.fract() == 0.0 => value.format("%Y-%m-%d").to_string(),
        Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => format_number(serial),
    }
}

/// Integers without decimals: order numbers stored as numbers read back as "1001".
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Write a table to a single-sheet xlsx file: headers in row 1, data below.
pub fn write_table(table: &TableModel, path: &Path) -> Result<(), String> {
    let mut workbook = build_workbook(table)?;
    workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))
}

/// Serialize a table to xlsx bytes, for callers that stream the result.
pub fn table_to_bytes(table: &TableModel) -> Result<Vec<u8>, String> {
    let mut workbook = build_workbook(table)?;
    workbook
        .save_to_buffer()
        .map_err(|e| format!("Failed to serialize XLSX: {}", e))
}

fn build_workbook(table: &TableModel) -> Result<XlsxWorkbook, String> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(SHEET_NAME)
        .map_err(|e| format!("Failed to create sheet '{}': {}", SHEET_NAME, e))?;

    let lines = std::iter::once(&table.headers).chain(table.rows.iter());
    for (row_idx, line) in lines.enumerate() {
        let row = u32::try_from(row_idx).map_err(|_| format!("Too many rows: {}", row_idx))?;
        for (col_idx, value) in line.iter().enumerate() {
            // Empty cells are left unwritten
            if value.is_empty() {
                continue;
            }
            let col = u16::try_from(col_idx).map_err(|_| format!("Too many columns: {}", col_idx))?;
            worksheet
                .write_string(row, col, value)
                .map_err(|e| format!("Failed to write cell ({}, {}): {}", row_idx, col_idx, e))?;
        }
    }

    Ok(workbook)
}
