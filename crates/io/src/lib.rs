// File I/O operations: spreadsheet grids in and out, file-backed master store

use std::path::Path;

use sheetmatch_recon::{parse_grid, HeaderPadding, ReconError, TableModel};

pub mod csv;
pub mod store;
pub mod xlsx;

pub use store::FileStore;

/// On-disk table format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat {
    /// xlsx/xlsm/xlsb/xls/ods. Written as xlsx.
    Excel,
    Csv,
    Tsv,
}

impl GridFormat {
    pub fn from_path(path: &Path) -> Result<Self, ReconError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Excel),
            "csv" => Ok(Self::Csv),
            "tsv" | "tab" => Ok(Self::Tsv),
            _ => Err(ReconError::Io(format!(
                "{}: unsupported file type (expected xlsx, xls, ods, csv or tsv)",
                path.display()
            ))),
        }
    }
}

/// Read the raw cell grid of a spreadsheet file.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<String>>, ReconError> {
    let grid = match GridFormat::from_path(path)? {
        GridFormat::Excel => xlsx::read_grid(path),
        GridFormat::Csv => csv::read_grid(path),
        GridFormat::Tsv => csv::read_grid_with_delimiter(path, b'\t'),
    };
    grid.map_err(ReconError::Io)
}

/// Read and parse a spreadsheet file into a table.
///
/// A file without a header row, or with a header row and no data, is
/// rejected with [`ReconError::ParseEmptyInput`].
pub fn read_table(path: &Path, padding: HeaderPadding) -> Result<TableModel, ReconError> {
    let grid = read_grid(path)?;
    let table = parse_grid(&grid, padding);
    if table.headers.is_empty() || table.rows.is_empty() {
        return Err(ReconError::ParseEmptyInput);
    }
    log::info!(
        "{}: {} columns, {} rows",
        path.display(),
        table.width(),
        table.row_count()
    );
    Ok(table)
}

pub fn write_table(table: &TableModel, path: &Path) -> Result<(), ReconError> {
    let result = match GridFormat::from_path(path)? {
        GridFormat::Excel => xlsx::write_table(table, path),
        GridFormat::Csv => write_delimited(table, path, b','),
        GridFormat::Tsv => write_delimited(table, path, b'\t'),
    };
    result.map_err(ReconError::Io)
}

fn write_delimited(table: &TableModel, path: &Path, delimiter: u8) -> Result<(), String> {
    let file = std::fs::File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    csv::write_table(table, std::io::BufWriter::new(file), delimiter)
}
