// CSV/TSV grid import/export

use std::io::{Read, Write};
use std::path::Path;

use sheetmatch_recon::TableModel;

pub fn read_grid(path: &Path) -> Result<Vec<Vec<String>>, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    read_grid_from_str(&content, delimiter)
}

pub fn read_grid_with_delimiter(path: &Path, delimiter: u8) -> Result<Vec<Vec<String>>, String> {
    let content = read_file_as_utf8(path)?;
    read_grid_from_str(&content, delimiter)
}

/// Delimiters tried when sniffing, in tie-break order.
const DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Pick the delimiter that splits the header line into the most columns
/// while the following rows agree with that width. Comma when nothing splits.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(10).collect();
    let Some(header) = sample.first() else {
        return b',';
    };

    let mut best = (b',', 0usize);
    for delim in DELIMITERS {
        let width = field_count(header, delim);
        if width < 2 {
            continue;
        }
        let agreeing = sample.iter().filter(|line| field_count(line, delim) == width).count();
        let score = agreeing * width;
        if score > best.1 {
            best = (delim, score);
        }
    }
    best.0
}

/// Number of fields in a single line, honoring quotes.
fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252 exports).
/// A leading byte-order mark is removed.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    let content = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match content.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

pub fn read_grid_from_str(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        grid.push(record.iter().map(|f| f.to_string()).collect());
    }
    Ok(grid)
}

/// Write headers then rows. Rows may differ in width.
pub fn write_table<W: Write>(table: &TableModel, out: W, delimiter: u8) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(out);

    writer.write_record(&table.headers).map_err(|e| e.to_string())?;
    for row in &table.rows {
        writer.write_record(row).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}
