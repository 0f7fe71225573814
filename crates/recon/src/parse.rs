//! Raw grid → [`TableModel`].

use serde::Deserialize;

use crate::model::{is_blank_row, TableModel};

/// What to do with a header row narrower than the widest data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPadding {
    /// Pad headers with "" so every row is exactly header-width.
    #[default]
    Pad,
    /// Leave headers as read; data rows may be wider than the header.
    Preserve,
}

/// Parse a rectangular-ish grid of cells. Row 0 is the header row.
///
/// Every cell is trimmed, structurally blank data rows are dropped, and kept
/// rows are right-padded to the widest of (header, any kept row). An empty
/// grid yields an empty table; callers that need a header row must check.
pub fn parse_grid<R, S>(grid: &[R], padding: HeaderPadding) -> TableModel
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut rows = grid.iter().map(|row| {
        row.as_ref()
            .iter()
            .map(|cell| cell.as_ref().trim().to_string())
            .collect::<Vec<String>>()
    });

    let Some(mut headers) = rows.next() else {
        return TableModel::default();
    };

    let mut kept: Vec<Vec<String>> = Vec::new();
    let mut dropped = 0usize;
    let mut max_width = headers.len();

    for row in rows {
        if is_blank_row(&row) {
            dropped += 1;
            continue;
        }
        max_width = max_width.max(row.len());
        kept.push(row);
    }

    for row in &mut kept {
        row.resize(max_width, String::new());
    }

    if padding == HeaderPadding::Pad && headers.len() < max_width {
        log::debug!("padding header row from {} to {} columns", headers.len(), max_width);
        headers.resize(max_width, String::new());
    }

    log::debug!(
        "parsed grid: {} header(s), {} row(s) kept, {} blank row(s) dropped",
        headers.len(),
        kept.len(),
        dropped
    );

    TableModel::new(headers, kept)
}

/// Remove every row with an empty cell or a literal `null` (any case).
///
/// Import-time filter: uploads are expected to be fully populated, and a
/// spreadsheet export that writes `NULL` for missing values counts as missing.
/// Returns the number of rows removed.
pub fn drop_incomplete_rows(table: &mut TableModel) -> usize {
    let before = table.rows.len();
    table.rows.retain(|row| {
        row.iter().all(|cell| {
            let c = cell.trim();
            !c.is_empty() && !c.eq_ignore_ascii_case("null")
        })
    });
    let removed = before - table.rows.len();
    if removed > 0 {
        log::info!("dropped {removed} incomplete row(s)");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn trims_and_drops_blank_rows() {
        let g = grid(&[
            &[" OrderNo ", "City"],
            &["A1 ", "  Beijing"],
            &["   ", ""],
            &[],
            &["A2", "Shanghai"],
        ]);
        let t = parse_grid(&g, HeaderPadding::Pad);
        assert_eq!(t.headers, vec!["OrderNo", "City"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0], vec!["A1", "Beijing"]);
        assert_eq!(t.rows[1], vec!["A2", "Shanghai"]);
    }

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let g = grid(&[&["a", "b", "c"], &["1"], &["1", "2"]]);
        let t = parse_grid(&g, HeaderPadding::Pad);
        for row in &t.rows {
            assert_eq!(row.len(), 3);
        }
        assert_eq!(t.rows[0], vec!["1", "", ""]);
    }

    #[test]
    fn wide_row_pads_header_when_requested() {
        let g = grid(&[&["a"], &["1", "2", "3"], &["4"]]);
        let t = parse_grid(&g, HeaderPadding::Pad);
        assert_eq!(t.headers, vec!["a", "", ""]);
        assert!(t.rows.iter().all(|r| r.len() == t.headers.len()));
    }

    #[test]
    fn wide_row_keeps_short_header_when_preserving() {
        let g = grid(&[&["a"], &["1", "2", "3"], &["4"]]);
        let t = parse_grid(&g, HeaderPadding::Preserve);
        assert_eq!(t.headers, vec!["a"]);
        // Data rows are still uniform among themselves.
        assert_eq!(t.rows[0].len(), 3);
        assert_eq!(t.rows[1], vec!["4", "", ""]);
    }

    #[test]
    fn whitespace_only_row_of_any_width_is_blank() {
        let g = grid(&[&["a"], &["", "  ", "\t", ""]]);
        let t = parse_grid(&g, HeaderPadding::Pad);
        assert!(t.rows.is_empty());
        // Dropped rows do not contribute to width.
        assert_eq!(t.headers, vec!["a"]);
    }

    #[test]
    fn empty_grid_is_empty_table() {
        let g: Vec<Vec<String>> = Vec::new();
        let t = parse_grid(&g, HeaderPadding::Pad);
        assert!(t.is_empty());
    }

    #[test]
    fn header_only_grid() {
        let g = grid(&[&["a", "b"]]);
        let t = parse_grid(&g, HeaderPadding::Pad);
        assert_eq!(t.headers, vec!["a", "b"]);
        assert!(t.rows.is_empty());
    }

    #[test]
    fn incomplete_rows_are_removed() {
        let mut t = TableModel::from_strs(
            &["a", "b"],
            &[&["1", "2"], &["3", ""], &["NULL", "4"], &["5", "null "], &["6", "7"]],
        );
        let removed = drop_incomplete_rows(&mut t);
        assert_eq!(removed, 3);
        assert_eq!(t.rows, vec![vec!["1", "2"], vec!["6", "7"]]);
    }

    #[test]
    fn nullable_text_inside_value_is_kept() {
        let mut t = TableModel::from_strs(&["a"], &[&["nullable"]]);
        assert_eq!(drop_incomplete_rows(&mut t), 0);
    }
}
