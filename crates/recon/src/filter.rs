//! Row selection over a table: category, keyword search, deletion.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use crate::error::ReconError;
use crate::model::TableModel;

/// Keep rows whose `category_column` cell equals `value`.
///
/// An empty `value`, or a column that does not exist, returns the table as is.
pub fn filter_category(table: &TableModel, category_column: &str, value: &str) -> TableModel {
    if value.is_empty() {
        return table.clone();
    }
    let Some(idx) = table.column_index(category_column) else {
        log::warn!("category column \"{category_column}\" not found, not filtering");
        return table.clone();
    };

    let rows = table
        .rows
        .iter()
        .filter(|row| row.get(idx).map(|c| c.as_str()) == Some(value))
        .cloned()
        .collect();
    TableModel::new(table.headers.clone(), rows)
}

/// Distinct non-empty values of `column`, in order of first appearance.
pub fn distinct_values(table: &TableModel, column: &str) -> Vec<String> {
    let Some(idx) = table.column_index(column) else {
        return Vec::new();
    };
    let mut seen = HashSet::new();
    table
        .rows
        .iter()
        .filter_map(|row| row.get(idx))
        .filter(|v| !v.is_empty() && seen.insert(v.as_str()))
        .cloned()
        .collect()
}

/// Keep rows where any cell contains a match for the regex `keyword`.
pub fn search_rows(table: &TableModel, keyword: &str) -> Result<TableModel, ReconError> {
    let rows = search_row_ids(table, keyword)?
        .into_iter()
        .map(|i| table.rows[i].clone())
        .collect();
    Ok(TableModel::new(table.headers.clone(), rows))
}

/// Indices of the rows [`search_rows`] would keep, ascending.
pub fn search_row_ids(table: &TableModel, keyword: &str) -> Result<Vec<usize>, ReconError> {
    if keyword.is_empty() {
        return Ok((0..table.rows.len()).collect());
    }
    let re = Regex::new(keyword).map_err(|e| ReconError::InvalidPattern {
        pattern: keyword.to_string(),
        reason: e.to_string(),
    })?;
    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.iter().any(|c| re.is_match(c)))
        .map(|(i, _)| i)
        .collect())
}

/// Delete rows by zero-based index. Repeated and out-of-range ids are ignored.
/// Returns how many rows were removed.
pub fn delete_rows(table: &mut TableModel, ids: &[usize]) -> usize {
    let ids: BTreeSet<usize> = ids.iter().copied().filter(|&i| i < table.rows.len()).collect();
    if ids.is_empty() {
        return 0;
    }
    let mut idx = 0;
    table.rows.retain(|_| {
        let keep = !ids.contains(&idx);
        idx += 1;
        keep
    });
    ids.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn couriers() -> TableModel {
        TableModel::from_strs(
            &["订单号", "快递名称"],
            &[&["1", "SF"], &["2", "YTO"], &["3", "SF"], &["4", ""]],
        )
    }

    #[test]
    fn category_keeps_matching_rows() {
        let t = filter_category(&couriers(), "快递名称", "SF");
        assert_eq!(t.rows.len(), 2);
        assert!(t.rows.iter().all(|r| r[1] == "SF"));
        assert_eq!(t.headers, couriers().headers);
    }

    #[test]
    fn category_noops() {
        assert_eq!(filter_category(&couriers(), "快递名称", ""), couriers());
        assert_eq!(filter_category(&couriers(), "missing", "SF"), couriers());
    }

    #[test]
    fn category_unknown_value_yields_no_rows() {
        let t = filter_category(&couriers(), "快递名称", "EMS");
        assert!(t.rows.is_empty());
    }

    #[test]
    fn distinct_values_first_appearance() {
        assert_eq!(distinct_values(&couriers(), "快递名称"), vec!["SF", "YTO"]);
        assert!(distinct_values(&couriers(), "nope").is_empty());
    }

    #[test]
    fn search_any_cell() {
        let t = search_rows(&couriers(), "^Y").unwrap();
        assert_eq!(t.rows, vec![vec!["2", "YTO"]]);
        assert_eq!(search_rows(&couriers(), "").unwrap(), couriers());
        assert!(search_rows(&couriers(), "[").is_err());
    }

    #[test]
    fn search_ids_index_the_full_table() {
        assert_eq!(search_row_ids(&couriers(), "SF").unwrap(), vec![0, 2]);
        assert_eq!(search_row_ids(&couriers(), "").unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn delete_ignores_duplicates_and_out_of_range() {
        let mut t = couriers();
        let removed = delete_rows(&mut t, &[2, 0, 2, 99]);
        assert_eq!(removed, 2);
        assert_eq!(t.rows, vec![vec!["2", "YTO"], vec!["4", ""]]);
    }
}
