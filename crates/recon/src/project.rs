use std::collections::BTreeSet;

use crate::model::TableModel;

/// Remove the given columns from headers and every row, keeping the order of
/// what remains. Indices past the end are ignored.
pub fn drop_columns(table: TableModel, indices: &[usize]) -> TableModel {
    if indices.is_empty() {
        return table;
    }
    let removed: BTreeSet<usize> = indices.iter().copied().collect();
    let keep = |row: Vec<String>| -> Vec<String> {
        row.into_iter()
            .enumerate()
            .filter(|(i, _)| !removed.contains(i))
            .map(|(_, c)| c)
            .collect()
    };

    TableModel {
        headers: keep(table.headers),
        rows: table.rows.into_iter().map(keep).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_columns_and_preserves_order() {
        let t = TableModel::from_strs(&["a", "b", "c", "d"], &[&["1", "2", "3", "4"]]);
        let out = drop_columns(t, &[2, 0]);
        assert_eq!(out.headers, vec!["b", "d"]);
        assert_eq!(out.rows, vec![vec!["2", "4"]]);
    }

    #[test]
    fn empty_or_out_of_range_indices_are_noops() {
        let t = TableModel::from_strs(&["a"], &[&["1"]]);
        assert_eq!(drop_columns(t.clone(), &[]), t);
        assert_eq!(drop_columns(t.clone(), &[7]), t);
    }
}
