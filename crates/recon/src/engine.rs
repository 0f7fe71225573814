use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::filter::filter_category;
use crate::matcher::{matching_columns, resolve_key_columns, HeaderMatcher, KeyColumns};
use crate::model::{Reconciliation, RowOutcome, TableModel};
use crate::project::drop_columns;

/// Enrich every `target` row with the columns of its matching `source` row.
///
/// Output headers are `target.headers ++ source.headers` and there is exactly
/// one output row per target row. Matching is greedy in target-row order:
///
/// 1. Strict pass: a source row matches when every key cell is non-empty and
///    equal on both sides. The earliest unconsumed source row wins.
/// 2. Relaxed pass (only with two or more keys): still-unmatched target rows
///    retry against unconsumed source rows with the last key ignored.
///
/// A source row is consumed by at most one target row. Unmatched target rows
/// are padded with one empty cell per source header.
pub fn reconcile<M: HeaderMatcher>(
    target: &TableModel,
    source: &TableModel,
    keys: &[M],
) -> Result<Reconciliation, ReconError> {
    if keys.is_empty() {
        return Err(ReconError::ConfigValidation(
            "at least one key pattern is required".into(),
        ));
    }
    let columns = resolve_key_columns(&target.headers, &source.headers, keys)?;

    let mut consumed = vec![false; source.rows.len()];
    let mut outcomes = vec![RowOutcome::Unmatched; target.rows.len()];

    for (i, row) in target.rows.iter().enumerate() {
        if let Some(j) = first_candidate(row, source, &columns, &consumed) {
            consumed[j] = true;
            outcomes[i] = RowOutcome::Strict { source_row: j };
        }
    }
    let strict = outcomes.iter().filter(|o| o.is_matched()).count();
    log::info!("strict pass: {strict}/{} target row(s) matched", target.rows.len());

    if columns.len() > 1 {
        let relaxed = &columns[..columns.len() - 1];
        let mut matched = 0usize;
        for (i, row) in target.rows.iter().enumerate() {
            if outcomes[i].is_matched() {
                continue;
            }
            if let Some(j) = first_candidate(row, source, relaxed, &consumed) {
                consumed[j] = true;
                outcomes[i] = RowOutcome::Relaxed { source_row: j };
                matched += 1;
            }
        }
        log::info!(
            "relaxed pass (ignoring \"{}\"): {matched} more row(s) matched",
            keys[keys.len() - 1].pattern()
        );
    }

    let source_width = source.headers.len();
    let mut headers = target.headers.clone();
    headers.extend(source.headers.iter().cloned());

    let rows = target
        .rows
        .iter()
        .zip(&outcomes)
        .map(|(row, outcome)| {
            let mut out = row.clone();
            match outcome.source_row() {
                Some(j) => {
                    let mut tail = source.rows[j].clone();
                    tail.resize(source_width, String::new());
                    out.extend(tail);
                }
                None => out.extend(std::iter::repeat(String::new()).take(source_width)),
            }
            out
        })
        .collect();

    let summary = compute_summary(&outcomes, source.rows.len());
    Ok(Reconciliation {
        table: TableModel::new(headers, rows),
        outcomes,
        summary,
    })
}

/// Earliest unconsumed source row whose keys all match `row`.
fn first_candidate(
    row: &[String],
    source: &TableModel,
    columns: &[KeyColumns],
    consumed: &[bool],
) -> Option<usize> {
    source
        .rows
        .iter()
        .enumerate()
        .find(|(j, candidate)| !consumed[*j] && keys_match(row, candidate, columns))
        .map(|(j, _)| j)
}

/// Empty key cells never match, not even each other.
fn keys_match(target_row: &[String], source_row: &[String], columns: &[KeyColumns]) -> bool {
    columns.iter().all(|kc| {
        let t = target_row.get(kc.target).map(|s| s.as_str()).unwrap_or("");
        let s = source_row.get(kc.source).map(|s| s.as_str()).unwrap_or("");
        !t.is_empty() && t == s
    })
}

/// Combine two uploads describing the same orders into one table.
///
/// Rows of `second` are enriched from `first` on the single `merge_key`, then
/// the key column(s) contributed by `first` are dropped so the order number
/// appears once.
pub fn pair_uploads<M: HeaderMatcher>(
    first: &TableModel,
    second: &TableModel,
    merge_key: M,
) -> Result<Reconciliation, ReconError> {
    let keys = [merge_key];
    let mut recon = reconcile(second, first, &keys)?;

    let offset = second.headers.len();
    let duplicate_keys: Vec<usize> = matching_columns(&first.headers, &keys)
        .into_iter()
        .map(|i| offset + i)
        .collect();

    recon.table = drop_columns(recon.table, &duplicate_keys);
    Ok(recon)
}

/// One-shot match of an uploaded sheet against the master dataset.
///
/// The master is first narrowed to `category` (if given) on the configured
/// category column; the sheet's rows are then enriched from it using the
/// configured key fields.
pub fn match_against_master(
    master: &TableModel,
    sheet: &TableModel,
    category: Option<&str>,
    config: &ReconConfig,
) -> Result<Reconciliation, ReconError> {
    if master.headers.is_empty() || master.rows.is_empty() {
        return Err(ReconError::NoMasterData);
    }

    let candidates = filter_category(master, &config.category_column, category.unwrap_or(""));
    log::debug!(
        "matching {} sheet row(s) against {} master row(s)",
        sheet.rows.len(),
        candidates.rows.len()
    );

    let keys = config.key_patterns()?;
    reconcile(sheet, &candidates, &keys)
}
