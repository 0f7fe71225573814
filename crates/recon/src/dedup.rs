//! Accumulating rows into the master dataset without duplicates.

use std::collections::HashSet;

use crate::align::align_headers;
use crate::error::ReconError;
use crate::model::{MergeOutcome, TableModel};

/// Append each incoming row unless an identical row is already present.
///
/// Identity is exact, order-sensitive cell equality. Rows appended earlier in
/// the same call count as present, so a row repeated within one upload is
/// kept once. Headers are assumed to match; see [`merge_upload`].
pub fn append_distinct(accumulated: &mut TableModel, incoming: Vec<Vec<String>>) -> MergeOutcome {
    let mut seen: HashSet<Vec<String>> = accumulated.rows.iter().cloned().collect();
    let mut outcome = MergeOutcome::default();

    for row in incoming {
        if seen.contains(&row) {
            outcome.duplicates += 1;
            continue;
        }
        seen.insert(row.clone());
        accumulated.rows.push(row);
        outcome.appended += 1;
    }

    outcome
}

/// Align, verify, and deduplicate one upload into the accumulated dataset.
///
/// An accumulated table without headers adopts the incoming headers. Otherwise
/// the upload is aligned to the accumulated column order and its headers must
/// then be identical, element for element.
pub fn merge_upload(
    accumulated: &mut TableModel,
    incoming: TableModel,
) -> Result<MergeOutcome, ReconError> {
    let outcome = if accumulated.headers.is_empty() {
        accumulated.headers = incoming.headers;
        append_distinct(accumulated, incoming.rows)
    } else {
        let aligned = align_headers(accumulated, incoming)?;
        if aligned.headers != accumulated.headers {
            return Err(ReconError::HeaderMismatch {
                expected: accumulated.headers.clone(),
                found: aligned.headers,
            });
        }
        append_distinct(accumulated, aligned.rows)
    };
    log::info!(
        "merged upload: {} appended, {} duplicate(s) skipped, {} total",
        outcome.appended,
        outcome.duplicates,
        accumulated.rows.len()
    );
    Ok(outcome)
}
