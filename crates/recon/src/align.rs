//! Column alignment between two tables that share header names.

use crate::error::ReconError;
use crate::model::TableModel;

/// Reorder `incoming`'s columns to follow `reference`'s header order.
///
/// Header-count mismatch passes `incoming` through untouched; the caller's
/// header equality check reports it. Each reference header maps to its first
/// occurrence in `incoming`, so duplicate names in `incoming` resolve
/// left-to-right and later duplicates are never read.
pub fn align_headers(reference: &TableModel, incoming: TableModel) -> Result<TableModel, ReconError> {
    if incoming.headers == reference.headers {
        return Ok(incoming);
    }
    if reference.headers.len() != incoming.headers.len() {
        log::debug!(
            "align: header count {} != {}, passing through",
            incoming.headers.len(),
            reference.headers.len()
        );
        return Ok(incoming);
    }

    let mut mapping = Vec::with_capacity(reference.headers.len());
    for name in &reference.headers {
        match incoming.headers.iter().position(|h| h == name) {
            Some(idx) => mapping.push(idx),
            None => {
                return Err(ReconError::HeaderMismatch {
                    expected: reference.headers.clone(),
                    found: incoming.headers,
                });
            }
        }
    }

    if mapping.iter().enumerate().all(|(i, &j)| i == j) {
        return Ok(incoming);
    }

    let rows = incoming
        .rows
        .into_iter()
        .map(|row| {
            mapping
                .iter()
                .map(|&j| row.get(j).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    log::debug!("align: reordered columns {:?}", mapping);
    Ok(TableModel::new(reference.headers.clone(), rows))
}
