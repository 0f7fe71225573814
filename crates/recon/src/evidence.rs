use crate::model::{ReconSummary, RowOutcome};

/// Compute summary statistics from per-row outcomes.
pub fn compute_summary(outcomes: &[RowOutcome], source_rows: usize) -> ReconSummary {
    let mut strict = 0;
    let mut relaxed = 0;
    let mut unmatched = 0;

    for outcome in outcomes {
        match outcome {
            RowOutcome::Strict { .. } => strict += 1,
            RowOutcome::Relaxed { .. } => relaxed += 1,
            RowOutcome::Unmatched => unmatched += 1,
        }
    }

    ReconSummary {
        target_rows: outcomes.len(),
        source_rows,
        strict,
        relaxed,
        unmatched,
        unused_source: source_rows.saturating_sub(strict + relaxed),
    }
}
