//! `sheetmatch match` — enrich an uploaded sheet from the master data.

use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;
use sheetmatch_io::{read_table, write_table};
use sheetmatch_recon::{match_against_master, ReconSummary, RowOutcome};

use crate::settings::Settings;
use crate::CliError;

/// `--json` output.
#[derive(Serialize)]
struct MatchReport<'a> {
    output: String,
    category: Option<&'a str>,
    summary: &'a ReconSummary,
    outcomes: &'a [RowOutcome],
}

pub fn cmd_match(
    settings: &Settings,
    sheet_path: PathBuf,
    category: Option<String>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let sheet = read_table(&sheet_path, settings.config.header_padding())?;
    let master = settings.open_master()?.snapshot();

    let category = category.filter(|c| !c.is_empty());
    let result = match_against_master(&master, &sheet, category.as_deref(), &settings.config)?;

    let output = output.unwrap_or_else(default_output_path);
    write_table(&result.table, &output)?;

    if json {
        let report = MatchReport {
            output: output.display().to_string(),
            category: category.as_deref(),
            summary: &result.summary,
            outcomes: &result.outcomes,
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    }

    let s = &result.summary;
    eprintln!(
        "matched {} of {} row(s) ({} strict, {} relaxed, {} unmatched)",
        s.matched(),
        s.target_rows,
        s.strict,
        s.relaxed,
        s.unmatched,
    );
    eprintln!("wrote {}", output.display());
    Ok(())
}

fn default_output_path() -> PathBuf {
    PathBuf::from(format!("匹配数据{}.xlsx", Local::now().format("%Y%m%d%H%M%S")))
}
