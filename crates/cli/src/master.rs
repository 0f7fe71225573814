//! Master data commands: import, show, categories, delete, clear.

use std::path::PathBuf;

use sheetmatch_io::read_table;
use sheetmatch_recon::filter::{distinct_values, search_row_ids};
use sheetmatch_recon::parse::drop_incomplete_rows;
use sheetmatch_recon::{pair_uploads, TableModel};

use crate::settings::Settings;
use crate::CliError;

pub fn cmd_import(settings: &Settings, file: PathBuf, pair: Option<PathBuf>) -> Result<(), CliError> {
    let config = &settings.config;
    let padding = config.header_padding();

    let first = read_table(&file, padding)?;
    let mut upload = match pair {
        Some(second_path) => {
            let second = read_table(&second_path, padding)?;
            let paired = pair_uploads(&first, &second, config.merge_pattern()?)?;
            eprintln!(
                "paired {} with {}: {} of {} rows matched on \"{}\"",
                second_path.display(),
                file.display(),
                paired.summary.matched(),
                paired.summary.target_rows,
                config.merge_field,
            );
            paired.table
        }
        None => first,
    };

    if config.drop_incomplete_rows {
        let dropped = drop_incomplete_rows(&mut upload);
        if dropped > 0 {
            eprintln!("skipped {dropped} row(s) with empty or null cells");
        }
    }

    let master = settings.open_master()?;
    let outcome = master.import(upload)?;
    eprintln!(
        "imported {}: {} new row(s), {} duplicate(s); master has {} row(s)",
        file.display(),
        outcome.appended,
        outcome.duplicates,
        master.snapshot().row_count(),
    );
    Ok(())
}

pub fn cmd_show(settings: &Settings, keyword: Option<String>, json: bool) -> Result<(), CliError> {
    let table = settings.open_master()?.snapshot();
    let ids = search_row_ids(&table, keyword.as_deref().unwrap_or(""))?;

    if json {
        let rows: Vec<serde_json::Value> = ids
            .iter()
            .map(|&id| serde_json::json!({ "id": id, "cells": table.rows[id] }))
            .collect();
        let out = serde_json::json!({ "headers": table.headers, "rows": rows });
        let text = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    } else {
        // Ids first so they can be passed to `delete`
        let mut headers = vec!["id".to_string()];
        headers.extend(table.headers.iter().cloned());
        let rows = ids
            .iter()
            .map(|&id| {
                let mut row = vec![id.to_string()];
                row.extend(table.rows[id].iter().cloned());
                row
            })
            .collect();
        let listing = TableModel::new(headers, rows);
        sheetmatch_io::csv::write_table(&listing, std::io::stdout().lock(), b',')
            .map_err(CliError::io)?;
    }

    eprintln!("{} of {} row(s)", ids.len(), table.row_count());
    Ok(())
}

pub fn cmd_categories(settings: &Settings, json: bool) -> Result<(), CliError> {
    let table = settings.open_master()?.snapshot();
    let column = &settings.config.category_column;
    if !table.headers.is_empty() && table.column_index(column).is_none() {
        log::warn!("master has no \"{column}\" column");
    }

    let values = distinct_values(&table, column);
    if json {
        let text = serde_json::to_string_pretty(&values)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{text}");
    } else {
        for value in &values {
            println!("{value}");
        }
    }
    Ok(())
}

pub fn cmd_delete(settings: &Settings, ids: &[usize]) -> Result<(), CliError> {
    let master = settings.open_master()?;
    let removed = master.delete_rows(ids)?;
    if removed < ids.len() {
        log::warn!("{} id(s) were repeated or out of range", ids.len() - removed);
    }
    eprintln!(
        "deleted {removed} row(s); master has {} row(s)",
        master.snapshot().row_count()
    );
    Ok(())
}

pub fn cmd_clear(settings: &Settings) -> Result<(), CliError> {
    settings.open_master()?.clear()?;
    eprintln!("cleared {}", settings.data_path.display());
    Ok(())
}
