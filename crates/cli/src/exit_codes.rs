//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | recon            | Parsing, alignment and matching codes    |
//! | 10-19   | config           | Config file codes                        |
//! | 20-29   | io               | File read/write codes                    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `recon_exit_code` or the relevant command

use sheetmatch_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Recon (3-9)
// =============================================================================

/// Input file has no header row or no data rows.
pub const EXIT_RECON_EMPTY_INPUT: u8 = 3;

/// Upload headers cannot be aligned with the master's.
pub const EXIT_RECON_HEADER_MISMATCH: u8 = 4;

/// A key pattern selects no column in one of the tables.
pub const EXIT_RECON_KEY_NOT_FOUND: u8 = 5;

/// A key or search regex does not compile.
pub const EXIT_RECON_INVALID_PATTERN: u8 = 6;

/// `match` was run before anything was imported.
pub const EXIT_RECON_NO_MASTER: u8 = 7;

// =============================================================================
// Config (10-19)
// =============================================================================

/// Config file is not valid TOML or has unknown/mistyped fields.
pub const EXIT_CONFIG_PARSE: u8 = 10;

/// Config parsed but failed validation.
pub const EXIT_CONFIG_INVALID: u8 = 11;

// =============================================================================
// IO (20-29)
// =============================================================================

/// Cannot read or write a spreadsheet or data file.
pub const EXIT_IO: u8 = 20;

/// Map a ReconError to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ParseEmptyInput => EXIT_RECON_EMPTY_INPUT,
        ReconError::HeaderMismatch { .. } => EXIT_RECON_HEADER_MISMATCH,
        ReconError::KeyFieldNotFound { .. } => EXIT_RECON_KEY_NOT_FOUND,
        ReconError::InvalidPattern { .. } => EXIT_RECON_INVALID_PATTERN,
        ReconError::NoMasterData => EXIT_RECON_NO_MASTER,
        ReconError::ConfigParse(_) => EXIT_CONFIG_PARSE,
        ReconError::ConfigValidation(_) => EXIT_CONFIG_INVALID,
        ReconError::Io(_) => EXIT_IO,
    }
}
