// sheetmatch CLI - accumulate uploads into a master sheet, enrich new sheets from it

mod exit_codes;
mod master;
mod matching;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use sheetmatch_recon::ReconError;
use tracing_subscriber::EnvFilter;

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use settings::ConfigCommands;

#[derive(Parser)]
#[command(name = "sheetmatch")]
#[command(about = "Accumulate spreadsheet uploads and enrich new sheets by key-column matching")]
#[command(version)]
struct Cli {
    /// Config file [default: <config dir>/sheetmatch/config.toml]
    #[arg(long, global = true, env = "SHEETMATCH_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Master data file, overrides `data_file` from the config
    #[arg(long, global = true, env = "SHEETMATCH_DATA", value_name = "PATH")]
    data: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a spreadsheet into the master data
    #[command(after_help = "\
Examples:
  sheetmatch import orders.xlsx
  sheetmatch import orders.xlsx --pair couriers.xlsx

With --pair, rows of the two files are joined on the merge_field column
(default: a header matching 订单.*号) before merging.")]
    Import {
        /// Spreadsheet to import (xlsx, xls, ods, csv, tsv)
        file: PathBuf,

        /// Second upload to pair with FILE on the merge key
        #[arg(long, value_name = "FILE2")]
        pair: Option<PathBuf>,
    },

    /// Enrich a spreadsheet with matching master rows
    #[command(after_help = "\
Examples:
  sheetmatch match addresses.xlsx
  sheetmatch match addresses.xlsx --category 顺丰 --output out.xlsx
  sheetmatch match addresses.csv --json

Rows are matched on key_fields (default 省, 市, 区). Rows left unmatched are
retried ignoring the last key. Each master row is used at most once.")]
    Match {
        /// Spreadsheet whose rows are to be enriched
        file: PathBuf,

        /// Only match against master rows in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Output file [default: 匹配数据<timestamp>.xlsx]
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print summary and per-row outcomes as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Print master rows as CSV (or JSON)
    #[command(after_help = "\
Examples:
  sheetmatch show
  sheetmatch show --keyword '^1001$'
  sheetmatch show --json")]
    Show {
        /// Only rows where some cell matches this regex
        #[arg(long, short = 'k')]
        keyword: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// List distinct values of the category column
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// Delete master rows by id (as printed by `show`)
    Delete {
        #[arg(required = true)]
        ids: Vec<usize>,
    },

    /// Remove all master data
    Clear,

    /// Config file commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_flag = cli.config.as_deref();
    let data_flag = cli.data.as_deref();

    // `config validate` must work on a config that fails to load
    let result = match cli.command {
        Commands::Config(cmd) => settings::cmd_config(cmd, config_flag),
        command => settings::load(config_flag, data_flag).and_then(|loaded| run(&loaded, command)),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(loaded: &settings::Settings, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Import { file, pair } => master::cmd_import(loaded, file, pair),
        Commands::Match { file, category, output, json } => {
            matching::cmd_match(loaded, file, category, output, json)
        }
        Commands::Show { keyword, json } => master::cmd_show(loaded, keyword, json),
        Commands::Categories { json } => master::cmd_categories(loaded, json),
        Commands::Delete { ids } => master::cmd_delete(loaded, &ids),
        Commands::Clear => master::cmd_clear(loaded),
        Commands::Config(cmd) => settings::cmd_config(cmd, loaded.source.as_deref()),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Failure with no more specific exit code (e.g. JSON serialization).
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::ParseEmptyInput => {
                Some("the first row must be the header row, followed by data rows".to_string())
            }
            ReconError::HeaderMismatch { .. } => {
                Some("uploads must have the same columns as the master; `sheetmatch clear` starts over".to_string())
            }
            ReconError::KeyFieldNotFound { .. } => {
                Some("check key_fields in the config against the file's header row".to_string())
            }
            ReconError::NoMasterData => Some("import data first: sheetmatch import <FILE>".to_string()),
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => {
                Some("check with: sheetmatch config validate".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }
}
