//! Config discovery and `sheetmatch config`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use sheetmatch_io::FileStore;
use sheetmatch_recon::{ReconConfig, SharedMaster};

use crate::CliError;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Parse and validate a config file
    #[command(after_help = "\
Examples:
  sheetmatch config validate
  sheetmatch config validate ./config.toml")]
    Validate {
        /// Config file [default: --config, else <config dir>/sheetmatch/config.toml]
        path: Option<PathBuf>,
    },
}

/// Effective configuration for one invocation.
pub struct Settings {
    pub config: ReconConfig,
    /// File the config was read from; `None` when running on built-in defaults.
    pub source: Option<PathBuf>,
    pub data_path: PathBuf,
}

impl Settings {
    /// Open the master data file.
    pub fn open_master(&self) -> Result<SharedMaster<FileStore>, CliError> {
        let store = FileStore::new(&self.data_path).with_padding(self.config.header_padding());
        Ok(SharedMaster::open(store)?)
    }
}

/// `<config dir>/sheetmatch/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sheetmatch").join("config.toml"))
}

/// Resolve config (flag, else default location if present, else defaults)
/// and the data file (flag, else `data_file` next to the config).
pub fn load(config_flag: Option<&Path>, data_flag: Option<&Path>) -> Result<Settings, CliError> {
    let (config, source) = match config_flag {
        Some(path) => (read_config(path)?, Some(path.to_path_buf())),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => (read_config(&path)?, Some(path)),
            None => {
                log::debug!("no config file, using defaults");
                (ReconConfig::default(), None)
            }
        },
    };

    let data_path = match data_flag {
        Some(path) => path.to_path_buf(),
        None => base_dir(source.as_deref()).join(&config.data_file),
    };
    log::debug!("data file: {}", data_path.display());

    Ok(Settings { config, source, data_path })
}

fn base_dir(source: Option<&Path>) -> PathBuf {
    source
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_config(path: &Path) -> Result<ReconConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    ReconConfig::from_toml(&text).map_err(|e| {
        CliError::from(e).with_hint(format!("config file: {}", path.display()))
    })
}

pub fn cmd_config(cmd: ConfigCommands, config_flag: Option<&Path>) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Validate { path } => cmd_config_validate(path, config_flag),
    }
}

fn cmd_config_validate(path: Option<PathBuf>, config_flag: Option<&Path>) -> Result<(), CliError> {
    let path = path
        .or_else(|| config_flag.map(Path::to_path_buf))
        .or_else(|| default_config_path().filter(|p| p.exists()))
        .ok_or_else(|| {
            CliError::args("no config file to validate")
                .with_hint("pass a path, or use --config")
        })?;

    let config = read_config(&path)?;
    eprintln!(
        "{}: ok ({}, {} key field(s), match_mode {}, data file {})",
        path.display(),
        config.name,
        config.key_fields.len(),
        config.match_mode.as_str(),
        base_dir(Some(path.as_path())).join(&config.data_file).display(),
    );
    Ok(())
}
