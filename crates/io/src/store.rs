// File-backed master store

use std::path::{Path, PathBuf};

use sheetmatch_recon::{HeaderPadding, MasterStore, ReconError, TableModel};

use crate::{read_table, write_table};

/// Persists the master table to a single spreadsheet file.
///
/// A missing file loads as an empty table. Saving an empty table removes
/// the file, so `clear` leaves nothing behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    padding: HeaderPadding,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            padding: HeaderPadding::default(),
        }
    }

    pub fn with_padding(mut self, padding: HeaderPadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MasterStore for FileStore {
    fn load(&self) -> Result<TableModel, ReconError> {
        if !self.path.exists() {
            log::debug!("{} does not exist, starting empty", self.path.display());
            return Ok(TableModel::default());
        }
        match read_table(&self.path, self.padding) {
            // Header row only: all rows were deleted earlier.
            Err(ReconError::ParseEmptyInput) => Ok(TableModel::default()),
            other => other,
        }
    }

    fn save(&self, table: &TableModel) -> Result<(), ReconError> {
        if table.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)
                    .map_err(|e| ReconError::Io(format!("{}: {}", self.path.display(), e)))?;
            }
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ReconError::Io(format!("{}: {}", parent.display(), e)))?;
        }
        write_table(table, &self.path)?;
        log::debug!("saved {} rows to {}", table.row_count(), self.path.display());
        Ok(())
    }
}
