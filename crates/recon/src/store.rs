//! Caller-owned master dataset and its persistence seam.

use parking_lot::Mutex;

use crate::dedup::merge_upload;
use crate::error::ReconError;
use crate::filter::delete_rows;
use crate::model::{MergeOutcome, TableModel};

/// Loads and saves the accumulating master table between runs.
pub trait MasterStore {
    /// Load the persisted table. A store that has never been written returns
    /// an empty table.
    fn load(&self) -> Result<TableModel, ReconError>;

    fn save(&self, table: &TableModel) -> Result<(), ReconError>;
}

/// In-memory store, for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<TableModel>,
}

impl MemoryStore {
    pub fn new(table: TableModel) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }
}

impl MasterStore for MemoryStore {
    fn load(&self) -> Result<TableModel, ReconError> {
        Ok(self.table.lock().clone())
    }

    fn save(&self, table: &TableModel) -> Result<(), ReconError> {
        *self.table.lock() = table.clone();
        Ok(())
    }
}

/// The master dataset plus the store it persists to.
///
/// All mutations take the lock, apply the change to a copy, persist it, and
/// only then publish it, so a failed save leaves both the in-memory table and
/// the store unchanged.
pub struct SharedMaster<S: MasterStore> {
    store: S,
    table: Mutex<TableModel>,
}

impl<S: MasterStore> SharedMaster<S> {
    pub fn open(store: S) -> Result<Self, ReconError> {
        let table = store.load()?;
        log::debug!(
            "master loaded: {} column(s), {} row(s)",
            table.headers.len(),
            table.rows.len()
        );
        Ok(Self {
            store,
            table: Mutex::new(table),
        })
    }

    /// Copy of the current table.
    pub fn snapshot(&self) -> TableModel {
        self.table.lock().clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Re-read the table from the store, discarding the in-memory copy.
    pub fn reload(&self) -> Result<(), ReconError> {
        let fresh = self.store.load()?;
        *self.table.lock() = fresh;
        Ok(())
    }

    /// Merge an upload (align, header check, dedupe) and persist.
    pub fn import(&self, incoming: TableModel) -> Result<MergeOutcome, ReconError> {
        self.mutate(|table| merge_upload(table, incoming))
    }

    /// Delete rows by index and persist. Returns how many were removed.
    pub fn delete_rows(&self, ids: &[usize]) -> Result<usize, ReconError> {
        self.mutate(|table| Ok(delete_rows(table, ids)))
    }

    /// Drop every header and row and persist the empty table.
    pub fn clear(&self) -> Result<(), ReconError> {
        self.mutate(|table| {
            *table = TableModel::default();
            Ok(())
        })
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut TableModel) -> Result<T, ReconError>,
    ) -> Result<T, ReconError> {
        let mut guard = self.table.lock();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.store.save(&next)?;
        *guard = next;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl MasterStore for FailingStore {
        fn load(&self) -> Result<TableModel, ReconError> {
            Ok(TableModel::from_strs(&["a"], &[&["1"]]))
        }

        fn save(&self, _table: &TableModel) -> Result<(), ReconError> {
            Err(ReconError::Io("disk full".into()))
        }
    }

    #[test]
    fn import_persists_through_store() {
        let master = SharedMaster::open(MemoryStore::default()).unwrap();
        let upload = TableModel::from_strs(&["a", "b"], &[&["1", "2"]]);
        let out = master.import(upload.clone()).unwrap();
        assert_eq!(out.appended, 1);
        assert_eq!(master.store().load().unwrap(), upload);

        let again = master.import(upload.clone()).unwrap();
        assert_eq!(again.appended, 0);
        assert_eq!(again.duplicates, 1);
        assert_eq!(master.snapshot().rows.len(), 1);
    }

    #[test]
    fn header_mismatch_leaves_master_untouched() {
        let master = SharedMaster::open(MemoryStore::new(TableModel::from_strs(
            &["a", "b"],
            &[&["1", "2"]],
        )))
        .unwrap();
        let err = master
            .import(TableModel::from_strs(&["a", "z"], &[&["3", "4"]]))
            .unwrap_err();
        assert!(matches!(err, ReconError::HeaderMismatch { .. }));
        assert_eq!(master.snapshot().rows.len(), 1);
    }

    #[test]
    fn failed_save_is_not_published() {
        let master = SharedMaster::open(FailingStore).unwrap();
        assert!(master.delete_rows(&[0]).is_err());
        assert_eq!(master.snapshot().rows.len(), 1);
    }

    #[test]
    fn delete_and_clear() {
        let master = SharedMaster::open(MemoryStore::new(TableModel::from_strs(
            &["a"],
            &[&["1"], &["2"], &["3"]],
        )))
        .unwrap();
        assert_eq!(master.delete_rows(&[1]).unwrap(), 1);
        assert_eq!(master.snapshot().rows, vec![vec!["1"], vec!["3"]]);

        master.clear().unwrap();
        assert!(master.snapshot().is_empty());
        assert!(master.store().load().unwrap().is_empty());
    }

    #[test]
    fn reload_picks_up_store_changes() {
        let master = SharedMaster::open(MemoryStore::default()).unwrap();
        master
            .store()
            .save(&TableModel::from_strs(&["a"], &[&["9"]]))
            .unwrap();
        assert!(master.snapshot().is_empty());
        master.reload().unwrap();
        assert_eq!(master.snapshot().rows, vec![vec!["9"]]);
    }
}
