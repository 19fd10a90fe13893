use std::{fs, path::PathBuf};

use gridfall_engine::{Snapshot, SnapshotStore, StoreError};

/// File-backed snapshot store: one JSON document at a fixed path.
///
/// Every save overwrites the whole file, so at most one game exists on disk.
/// Load failures of any kind (missing file, bad JSON, rejected record)
/// surface as "no saved game".
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SnapshotStore for FileStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_vec(snapshot).map_err(StoreError::new)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(StoreError::new)?;
        }
        fs::write(&self.path, json).map_err(StoreError::new)
    }

    fn load(&mut self) -> Option<Snapshot> {
        let bytes = fs::read(&self.path).ok()?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes).ok()?;
        snapshot.validated()
    }

    fn clear(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
