//! Test harness for stores backed by a temporary SQLite file.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use visitdesk::db::Database;
use visitdesk::store::LocalVisitStore;

pub struct TestHarness {
    /// Keeps the directory alive for the harness lifetime.
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub event_capacity: usize,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_event_capacity(16)
    }

    pub fn with_event_capacity(event_capacity: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("visitdesk.db");
        Self {
            temp_dir,
            db_path,
            event_capacity,
        }
    }

    /// Opens a store on the harness database. Call again to simulate a restart.
    pub fn open_store(&self) -> Arc<LocalVisitStore> {
        let db = Database::open(&self.db_path).expect("Failed to open database");
        Arc::new(
            LocalVisitStore::with_database(db, self.event_capacity)
                .expect("Failed to load visits"),
        )
    }

    pub fn dir(&self) -> &std::path::Path {
        self.temp_dir.path()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
