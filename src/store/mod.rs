//! Record store module
//!
//! A single JSON file mapping submission keys to form records. The file is
//! the only copy of the data: every load reads it and every append rewrites
//! it in full. Appends are serialized behind one async mutex so concurrent
//! submissions cannot lose each other's updates.

pub mod key;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::logger;
pub use key::{Clock, SystemClock};

/// One decoded form submission
pub type Record = BTreeMap<String, String>;

/// All submissions, keyed by submission time (oldest first)
pub type Records = BTreeMap<String, Record>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable record store backed by one JSON file
pub struct RecordStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Read every record from disk
    ///
    /// A missing file is an empty store. Unreadable or unparseable content is
    /// logged and also treated as empty; this never fails.
    pub fn load(&self) -> Records {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Records::new(),
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to read store {}: {e}, treating as empty",
                    self.path.display()
                ));
                return Records::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                logger::log_warning(&format!(
                    "Store {} is not a valid record collection ({e}), treating as empty",
                    self.path.display()
                ));
                Records::new()
            }
        }
    }

    /// Add one record under a fresh key and persist the whole store
    ///
    /// Returns the key the record was stored under.
    pub async fn append(&self, record: Record) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load();
        let key = key::unique_key(&records, &self.clock.now());
        records.insert(key.clone(), record);
        self.persist(&records)?;

        logger::log_debug(&format!(
            "Stored record {key} ({} total) in {}",
            records.len(),
            self.path.display()
        ));
        Ok(key)
    }

    /// Overwrite the file with `records`
    ///
    /// Writes a sibling temp file and renames it over the target so a
    /// concurrent `load` never observes a half-written document.
    fn persist(&self, records: &Records) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(records)?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
