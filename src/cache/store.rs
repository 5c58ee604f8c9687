//! Key/value stores backing the content cache.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::RwLock,
};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use super::lock::{rw_read, rw_write};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed for `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Persistent string store addressed by key.
///
/// Implementations are shared process-wide; writers overwrite without any
/// versioning.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// In-memory store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(rw_read(&self.entries, "memory", "get").get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        rw_write(&self.entries, "memory", "set").insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as a single JSON object mapping keys to raw values.
///
/// The whole file is loaded on open and rewritten through a temporary file
/// on every `set`. An entry only becomes visible once the file holding it has
/// been written.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// JSON document is discarded with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<BTreeMap<String, String>>(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        target = "insightarc::cache::store",
                        path = %path.display(),
                        error = %err,
                        "Discarding unreadable cache file"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(StoreError::io(&path, err)),
        };

        debug!(
            target = "insightarc::cache::store",
            path = %path.display(),
            entries = entries.len(),
            "Opened cache file"
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let serialized = serde_json::to_vec(entries)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|err| StoreError::io(dir, err))?;
        tmp.write_all(&serialized)
            .map_err(|err| StoreError::io(tmp.path(), err))?;
        tmp.persist(&self.path)
            .map_err(|err| StoreError::io(&self.path, err.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(rw_read(&self.entries, "file", "get").get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = rw_write(&self.entries, "file", "set");
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
