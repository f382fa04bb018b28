//! Persistence adapter - whole-collection JSON storage
//!
//! Each collection is one JSON array. Reads load everything, writes replace
//! everything; there are no indexes and no transactions. A collection that
//! cannot be read or parsed is treated as empty.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::error::{EsgError, Result};
use crate::models::User;

/// The persisted record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Companies,
    Activities,
    Reports,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Companies,
        Collection::Activities,
        Collection::Reports,
        Collection::Users,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Companies => "companies",
            Collection::Activities => "activities",
            Collection::Reports => "reports",
            Collection::Users => "users",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw byte storage for collections
pub trait RecordStore: Send + Sync {
    /// Serialized collection, or `None` if it was never written.
    fn read(&self, collection: Collection) -> io::Result<Option<Vec<u8>>>;

    /// Replace the serialized collection.
    fn write(&self, collection: Collection, bytes: &[u8]) -> io::Result<()>;
}

/// Load a collection, recovering to empty on any read or parse failure.
pub fn load<T: DeserializeOwned>(store: &dyn RecordStore, collection: Collection) -> Vec<T> {
    let bytes = match store.read(collection) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(%collection, error = %e, "Failed to read collection, treating as empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(records) => records,
        Err(e) => {
            warn!(%collection, error = %e, "Failed to parse collection, treating as empty");
            Vec::new()
        }
    }
}

/// Persist a whole collection.
pub fn save<T: Serialize>(
    store: &dyn RecordStore,
    collection: Collection,
    records: &[T],
) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(records)?;
    store
        .write(collection, &bytes)
        .map_err(|source| EsgError::Persistence { collection, source })?;
    debug!(%collection, records = records.len(), bytes = bytes.len(), "Saved collection");
    Ok(())
}

/// Create any collection that does not exist yet as an empty array.
///
/// Fails without writing anything further if an existing collection cannot be read.
pub fn bootstrap(store: &dyn RecordStore) -> Result<()> {
    for collection in Collection::ALL {
        match store.read(collection) {
            Ok(Some(_)) => {}
            Ok(None) => {
                match collection {
                    Collection::Users => save::<User>(store, collection, &[])?,
                    _ => save::<serde_json::Value>(store, collection, &[])?,
                }
                info!(%collection, "Initialized empty collection");
            }
            // Never overwrite a collection we could not read
            Err(source) => return Err(EsgError::Persistence { collection, source }),
        }
    }
    Ok(())
}

/// Collections stored as `<data_dir>/<name>.json`
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir).map_err(|source| EsgError::DataDir {
            path: data_dir.clone(),
            source,
        })?;
        info!(path = %data_dir.display(), "JSON store opened");
        Ok(Self { data_dir })
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, collection: Collection) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.path_for(collection)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, collection: Collection, bytes: &[u8]) -> io::Result<()> {
        // Write beside the target and rename so readers never see a partial file
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)
    }
}

/// In-process store, used for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, collection: Collection) -> io::Result<Option<Vec<u8>>> {
        let collections = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(collections.get(&collection).cloned())
    }

    fn write(&self, collection: Collection, bytes: &[u8]) -> io::Result<()> {
        let mut collections = self.collections.lock().unwrap_or_else(PoisonError::into_inner);
        collections.insert(collection, bytes.to_vec());
        Ok(())
    }
}
