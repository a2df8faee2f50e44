//! The persisted key-value store contract and its default implementation.
//!
//! The scan controller only consumes a get/set contract; the storage
//! mechanism behind it is a collaborator detail. [`JsonFileStore`] is the
//! default implementation: a single flat JSON object rewritten on every
//! `set`, which keeps the file human-inspectable and crash-simple.
//!
//! # Keys
//!
//! Two keys are used by the pipeline:
//!
//! - [`TARGET_FOLDER_KEY`]: the root folder of the last scan (string)
//! - [`PREVIEWS_KEY`]: the ordered preview list of the last completed or
//!   cancelled scan (array of [`PreviewRecord`])

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::types::PreviewRecord;

/// Store key holding the root folder of the most recent scan.
pub const TARGET_FOLDER_KEY: &str = "targetFolder";

/// Store key holding the ordered preview list of the most recent scan.
pub const PREVIEWS_KEY: &str = "previews";

/// The get/set contract consumed by the scan controller.
///
/// Implementations must be safe to share across tasks; the controller
/// calls `set` from its background scan task.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// A [`KeyValueStore`] backed by one JSON object file.
///
/// The whole object is kept in memory and rewritten to disk on every
/// `set`. Values survive process restarts; a missing file is an empty
/// store.
///
/// # Examples
///
/// ```no_run
/// use zs_core::{JsonFileStore, KeyValueStore};
/// use camino::Utf8Path;
///
/// let store = JsonFileStore::open(Utf8Path::new("store.json"))?;
/// store.set("targetFolder", "/library".into())?;
/// assert!(store.get("targetFolder")?.is_some());
/// # Ok::<(), zs_core::StoreError>(())
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path of the backing file.
    path: Utf8PathBuf,
    /// In-memory view of the stored object.
    data: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Opens a store at `path`, loading existing contents if the file
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if an existing file cannot be read, or
    /// [`StoreError::Json`] if its contents are not a JSON object.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_owned();
        let data = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Returns the path of the backing file.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Writes the current in-memory object to disk.
    fn flush(&self, data: &Map<String, Value>) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&Value::Object(data.clone()))?;
        std::fs::write(self.path.as_std_path(), contents)
            .map_err(|e| StoreError::io(self.path.clone(), e))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut data = self.data.lock();
        data.insert(key.to_owned(), value);
        self.flush(&data)
    }
}

/// The persisted state produced by a scan and restored at startup.
///
/// Wire layout:
/// `{ "targetFolder": string, "previews": [{path, name, thumbnail|null}] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheState {
    /// Root folder of the last scan.
    #[serde(rename = "targetFolder")]
    pub target_folder: String,

    /// Ordered preview list exactly as produced by the last completed or
    /// cancelled scan.
    pub previews: Vec<PreviewRecord>,
}

impl CacheState {
    /// Reads both persisted keys back from a store.
    ///
    /// Returns `None` when no scan has ever been persisted (the target
    /// folder key is absent). An absent preview list with a present
    /// target folder reads back as an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidLayout`] when a persisted value does
    /// not have the expected shape.
    pub fn load(store: &dyn KeyValueStore) -> Result<Option<Self>, StoreError> {
        let Some(folder) = store.get(TARGET_FOLDER_KEY)? else {
            return Ok(None);
        };
        let Value::String(target_folder) = folder else {
            return Err(StoreError::invalid_layout(
                TARGET_FOLDER_KEY,
                "expected a string",
            ));
        };

        let previews = match store.get(PREVIEWS_KEY)? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| StoreError::invalid_layout(PREVIEWS_KEY, e.to_string()))?,
            None => Vec::new(),
        };

        Ok(Some(Self {
            target_folder,
            previews,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("store.json")).unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let (_dir, store) = temp_store();
        assert!(store.get("anything").unwrap().is_none());
    }

    #[test]
    fn test_set_get_roundtrip() {
        let (_dir, store) = temp_store();
        store
            .set(TARGET_FOLDER_KEY, Value::String("/library".to_owned()))
            .unwrap();
        assert_eq!(
            store.get(TARGET_FOLDER_KEY).unwrap(),
            Some(Value::String("/library".to_owned()))
        );
    }

    #[test]
    fn test_values_survive_reopen() {
        let (_dir, store) = temp_store();
        store.set("key", Value::from(42)).unwrap();
        let path = store.path().to_owned();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("key").unwrap(), Some(Value::from(42)));
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let (_dir, store) = temp_store();
        store.set("key", Value::from("old")).unwrap();
        store.set("key", Value::from("new")).unwrap();
        assert_eq!(store.get("key").unwrap(), Some(Value::from("new")));
    }

    #[test]
    fn test_cache_state_absent_when_never_persisted() {
        let (_dir, store) = temp_store();
        assert_eq!(CacheState::load(&store).unwrap(), None);
    }

    #[test]
    fn test_cache_state_roundtrip() {
        let (_dir, store) = temp_store();
        let previews = vec![
            PreviewRecord::new(Utf8PathBuf::from("/library/a.zip"), None),
            PreviewRecord::new(Utf8PathBuf::from("/library/b.zip"), None),
        ];
        store
            .set(TARGET_FOLDER_KEY, Value::String("/library".to_owned()))
            .unwrap();
        store
            .set(PREVIEWS_KEY, serde_json::to_value(&previews).unwrap())
            .unwrap();

        let state = CacheState::load(&store).unwrap().unwrap();
        assert_eq!(state.target_folder, "/library");
        assert_eq!(state.previews, previews);
    }

    #[test]
    fn test_cache_state_rejects_malformed_previews() {
        let (_dir, store) = temp_store();
        store
            .set(TARGET_FOLDER_KEY, Value::String("/library".to_owned()))
            .unwrap();
        store.set(PREVIEWS_KEY, Value::from("not an array")).unwrap();

        let err = CacheState::load(&store).unwrap_err();
        assert!(matches!(err, StoreError::InvalidLayout { .. }));
    }
}
