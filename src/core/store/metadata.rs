//! Path-addressed metadata store.
//!
//! The store is a tree of nested JSON mappings with two top-level
//! branches, `sections` and `chunks`. Every read goes back to the
//! backing file and every write replaces the whole document, so there
//! is no in-process cache to go stale.
//!
//! There is no locking. Two processes writing the same store can lose
//! each other's updates; a single writer is assumed.

use crate::core::error::{BinderyError, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Top-level branch holding section records
pub const SECTIONS: &str = "sections";

/// Top-level branch holding per-section chunk containers
pub const CHUNKS: &str = "chunks";

/// Top-level key recording the source document
pub const SOURCE_FILE: &str = "source_file";

/// Field holding a record's own index
pub const IDX_FIELD: &str = "idx";

/// Field stamped on records by [`MetadataStore::add`]
pub const CREATED_AT_FIELD: &str = "created_at";

/// Timestamp field name written by older stores
pub const PROCESSED_AT_FIELD: &str = "processed_at";

/// Read/merge/write access to nested key-value records.
///
/// Implementors provide whole-document `load` and `save`; navigation
/// and mutation are provided on top of them. A transactional backend
/// can override `update` without changing any caller.
pub trait MetadataStore {
    /// Load the whole document.
    ///
    /// Never fails: a missing or corrupt backing store yields the empty
    /// structure.
    fn load(&self) -> Map<String, Value>;

    /// Replace the whole persisted document
    fn save(&self, data: &Map<String, Value>) -> Result<()>;

    /// Read-merge-write the whole document in one step
    fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Map<String, Value>) -> R,
        Self: Sized,
    {
        let mut data = self.load();
        let result = f(&mut data);
        self.save(&data)?;
        Ok(result)
    }

    /// Get the value at `path`, or `None` if any segment is missing or
    /// is not a mapping
    fn get(&self, path: &[&str]) -> Option<Value> {
        let data = self.load();
        navigate(&data, path).cloned()
    }

    /// Get the value at `path`, or `default`
    fn get_or(&self, path: &[&str], default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Check whether `path` resolves to a value
    fn exists(&self, path: &[&str]) -> bool {
        self.get(path).is_some()
    }

    /// Set the value at `path`, creating intermediate mappings
    fn set(&self, path: &[&str], value: Value) -> Result<()>
    where
        Self: Sized,
    {
        let (key, parent) = split_last(path)?;
        self.update(|data| {
            let container = ensure_object_at(data, parent);
            container.insert(key.to_string(), value);
        })
    }

    /// Add `record` to the mapping at `container_path`.
    ///
    /// The key is the record's own `idx` field when present, otherwise
    /// one past the largest integer key already in the container. The
    /// assigned index is written back into the record and a creation
    /// timestamp is stamped if missing. Returns the assigned key.
    fn add(&self, container_path: &[&str], record: Value) -> Result<String>
    where
        Self: Sized,
    {
        if container_path.is_empty() {
            return Err(BinderyError::InvalidPath(
                "Container path cannot be empty".to_string(),
            ));
        }

        let Value::Object(mut record) = record else {
            return Err(BinderyError::StorageError(
                "Only mapping records can be added".to_string(),
            ));
        };

        self.update(|data| {
            let container = ensure_object_at(data, container_path);

            let idx = record
                .get(IDX_FIELD)
                .and_then(index_of)
                .unwrap_or_else(|| next_index(container));

            record.insert(IDX_FIELD.to_string(), Value::from(idx));
            if !record.contains_key(CREATED_AT_FIELD) && !record.contains_key(PROCESSED_AT_FIELD) {
                record.insert(
                    CREATED_AT_FIELD.to_string(),
                    Value::String(Utc::now().to_rfc3339()),
                );
            }

            let key = idx.to_string();
            container.insert(key.clone(), Value::Object(record));
            key
        })
    }

    /// Delete the value at `path`. Returns `false` if nothing was there.
    fn delete(&self, path: &[&str]) -> Result<bool>
    where
        Self: Sized,
    {
        let Ok((key, parent)) = split_last(path) else {
            return Ok(false);
        };

        let mut data = self.load();
        let removed = match navigate_mut(&mut data, parent) {
            Some(container) => container.remove(key).is_some(),
            None => false,
        };

        if removed {
            self.save(&data)?;
        }
        Ok(removed)
    }
}

/// Metadata store backed by a single pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct JsonMetadataStore {
    path: PathBuf,
}

impl JsonMetadataStore {
    /// Open the store at `path`, creating an empty one if missing
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };

        if !store.path.exists() {
            store.save(&empty_structure())?;
            tracing::debug!("Initialized metadata store at {:?}", store.path);
        }

        Ok(store)
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "metadata.json".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl MetadataStore for JsonMetadataStore {
    fn load(&self) -> Map<String, Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return empty_structure(),
            Err(e) => {
                tracing::warn!(
                    "Metadata store {:?} is unreadable ({}), using empty structure",
                    self.path,
                    e
                );
                return empty_structure();
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(value) => normalize(value),
            Err(e) => {
                tracing::warn!(
                    "Metadata store {:?} is corrupt ({}), using empty structure",
                    self.path,
                    e
                );
                empty_structure()
            }
        }
    }

    fn save(&self, data: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(data)?;

        // Write to a sibling temp file and rename over the target
        let temp_path = self.temp_path();
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

/// The empty store structure: `{"sections": {}, "chunks": {}}`
pub fn empty_structure() -> Map<String, Value> {
    let mut data = Map::new();
    data.insert(SECTIONS.to_string(), Value::Object(Map::new()));
    data.insert(CHUNKS.to_string(), Value::Object(Map::new()));
    data
}

/// Coerce a loaded document into the expected shape.
///
/// Missing branches are added. A branch stored as a list of records
/// carrying their own `idx` (the older layout) is folded into an
/// index-keyed mapping.
fn normalize(value: Value) -> Map<String, Value> {
    let Value::Object(mut data) = value else {
        tracing::warn!("Metadata store root is not a mapping, using empty structure");
        return empty_structure();
    };

    for branch in [SECTIONS, CHUNKS] {
        let folded = match data.remove(branch) {
            Some(Value::Object(map)) => map,
            Some(Value::Array(items)) => {
                tracing::info!("Migrating legacy list layout of '{}'", branch);
                fold_legacy_list(items)
            }
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                tracing::warn!("Metadata branch '{}' has unexpected shape, resetting", branch);
                Map::new()
            }
        };
        data.insert(branch.to_string(), Value::Object(folded));
    }

    data
}

fn fold_legacy_list(items: Vec<Value>) -> Map<String, Value> {
    let mut map = Map::new();
    for item in items {
        let key = item.get(IDX_FIELD).and_then(index_of);
        if let Some(idx) = key {
            map.insert(idx.to_string(), item);
        }
    }
    map
}

/// Interpret a JSON value as a non-negative index (number or decimal
/// string)
pub(crate) fn index_of(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// One past the largest integer-parseable key, or 0
pub(crate) fn next_index(container: &Map<String, Value>) -> usize {
    max_index(container).map_or(0, |max| max + 1)
}

/// Largest integer-parseable key
pub(crate) fn max_index(container: &Map<String, Value>) -> Option<usize> {
    container
        .keys()
        .filter_map(|key| key.parse::<usize>().ok())
        .max()
}

fn split_last<'a, 'b>(path: &'a [&'b str]) -> Result<(&'b str, &'a [&'b str])> {
    match path.split_last() {
        Some((key, parent)) => Ok((*key, parent)),
        None => Err(BinderyError::InvalidPath("Path cannot be empty".to_string())),
    }
}

fn navigate<'a>(data: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = data.get(*first)?;
    for key in rest {
        current = current.as_object()?.get(*key)?;
    }
    Some(current)
}

fn navigate_mut<'a>(
    data: &'a mut Map<String, Value>,
    path: &[&str],
) -> Option<&'a mut Map<String, Value>> {
    let mut current = data;
    for key in path {
        current = current.get_mut(*key)?.as_object_mut()?;
    }
    Some(current)
}

/// Walk `path`, creating (or replacing non-mapping values with) empty
/// mappings along the way
fn ensure_object_at<'a>(
    data: &'a mut Map<String, Value>,
    path: &[&str],
) -> &'a mut Map<String, Value> {
    let mut current = data;
    for key in path {
        let slot = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just made a mapping"),
        };
    }
    current
}
