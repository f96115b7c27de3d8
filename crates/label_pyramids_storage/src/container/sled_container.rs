use super::{is_same_or_descendant, normalize_path, path_and_ancestors, BlockContainer};
use crate::{StorageError, StorageResult};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use sled::{Batch, Tree};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

static NEXT_TEMPORARY_ID: AtomicUsize = AtomicUsize::new(0);

const EMPTY_ATTRIBUTES: &[u8] = b"{}";

/// A persistent, crash-consistent `BlockContainer`, backed by the `sled` crate.
///
/// Attributes live in one tree, keyed by path. Keyed values live in another, keyed by the path, a zero byte, and the value's
/// key. Because `sled` orders keys by bytes, all values of one node are contiguous and come out in key order.
pub struct SledContainer {
    db: sled::Db,
    attributes: Tree,
    values: Tree,
    location: String,
    // Serializes the read-modify-write of attribute merges.
    attribute_lock: Mutex<()>,
}

impl SledContainer {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let location = path.as_ref().display().to_string();
        let db = sled::open(path)?;
        debug!(%location, recovered = db.was_recovered(), "opened sled container");

        Self::from_db(db, location)
    }

    /// A database that is deleted when dropped.
    pub fn temporary() -> StorageResult<Self> {
        let db = sled::Config::default()
            .temporary(true)
            .use_compression(false)
            .mode(sled::Mode::LowSpace)
            .open()?;
        let id = NEXT_TEMPORARY_ID.fetch_add(1, Ordering::Relaxed);

        Self::from_db(db, format!("sled-temporary://{}", id))
    }

    pub fn from_db(db: sled::Db, location: impl Into<String>) -> StorageResult<Self> {
        let attributes = db.open_tree("attributes")?;
        let values = db.open_tree("values")?;
        let _ = attributes.compare_and_swap(b"", None as Option<&[u8]>, Some(EMPTY_ATTRIBUTES))?;

        Ok(Self {
            db,
            attributes,
            values,
            location: location.into(),
            attribute_lock: Mutex::new(()),
        })
    }

    pub fn db(&self) -> &sled::Db {
        &self.db
    }

    pub fn flush(&self) -> StorageResult<usize> {
        Ok(self.db.flush()?)
    }

    fn value_prefix(path: &str) -> Vec<u8> {
        let mut prefix = path.as_bytes().to_vec();
        prefix.push(0);

        prefix
    }

    fn value_key(path: &str, key: &[u8]) -> Vec<u8> {
        let mut full_key = Self::value_prefix(path);
        full_key.extend_from_slice(key);

        full_key
    }

    fn ensure_groups(&self, path: &str) -> StorageResult<()> {
        for p in path_and_ancestors(path) {
            let _ = self
                .attributes
                .compare_and_swap(p.as_bytes(), None as Option<&[u8]>, Some(EMPTY_ATTRIBUTES))?;
        }

        Ok(())
    }
}

impl BlockContainer for SledContainer {
    fn location(&self) -> &str {
        &self.location
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.attributes.contains_key(normalize_path(path).as_bytes())?)
    }

    fn create_group(&self, path: &str) -> StorageResult<()> {
        self.ensure_groups(path)
    }

    fn remove(&self, path: &str) -> StorageResult<()> {
        let path = normalize_path(path);

        let mut removed_nodes = Vec::new();
        for kv in self.attributes.scan_prefix(path.as_bytes()) {
            let (key, _) = kv?;
            let node = String::from_utf8_lossy(&key).into_owned();
            if is_same_or_descendant(&node, &path) {
                removed_nodes.push(node);
            }
        }

        let mut value_batch = Batch::default();
        for node in removed_nodes.iter() {
            for kv in self.values.scan_prefix(Self::value_prefix(node)) {
                let (key, _) = kv?;
                value_batch.remove(key);
            }
        }
        self.values.apply_batch(value_batch)?;

        let mut attribute_batch = Batch::default();
        for node in removed_nodes.iter().filter(|node| !node.is_empty()) {
            attribute_batch.remove(node.as_bytes());
        }
        if path.is_empty() {
            attribute_batch.insert(b"" as &[u8], EMPTY_ATTRIBUTES);
        }
        self.attributes.apply_batch(attribute_batch)?;

        Ok(())
    }

    fn attributes(&self, path: &str) -> StorageResult<Map<String, Value>> {
        let path = normalize_path(path);
        let bytes = self
            .attributes
            .get(path.as_bytes())?
            .ok_or_else(|| StorageError::MissingPath(path.clone()))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn set_attributes(&self, path: &str, attributes: Map<String, Value>) -> StorageResult<()> {
        let _lock = self.attribute_lock.lock();

        self.ensure_groups(path)?;
        let mut merged = self.attributes(path)?;
        merged.extend(attributes);
        self.attributes
            .insert(normalize_path(path).as_bytes(), serde_json::to_vec(&merged)?)?;

        Ok(())
    }

    fn read_raw(&self, path: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let value = self.values.get(Self::value_key(&normalize_path(path), key))?;

        Ok(value.map(|v| v.to_vec()))
    }

    fn write_raw(&self, path: &str, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let path = normalize_path(path);
        if !self.exists(&path)? {
            return Err(StorageError::MissingPath(path));
        }
        self.values.insert(Self::value_key(&path, key), value)?;

        Ok(())
    }

    fn list_keys(&self, path: &str) -> StorageResult<Vec<Vec<u8>>> {
        let path = normalize_path(path);
        if !self.exists(&path)? {
            return Err(StorageError::MissingPath(path));
        }

        let prefix = Self::value_prefix(&path);
        let mut keys = Vec::new();
        for kv in self.values.scan_prefix(&prefix) {
            let (key, _) = kv?;
            keys.push(key[prefix.len()..].to_vec());
        }

        Ok(keys)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
