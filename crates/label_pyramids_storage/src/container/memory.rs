use super::{is_same_or_descendant, normalize_path, path_and_ancestors, BlockContainer};
use crate::{SmallKeyHashMap, StorageError, StorageResult};

use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct Node {
    attributes: Map<String, Value>,
    values: BTreeMap<Vec<u8>, Vec<u8>>,
}

/// A `BlockContainer` that lives on the heap. Useful for tests and for pyramids that never need to outlive the process.
pub struct MemoryContainer {
    location: String,
    nodes: RwLock<SmallKeyHashMap<String, Node>>,
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContainer {
    /// An empty container with a location that no other container shares.
    pub fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);

        Self::with_location(format!("memory://{}", id))
    }

    /// An empty container that claims `location`.
    pub fn with_location(location: impl Into<String>) -> Self {
        let mut nodes = SmallKeyHashMap::default();
        nodes.insert(String::new(), Node::default());

        Self {
            location: location.into(),
            nodes: RwLock::new(nodes),
        }
    }
}

impl BlockContainer for MemoryContainer {
    fn location(&self) -> &str {
        &self.location
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.nodes.read().contains_key(&normalize_path(path)))
    }

    fn create_group(&self, path: &str) -> StorageResult<()> {
        let mut nodes = self.nodes.write();
        for p in path_and_ancestors(path) {
            nodes.entry(p).or_default();
        }

        Ok(())
    }

    fn remove(&self, path: &str) -> StorageResult<()> {
        let path = normalize_path(path);
        let mut nodes = self.nodes.write();
        nodes.retain(|p, _| !is_same_or_descendant(p, &path));
        // The root is never removed, only emptied.
        nodes.entry(String::new()).or_default();

        Ok(())
    }

    fn attributes(&self, path: &str) -> StorageResult<Map<String, Value>> {
        let path = normalize_path(path);
        let nodes = self.nodes.read();
        let node = nodes.get(&path).ok_or_else(|| StorageError::MissingPath(path.clone()))?;

        Ok(node.attributes.clone())
    }

    fn set_attributes(&self, path: &str, attributes: Map<String, Value>) -> StorageResult<()> {
        let mut nodes = self.nodes.write();
        for p in path_and_ancestors(path) {
            nodes.entry(p).or_default();
        }
        let node = nodes.entry(normalize_path(path)).or_default();
        node.attributes.extend(attributes);

        Ok(())
    }

    fn read_raw(&self, path: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let nodes = self.nodes.read();

        Ok(nodes
            .get(&normalize_path(path))
            .and_then(|node| node.values.get(key).cloned()))
    }

    fn write_raw(&self, path: &str, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let path = normalize_path(path);
        let mut nodes = self.nodes.write();
        let node = nodes
            .get_mut(&path)
            .ok_or_else(|| StorageError::MissingPath(path.clone()))?;
        node.values.insert(key.to_vec(), value.to_vec());

        Ok(())
    }

    fn list_keys(&self, path: &str) -> StorageResult<Vec<Vec<u8>>> {
        let path = normalize_path(path);
        let nodes = self.nodes.read();
        let node = nodes.get(&path).ok_or_else(|| StorageError::MissingPath(path.clone()))?;

        Ok(node.values.keys().cloned().collect())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
