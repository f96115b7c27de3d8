use label_pyramids_storage::{normalize_path, BlockContainer, MemoryContainer, StorageError, StorageResult};

use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A `MemoryContainer` that counts block reads and can refuse writes below one path.
#[derive(Default)]
pub struct FlakyContainer {
    inner: MemoryContainer,
    reads: AtomicUsize,
    refuse_writes_below: Option<String>,
}

impl FlakyContainer {
    pub fn refusing_writes_below(path: &str) -> Self {
        Self {
            refuse_writes_below: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn reset_reads(&self) {
        self.reads.store(0, Ordering::SeqCst);
    }
}

impl BlockContainer for FlakyContainer {
    fn location(&self) -> &str {
        self.inner.location()
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path)
    }

    fn create_group(&self, path: &str) -> StorageResult<()> {
        self.inner.create_group(path)
    }

    fn remove(&self, path: &str) -> StorageResult<()> {
        self.inner.remove(path)
    }

    fn attributes(&self, path: &str) -> StorageResult<Map<String, Value>> {
        self.inner.attributes(path)
    }

    fn set_attributes(&self, path: &str, attributes: Map<String, Value>) -> StorageResult<()> {
        self.inner.set_attributes(path, attributes)
    }

    fn read_raw(&self, path: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_raw(path, key)
    }

    fn write_raw(&self, path: &str, key: &[u8], value: &[u8]) -> StorageResult<()> {
        if let Some(refused) = self.refuse_writes_below.as_deref() {
            if normalize_path(path).starts_with(&normalize_path(refused)) {
                return Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("writes below `{}` are refused", refused),
                )));
            }
        }
        self.inner.write_raw(path, key, value)
    }

    fn list_keys(&self, path: &str) -> StorageResult<Vec<Vec<u8>>> {
        self.inner.list_keys(path)
    }
}
