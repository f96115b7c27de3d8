use crate::DataType;

use label_pyramids_core::prelude::*;

use thiserror::Error;

/// A binary buffer that does not decode into the value it claims to hold. Never papered over with a default value.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    #[error("buffer ended at byte {offset} while reading {what}")]
    Truncated { what: &'static str, offset: usize },
    #[error("list offset {offset} of voxel {voxel} is outside of the {len} bytes of list data")]
    OffsetOutOfRange { voxel: usize, offset: usize, len: usize },
    #[error("multiset of voxel {voxel} is not canonical: {reason}")]
    NonCanonical { voxel: usize, reason: &'static str },
    #[error("voxel {voxel} stores argmax {stored} but its multiset says {computed}")]
    ArgMaxMismatch {
        voxel: usize,
        stored: u64,
        computed: u64,
    },
    #[error("{trailing} trailing bytes after {what}")]
    TrailingBytes { what: &'static str, trailing: usize },
    #[error("{what} is not strictly increasing")]
    Unsorted { what: &'static str },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("attribute (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "sled")]
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("path `{0}` does not exist")]
    MissingPath(String),
    #[error("attribute `{name}` is missing at `{path}`")]
    MissingAttribute { path: String, name: String },
    #[error("attribute `{name}` of `{path}` is invalid: {reason}")]
    InvalidAttribute {
        path: String,
        name: &'static str,
        reason: String,
    },
    #[error("`{0}` exists but is not a dataset")]
    NotADataset(String),
    #[error("block {block:?} of `{path}` should have shape {expected:?} but holds {actual} values")]
    BlockShapeMismatch {
        path: String,
        block: Point3i,
        expected: Point3i,
        actual: usize,
    },
    #[error("data type `{data_type}` of `{path}` cannot be read as {expected}")]
    UnexpectedDataType {
        path: String,
        data_type: String,
        expected: &'static str,
    },
    #[error("block {block:?} of `{path}` was never written")]
    MissingBlock { path: String, block: Point3i },
    #[error("blocks are {0} compressed, but support for it was not compiled in")]
    CompressionUnavailable(&'static str),
    #[error("{what} of length {len} does not fit a 32-bit length field")]
    TooLong { what: &'static str, len: usize },
    #[error("label {value} does not fit in {data_type}")]
    ValueOutOfRange { value: u64, data_type: DataType },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type StorageResult<T> = Result<T, StorageError>;
