use label_pyramids_core::prelude::*;
use label_pyramids_storage::{DecodeError, StorageError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PyramidError {
    /// Malformed neighborhoods, empty blocks, or a source that isn't a 3D label dataset.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A stored unique-label set or label-to-block mapping disagrees with the blocks it was derived from.
    #[error("inconsistent index at level {level}: {detail}")]
    InconsistentIndex { level: usize, detail: String },
    #[error("label multiset encoding error: {0}")]
    Encoding(#[from] DecodeError),
    #[error("target `{target}` overlaps source `{source_path}` in `{location}`")]
    SourceTargetCollision {
        location: String,
        source_path: String,
        target: String,
    },
    #[error("`{0}` already exists")]
    OutputExists(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Storage(StorageError),
    /// Any failure while producing one block, tagged with where it happened.
    #[error("level {level} failed at block {block:?}: {source}")]
    Block {
        level: usize,
        block: Point3i,
        source: Box<PyramidError>,
    },
    /// A failure while writing a level outside of any one block, e.g. its label-to-block mapping or attributes.
    #[error("level {level} failed: {source}")]
    Level {
        level: usize,
        source: Box<PyramidError>,
    },
}

impl PyramidError {
    pub(crate) fn in_block(self, level: usize, block: Point3i) -> Self {
        match self {
            // Already tagged by an inner task.
            e @ PyramidError::Block { .. } => e,
            e => PyramidError::Block {
                level,
                block,
                source: Box::new(e),
            },
        }
    }

    pub(crate) fn in_level(self, level: usize) -> Self {
        match self {
            // These already name their level.
            e @ (PyramidError::Block { .. } | PyramidError::Level { .. } | PyramidError::InconsistentIndex { .. }) => e,
            e => PyramidError::Level {
                level,
                source: Box::new(e),
            },
        }
    }

    /// The innermost error, skipping `Block` and `Level` tags.
    pub fn root_cause(&self) -> &PyramidError {
        match self {
            PyramidError::Block { source, .. } | PyramidError::Level { source, .. } => source.root_cause(),
            e => e,
        }
    }
}

impl From<StorageError> for PyramidError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Decode(e) => PyramidError::Encoding(e),
            e => PyramidError::Storage(e),
        }
    }
}

pub type PyramidResult<T> = Result<T, PyramidError>;

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
