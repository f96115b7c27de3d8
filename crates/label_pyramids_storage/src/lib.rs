#![allow(clippy::neg_cmp_op_on_partial_ord)]

//! Storage for chunked 3D label volumes.
//!
//! The core types are:
//!   - `Array3`: a dense array of voxels, e.g. one block
//!   - `BlockGrid`: the partition of a dataset into blocks
//!   - `LabelMultiset`: a histogram of labels, the voxel type of aggregated pyramid levels
//!
//! Blocks are persisted in a `BlockContainer`, an N5-style tree of groups and datasets with JSON attributes. There is an
//! in-memory `MemoryContainer`, and with the `sled` feature a persistent `SledContainer`. Block bytes are written by the
//! codecs in `serialization` and `label_multiset`, optionally compressed with LZ4 or Snappy.

pub mod array;
pub mod block_grid;
pub mod compression;
pub mod container;
pub mod error;
pub mod label_multiset;
pub mod serialization;
pub mod volume;

pub use array::*;
pub use block_grid::*;
pub use compression::*;
pub use container::*;
pub use error::*;
pub use label_multiset::*;
pub use serialization::*;
pub use volume::*;

#[cfg(feature = "sled")]
pub use sled;

// Hash map for short keys like node paths.
pub type SmallKeyHashMap<K, V> = ahash::AHashMap<K, V>;

pub mod prelude {
    pub use super::{
        copy_extent, is_label_data_type, read_label_volume, read_labels_in_extent, read_multiset_volume,
        read_multisets_in_extent, write_labels, Array3, BlockCompression, BlockContainer, BlockContainerExt, BlockGrid,
        ContainerKey, DataType, Dataset, DatasetAttributes, DecodeError, Entry, LabelId, LabelMultiset,
        MemoryContainer, StorageError, StorageResult, BACKGROUND, INVALID,
    };

    #[cfg(feature = "sled")]
    pub use super::SledContainer;
}
