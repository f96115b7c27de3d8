//! Hierarchical block containers in the style of N5.
//!
//! A container is a tree of groups addressed by `/`-separated paths. Every node carries a JSON object of attributes. A node
//! whose attributes describe `dimensions`, `blockSize` and `dataType` is a dataset, and it stores one value per block, keyed
//! by the block's grid position. Other nodes may also store keyed values; the label-to-block index uses this to store one
//! value per label.
//!
//! Backends only implement the untyped `BlockContainer`. Everything typed lives in `BlockContainerExt` and `Dataset`, so
//! every backend stores the same bytes.

mod memory;
#[cfg(feature = "sled")]
mod sled_container;

pub use memory::MemoryContainer;
#[cfg(feature = "sled")]
pub use sled_container::SledContainer;

use crate::{
    decode_label_values, decode_multisets, encode_label_values, encode_multisets, Array3, BlockCompression,
    BlockGrid, LabelId, LabelMultiset, StorageError, StorageResult, BACKGROUND,
};

use label_pyramids_core::prelude::*;

use auto_impl::auto_impl;
use itertools::Itertools;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::trace;

/// Untyped storage of attributes and keyed byte values under a tree of paths.
///
/// Paths are normalized with `normalize_path`, so `"a/b"`, `"/a/b/"` and `"a//b"` all name the same node. The root `""`
/// always exists.
#[auto_impl(&, Box, Arc)]
pub trait BlockContainer: Send + Sync {
    /// Identifies the storage behind this container. Two containers with the same location see the same data.
    fn location(&self) -> &str;

    fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Creates the group at `path` and all of its missing ancestors. Existing nodes are left alone.
    fn create_group(&self, path: &str) -> StorageResult<()>;

    /// Removes `path` and everything below it. Removing a missing path does nothing.
    fn remove(&self, path: &str) -> StorageResult<()>;

    /// Fails with `StorageError::MissingPath` if the node does not exist.
    fn attributes(&self, path: &str) -> StorageResult<Map<String, Value>>;

    /// Merges `attributes` into the node's attributes, replacing values with the same name. Creates the node if necessary.
    fn set_attributes(&self, path: &str, attributes: Map<String, Value>) -> StorageResult<()>;

    fn read_raw(&self, path: &str, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Fails with `StorageError::MissingPath` if the node does not exist.
    fn write_raw(&self, path: &str, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// All keys stored under `path`, in increasing byte order.
    fn list_keys(&self, path: &str) -> StorageResult<Vec<Vec<u8>>>;
}

/// Trims leading and trailing separators and collapses repeated ones.
pub fn normalize_path(path: &str) -> String {
    path.split('/').filter(|component| !component.is_empty()).join("/")
}

/// Joins path components with `/`, skipping empty ones.
pub fn join_path(parent: &str, child: &str) -> String {
    normalize_path(&format!("{}/{}", parent, child))
}

/// `path` and each of its ancestors except the root, from the top down.
pub(crate) fn path_and_ancestors(path: &str) -> Vec<String> {
    let path = normalize_path(path);
    let mut out = Vec::new();
    for (i, c) in path.char_indices() {
        if c == '/' {
            out.push(path[..i].to_string());
        }
    }
    if !path.is_empty() {
        out.push(path);
    }

    out
}

/// Returns `true` iff `path` is `ancestor` or lies below it.
pub(crate) fn is_same_or_descendant(path: &str, ancestor: &str) -> bool {
    ancestor.is_empty()
        || path == ancestor
        || (path.starts_with(ancestor) && path.as_bytes().get(ancestor.len()) == Some(&b'/'))
}

/// Returns `true` iff one of the two paths is the other or lies below it.
pub fn paths_overlap(a: &str, b: &str) -> bool {
    let (a, b) = (normalize_path(a), normalize_path(b));

    is_same_or_descendant(&a, &b) || is_same_or_descendant(&b, &a)
}

/// The element type of a dataset.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl DataType {
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DataType::Uint8 | DataType::Int8 => 1,
            DataType::Uint16 | DataType::Int16 => 2,
            DataType::Uint32 | DataType::Int32 | DataType::Float32 => 4,
            DataType::Uint64 | DataType::Int64 | DataType::Float64 => 8,
        }
    }

    /// Returns `true` for the integer types that label volumes are stored as.
    pub fn is_label(&self) -> bool {
        matches!(self, DataType::Uint64 | DataType::Uint32 | DataType::Int64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Uint8 => "uint8",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Uint64 => "uint64",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
        };

        f.write_str(name)
    }
}

/// The attributes that make a node a dataset.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAttributes {
    pub dimensions: Point3i,
    pub block_size: Point3i,
    pub data_type: DataType,
    #[serde(default)]
    pub compression: BlockCompression,
    /// Multiset datasets are declared `uint8` because their blocks are opaque byte buffers.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_label_multiset: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl DatasetAttributes {
    /// A dataset of plain `uint64` labels.
    pub fn labels(dimensions: Point3i, block_size: Point3i, compression: BlockCompression) -> Self {
        Self {
            dimensions,
            block_size,
            data_type: DataType::Uint64,
            compression,
            is_label_multiset: false,
        }
    }

    /// A dataset of label multisets.
    pub fn label_multisets(dimensions: Point3i, block_size: Point3i, compression: BlockCompression) -> Self {
        Self {
            dimensions,
            block_size,
            data_type: DataType::Uint8,
            compression,
            is_label_multiset: true,
        }
    }

    #[inline]
    pub fn grid(&self) -> BlockGrid {
        BlockGrid::new(self.dimensions, self.block_size)
    }

    fn to_attribute_map(self) -> StorageResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(StorageError::Json(serde::ser::Error::custom(format!(
                "dataset attributes serialized to {}",
                other
            )))),
        }
    }
}

/// A key of a keyed value, with a byte form whose order matches the key order.
pub trait ContainerKey: Sized {
    type KeyBytes: AsRef<[u8]>;

    fn to_key_bytes(&self) -> Self::KeyBytes;
    fn from_key_bytes(bytes: &[u8]) -> Option<Self>;
}

/// Block grid positions, ordered by `(z, y, x)`.
impl ContainerKey for Point3i {
    type KeyBytes = [u8; 12];

    #[inline]
    fn to_key_bytes(&self) -> Self::KeyBytes {
        let mut bytes = [0; 12];
        for (i, c) in self.zyx().iter().enumerate() {
            // Flipping the sign bit makes the big-endian bytes of negative coordinates sort first.
            let ordered = (*c as u32) ^ (1 << 31);
            bytes[4 * i..4 * (i + 1)].copy_from_slice(&ordered.to_be_bytes());
        }

        bytes
    }

    #[inline]
    fn from_key_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 12 {
            return None;
        }
        let mut zyx = [0; 3];
        for (i, c) in zyx.iter_mut().enumerate() {
            let mut word = [0; 4];
            word.copy_from_slice(&bytes[4 * i..4 * (i + 1)]);
            *c = (u32::from_be_bytes(word) ^ (1 << 31)) as i32;
        }

        Some(PointN([zyx[2], zyx[1], zyx[0]]))
    }
}

/// Labels.
impl ContainerKey for u64 {
    type KeyBytes = [u8; 8];

    #[inline]
    fn to_key_bytes(&self) -> Self::KeyBytes {
        self.to_be_bytes()
    }

    #[inline]
    fn from_key_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 8 {
            return None;
        }
        let mut word = [0; 8];
        word.copy_from_slice(bytes);

        Some(u64::from_be_bytes(word))
    }
}

/// Typed access on top of any `BlockContainer`.
pub trait BlockContainerExt: BlockContainer {
    fn get_attribute<T: DeserializeOwned>(&self, path: &str, name: &str) -> StorageResult<Option<T>> {
        match self.attributes(path)?.remove(name) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn require_attribute<T: DeserializeOwned>(&self, path: &str, name: &str) -> StorageResult<T> {
        self.get_attribute(path, name)?
            .ok_or_else(|| StorageError::MissingAttribute {
                path: normalize_path(path),
                name: name.to_string(),
            })
    }

    fn set_attribute<T: Serialize>(&self, path: &str, name: &str, value: &T) -> StorageResult<()> {
        let mut attributes = Map::new();
        attributes.insert(name.to_string(), serde_json::to_value(value)?);

        self.set_attributes(path, attributes)
    }

    /// Returns `true` iff `path` exists and carries dataset attributes.
    fn dataset_exists(&self, path: &str) -> StorageResult<bool> {
        if !self.exists(path)? {
            return Ok(false);
        }
        let attributes = self.attributes(path)?;

        Ok(["dimensions", "blockSize", "dataType"]
            .iter()
            .all(|name| attributes.contains_key(*name)))
    }

    fn dataset_attributes(&self, path: &str) -> StorageResult<DatasetAttributes> {
        if !self.exists(path)? {
            return Err(StorageError::MissingPath(normalize_path(path)));
        }
        if !self.dataset_exists(path)? {
            return Err(StorageError::NotADataset(normalize_path(path)));
        }

        let attributes: DatasetAttributes = serde_json::from_value(Value::Object(self.attributes(path)?))?;
        if !(attributes.block_size > Point3i::ZERO) {
            return Err(StorageError::InvalidAttribute {
                path: normalize_path(path),
                name: "blockSize",
                reason: format!("{:?} is not positive", attributes.block_size),
            });
        }
        if !(attributes.dimensions >= Point3i::ZERO) {
            return Err(StorageError::InvalidAttribute {
                path: normalize_path(path),
                name: "dimensions",
                reason: format!("{:?} is negative", attributes.dimensions),
            });
        }

        Ok(attributes)
    }

    /// Creates a dataset at `path`, or redeclares an existing one. Existing blocks are kept.
    fn create_dataset(&self, path: &str, attributes: DatasetAttributes) -> StorageResult<Dataset<'_, Self>> {
        self.create_group(path)?;
        self.set_attributes(path, attributes.to_attribute_map()?)?;

        Ok(Dataset {
            container: self,
            path: normalize_path(path),
            attributes,
        })
    }

    fn open_dataset(&self, path: &str) -> StorageResult<Dataset<'_, Self>> {
        let attributes = self.dataset_attributes(path)?;

        Ok(Dataset {
            container: self,
            path: normalize_path(path),
            attributes,
        })
    }
}

impl<C: BlockContainer + ?Sized> BlockContainerExt for C {}

/// Returns `true` iff the dataset at `path` holds labels, either plain or as multisets.
pub fn is_label_data_type<C: BlockContainer + ?Sized>(container: &C, path: &str) -> StorageResult<bool> {
    let attributes = container.dataset_attributes(path)?;

    Ok(attributes.is_label_multiset || attributes.data_type.is_label())
}

/// An open dataset. Blocks are compressed with the dataset's `compression` on their way into the container.
pub struct Dataset<'a, C: ?Sized> {
    container: &'a C,
    path: String,
    attributes: DatasetAttributes,
}

impl<'a, C: BlockContainer + ?Sized> Dataset<'a, C> {
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn attributes(&self) -> &DatasetAttributes {
        &self.attributes
    }

    #[inline]
    pub fn grid(&self) -> BlockGrid {
        self.attributes.grid()
    }

    pub fn block_exists(&self, grid_position: Point3i) -> StorageResult<bool> {
        Ok(self
            .container
            .read_raw(&self.path, grid_position.to_key_bytes().as_ref())?
            .is_some())
    }

    /// The decompressed bytes of one block, or `None` if it was never written.
    pub fn read_block_bytes(&self, grid_position: Point3i) -> StorageResult<Option<Vec<u8>>> {
        match self
            .container
            .read_raw(&self.path, grid_position.to_key_bytes().as_ref())?
        {
            Some(compressed) => Ok(Some(self.attributes.compression.decompress(&compressed)?)),
            None => Ok(None),
        }
    }

    pub fn write_block_bytes(&self, grid_position: Point3i, bytes: &[u8]) -> StorageResult<()> {
        let compressed = self.attributes.compression.compress(bytes)?;
        trace!(
            path = %self.path,
            block = ?grid_position,
            raw_len = bytes.len(),
            compressed_len = compressed.len(),
            "writing block"
        );

        self.container
            .write_raw(&self.path, grid_position.to_key_bytes().as_ref(), &compressed)
    }

    /// Reads a block of plain labels. A block that was never written holds only `BACKGROUND`.
    pub fn read_label_block(&self, grid_position: Point3i) -> StorageResult<Array3<LabelId>> {
        let extent = self.grid().block_extent(grid_position);
        if self.attributes.is_label_multiset || !self.attributes.data_type.is_label() {
            return Err(StorageError::UnexpectedDataType {
                path: self.path.clone(),
                data_type: self.data_type_name(),
                expected: "plain labels",
            });
        }

        let bytes = match self.read_block_bytes(grid_position)? {
            Some(bytes) => bytes,
            None => return Ok(Array3::fill(extent, BACKGROUND)),
        };
        let values = decode_label_values(self.attributes.data_type, &bytes)?;
        self.check_block_len(grid_position, &extent, values.len())?;

        Ok(Array3::new(extent, values))
    }

    /// Writes a block of plain labels. The array's extent must be exactly the block's extent.
    pub fn write_label_block(&self, grid_position: Point3i, block: &Array3<LabelId>) -> StorageResult<()> {
        self.check_block_extent(grid_position, block.extent())?;
        let bytes = encode_label_values(self.attributes.data_type, block.values_slice())?;

        self.write_block_bytes(grid_position, &bytes)
    }

    /// Reads a block of label multisets. Unlike plain labels, a missing multiset block is an error, because there is no
    /// multiset that could stand in for an unknown number of source voxels.
    pub fn read_multiset_block(&self, grid_position: Point3i) -> StorageResult<Array3<LabelMultiset>> {
        let extent = self.grid().block_extent(grid_position);
        if !self.attributes.is_label_multiset {
            return Err(StorageError::UnexpectedDataType {
                path: self.path.clone(),
                data_type: self.data_type_name(),
                expected: "label multisets",
            });
        }

        let bytes = self
            .read_block_bytes(grid_position)?
            .ok_or_else(|| StorageError::MissingBlock {
                path: self.path.clone(),
                block: grid_position,
            })?;
        let values = decode_multisets(&bytes)?;
        self.check_block_len(grid_position, &extent, values.len())?;

        Ok(Array3::new(extent, values))
    }

    pub fn write_multiset_block(&self, grid_position: Point3i, block: &Array3<LabelMultiset>) -> StorageResult<()> {
        self.check_block_extent(grid_position, block.extent())?;

        self.write_block_bytes(grid_position, &encode_multisets(block.values_slice())?)
    }

    fn data_type_name(&self) -> String {
        if self.attributes.is_label_multiset {
            format!("{} (label multiset)", self.attributes.data_type)
        } else {
            self.attributes.data_type.to_string()
        }
    }

    fn check_block_len(&self, grid_position: Point3i, extent: &Extent3i, len: usize) -> StorageResult<()> {
        if extent.num_points() != len {
            return Err(StorageError::BlockShapeMismatch {
                path: self.path.clone(),
                block: grid_position,
                expected: extent.shape,
                actual: len,
            });
        }

        Ok(())
    }

    fn check_block_extent(&self, grid_position: Point3i, extent: &Extent3i) -> StorageResult<()> {
        let expected = self.grid().block_extent(grid_position);
        if *extent != expected {
            return Err(StorageError::BlockShapeMismatch {
                path: self.path.clone(),
                block: grid_position,
                expected: expected.shape,
                actual: extent.num_points(),
            });
        }

        Ok(())
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn paths_are_normalized() {
        assert_eq!(normalize_path("/a//b/"), "a/b");
        assert_eq!(join_path("a/", "/b"), "a/b");
        assert_eq!(join_path("", "b"), "b");
        assert_eq!(path_and_ancestors("a/b/c"), vec!["a", "a/b", "a/b/c"]);
        assert!(path_and_ancestors("").is_empty());
    }

    #[test]
    fn descendant_check_respects_component_boundaries() {
        assert!(is_same_or_descendant("a/b", "a"));
        assert!(is_same_or_descendant("a", "a"));
        assert!(is_same_or_descendant("a", ""));
        assert!(!is_same_or_descendant("ab", "a"));

        assert!(paths_overlap("/raw/", "raw/s0"));
        assert!(paths_overlap("raw", ""));
        assert!(!paths_overlap("raw", "raw-pyramid"));
    }

    #[test]
    fn point_keys_sort_by_z_then_y_then_x() {
        let mut points = vec![
            PointN([1, 0, 0]),
            PointN([0, 0, 1]),
            PointN([0, 1, 0]),
            PointN([-1, 0, 0]),
            PointN([0, 0, -1]),
        ];
        let mut keys: Vec<_> = points.iter().map(|p| p.to_key_bytes()).collect();
        keys.sort();
        points.sort_by_key(|p| p.zyx());

        let decoded: Vec<_> = keys
            .iter()
            .map(|k| Point3i::from_key_bytes(k).unwrap())
            .collect();
        assert_eq!(decoded, points);
    }

    #[test]
    fn label_keys() {
        assert_eq!(u64::from_key_bytes(&7u64.to_key_bytes()), Some(7));
        assert_eq!(u64::from_key_bytes(&[0; 3]), None);
    }

    #[test]
    fn dataset_attributes_use_n5_names() {
        let attributes = DatasetAttributes::label_multisets(PointN([3, 2, 2]), Point3i::fill(3), BlockCompression::Raw);
        let json = serde_json::to_value(attributes).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "dimensions": [3, 2, 2],
                "blockSize": [3, 3, 3],
                "dataType": "uint8",
                "compression": {"type": "raw"},
                "isLabelMultiset": true,
            })
        );

        let plain = DatasetAttributes::labels(PointN([3, 2, 2]), Point3i::fill(3), BlockCompression::Raw);
        assert!(serde_json::to_value(plain)
            .unwrap()
            .get("isLabelMultiset")
            .is_none());
    }

    #[test]
    fn missing_compression_attribute_means_raw() {
        let attributes: DatasetAttributes = serde_json::from_value(serde_json::json!({
            "dimensions": [5, 4, 4],
            "blockSize": [3, 3, 3],
            "dataType": "uint32",
        }))
        .unwrap();

        assert_eq!(attributes.compression, BlockCompression::Raw);
        assert!(!attributes.is_label_multiset);
    }

    #[test]
    fn missing_label_block_is_background() {
        let container = MemoryContainer::new();
        let dataset = container
            .create_dataset(
                "volumes/labels",
                DatasetAttributes::labels(PointN([5, 4, 4]), Point3i::fill(3), BlockCompression::Raw),
            )
            .unwrap();

        let block = dataset.read_label_block(PointN([1, 1, 1])).unwrap();

        assert_eq!(block.extent().shape, PointN([2, 1, 1]));
        assert!(block.values_slice().iter().all(|&l| l == BACKGROUND));
    }

    #[test]
    fn label_block_round_trip_through_container() {
        let container = MemoryContainer::new();
        let dataset = container
            .create_dataset(
                "labels",
                DatasetAttributes::labels(PointN([5, 4, 4]), Point3i::fill(3), BlockCompression::Raw),
            )
            .unwrap();
        let extent = dataset.grid().block_extent(PointN([1, 0, 0]));
        let block = Array3::fill_with(extent, |p| (p.x() + 10 * p.y()) as u64);

        dataset.write_label_block(PointN([1, 0, 0]), &block).unwrap();

        let reopened = container.open_dataset("/labels/").unwrap();
        assert_eq!(reopened.read_label_block(PointN([1, 0, 0])).unwrap(), block);
        assert!(reopened.block_exists(PointN([1, 0, 0])).unwrap());
        assert!(!reopened.block_exists(PointN([0, 0, 0])).unwrap());
    }

    #[test]
    fn writing_a_block_with_the_wrong_extent_fails() {
        let container = MemoryContainer::new();
        let dataset = container
            .create_dataset(
                "labels",
                DatasetAttributes::labels(PointN([5, 4, 4]), Point3i::fill(3), BlockCompression::Raw),
            )
            .unwrap();
        let block = Array3::fill(Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(2)), 1u64);

        assert!(matches!(
            dataset.write_label_block(Point3i::ZERO, &block),
            Err(StorageError::BlockShapeMismatch { .. })
        ));
    }

    #[test]
    fn reading_a_block_with_the_wrong_length_fails() {
        let container = MemoryContainer::new();
        let dataset = container
            .create_dataset(
                "labels",
                DatasetAttributes::labels(PointN([5, 4, 4]), Point3i::fill(3), BlockCompression::Raw),
            )
            .unwrap();
        // Boundary block (1, 0, 0) spans 2x3x3 voxels, but this holds only 2.
        dataset
            .write_block_bytes(PointN([1, 0, 0]), &encode_label_values(DataType::Uint64, &[1, 2]).unwrap())
            .unwrap();

        assert!(matches!(
            dataset.read_label_block(PointN([1, 0, 0])),
            Err(StorageError::BlockShapeMismatch { actual: 2, .. })
        ));
    }

    #[test]
    fn multiset_blocks() {
        let container = MemoryContainer::new();
        let dataset = container
            .create_dataset(
                "multisets",
                DatasetAttributes::label_multisets(PointN([2, 1, 1]), Point3i::fill(3), BlockCompression::Raw),
            )
            .unwrap();

        assert!(matches!(
            dataset.read_multiset_block(Point3i::ZERO),
            Err(StorageError::MissingBlock { .. })
        ));
        assert!(matches!(
            dataset.read_label_block(Point3i::ZERO),
            Err(StorageError::UnexpectedDataType { .. })
        ));

        let block = Array3::new(
            dataset.grid().block_extent(Point3i::ZERO),
            vec![vec![5, 5, 4].into_iter().collect(), LabelMultiset::singleton(1)],
        );
        dataset.write_multiset_block(Point3i::ZERO, &block).unwrap();

        assert_eq!(dataset.read_multiset_block(Point3i::ZERO).unwrap(), block);
    }

    #[test]
    fn label_data_types() {
        let container = MemoryContainer::new();
        let dims = PointN([2, 2, 2]);
        let block = Point3i::fill(2);
        container
            .create_dataset("a", DatasetAttributes::labels(dims, block, BlockCompression::Raw))
            .unwrap();
        container
            .create_dataset("b", DatasetAttributes::label_multisets(dims, block, BlockCompression::Raw))
            .unwrap();
        let mut floats = DatasetAttributes::labels(dims, block, BlockCompression::Raw);
        floats.data_type = DataType::Float32;
        container.create_dataset("c", floats).unwrap();
        container.create_group("d").unwrap();

        assert!(is_label_data_type(&container, "a").unwrap());
        assert!(is_label_data_type(&container, "b").unwrap());
        assert!(!is_label_data_type(&container, "c").unwrap());
        assert!(matches!(
            is_label_data_type(&container, "d"),
            Err(StorageError::NotADataset(_))
        ));
        assert!(matches!(
            is_label_data_type(&container, "e"),
            Err(StorageError::MissingPath(_))
        ));
    }

    #[test]
    fn typed_attributes() {
        let container = MemoryContainer::new();
        container.set_attribute("group", "maxId", &5u64).unwrap();

        assert_eq!(container.get_attribute::<u64>("group", "maxId").unwrap(), Some(5));
        assert_eq!(container.get_attribute::<u64>("group", "other").unwrap(), None);
        assert!(matches!(
            container.require_attribute::<u64>("group", "other"),
            Err(StorageError::MissingAttribute { .. })
        ));
    }
}
