//! Downsampling of one block by a factor of 2 along every axis.
//!
//! Output voxel `p` summarizes the source neighborhood that starts at `2 * p`, clipped to whatever part of it the source
//! array holds. The two reducers are `WinnerTakesAllDownsampler` and `MultisetDownsampler`. The strategy to use is picked
//! once per pyramid and dispatched on per block by `DownsamplingStrategy::downsample_block`.

mod multiset_merge;
mod winner_takes_all;

pub use multiset_merge::*;
pub use winner_takes_all::*;

use crate::{PyramidError, PyramidResult};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::{
    read_labels_in_extent, read_multisets_in_extent, Array3, BlockCompression, BlockContainer, Dataset,
    DatasetAttributes, LabelId, LabelMultiset, StorageResult,
};

use serde::{Deserialize, Serialize};

/// The contraction factor between adjacent levels, along every axis.
pub const DOWNSAMPLING_FACTOR: i32 = 2;

pub trait BlockDownsampler<Src, Dst> {
    /// Reduces the neighborhood of every point in `dst_extent`. `src` must hold at least one voxel of every neighborhood.
    fn downsample(&self, src: &Array3<Src>, dst_extent: Extent3i) -> PyramidResult<Array3<Dst>>;
}

/// The source extent that output voxel `p` summarizes, before clipping.
#[inline]
pub fn neighborhood_extent(p: Point3i) -> Extent3i {
    Extent3i::from_min_and_shape(p * DOWNSAMPLING_FACTOR, Point3i::fill(DOWNSAMPLING_FACTOR))
}

/// The source extent that all of `dst_extent` summarizes, before clipping.
#[inline]
pub fn source_extent(dst_extent: &Extent3i) -> Extent3i {
    *dst_extent * Point3i::fill(DOWNSAMPLING_FACTOR)
}

/// Visits the clipped neighborhood of every point in `dst_extent`, in order, and collects the reductions.
pub(crate) fn reduce_neighborhoods<S, T>(
    src: &Array3<S>,
    dst_extent: Extent3i,
    mut reduce: impl FnMut(&[&S]) -> PyramidResult<T>,
) -> PyramidResult<Array3<T>> {
    let mut values = Vec::with_capacity(dst_extent.num_points());
    let mut neighborhood = Vec::with_capacity(DOWNSAMPLING_FACTOR.pow(3) as usize);
    for p in dst_extent.iter_points() {
        neighborhood.clear();
        for q in neighborhood_extent(p).intersection(src.extent()).iter_points() {
            neighborhood.push(src.get(q));
        }
        if neighborhood.is_empty() {
            return Err(PyramidError::InvalidInput(format!(
                "output voxel {:?} has no source voxels in {:?}",
                p,
                src.extent()
            )));
        }
        values.push(reduce(&neighborhood)?);
    }

    Ok(Array3::new(dst_extent, values))
}

/// Selects the reducer and the output voxel type of every level above `s0`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownsamplingStrategy {
    WinnerTakesAll,
    LabelMultisets,
}

impl Default for DownsamplingStrategy {
    fn default() -> Self {
        DownsamplingStrategy::LabelMultisets
    }
}

impl DownsamplingStrategy {
    /// The dimensions of the level above one with `dimensions`.
    ///
    /// Winner-takes-all rounds down, so every output voxel has a full neighborhood. Label multisets round up, so boundary
    /// voxels are kept, with fewer counts.
    pub fn output_dimensions(&self, dimensions: Point3i) -> Point3i {
        let factor = Point3i::fill(DOWNSAMPLING_FACTOR);
        match self {
            DownsamplingStrategy::WinnerTakesAll => dimensions.vector_div_floor(&factor),
            DownsamplingStrategy::LabelMultisets => dimensions.vector_div_ceil(&factor),
        }
    }

    /// Attributes of a level dataset written with this strategy.
    pub fn level_attributes(
        &self,
        dimensions: Point3i,
        block_shape: Point3i,
        compression: BlockCompression,
    ) -> DatasetAttributes {
        match self {
            DownsamplingStrategy::WinnerTakesAll => DatasetAttributes::labels(dimensions, block_shape, compression),
            DownsamplingStrategy::LabelMultisets => {
                DatasetAttributes::label_multisets(dimensions, block_shape, compression)
            }
        }
    }

    /// Brings source labels into this strategy's voxel type, for level `s0`.
    pub fn convert_source_block(&self, labels: Array3<LabelId>) -> LevelBlock {
        match self {
            DownsamplingStrategy::WinnerTakesAll => LevelBlock::Labels(labels),
            DownsamplingStrategy::LabelMultisets => {
                LevelBlock::Multisets(labels.map(|&label| LabelMultiset::singleton(label)))
            }
        }
    }

    /// Reduces `src` into a block covering `dst_extent` of the next level.
    pub fn downsample_block(&self, src: &LevelBlock, dst_extent: Extent3i) -> PyramidResult<LevelBlock> {
        match (self, src) {
            (DownsamplingStrategy::WinnerTakesAll, LevelBlock::Labels(labels)) => Ok(LevelBlock::Labels(
                WinnerTakesAllDownsampler.downsample(labels, dst_extent)?,
            )),
            (DownsamplingStrategy::WinnerTakesAll, LevelBlock::Multisets(_)) => Err(PyramidError::InvalidInput(
                "winner-takes-all cannot downsample label multisets".into(),
            )),
            (DownsamplingStrategy::LabelMultisets, LevelBlock::Labels(labels)) => Ok(LevelBlock::Multisets(
                MultisetDownsampler.downsample(labels, dst_extent)?,
            )),
            (DownsamplingStrategy::LabelMultisets, LevelBlock::Multisets(multisets)) => Ok(LevelBlock::Multisets(
                MultisetDownsampler.downsample(multisets, dst_extent)?,
            )),
        }
    }
}

/// The voxels of one block (or any extent) of one level.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LevelBlock {
    Labels(Array3<LabelId>),
    Multisets(Array3<LabelMultiset>),
}

impl LevelBlock {
    pub fn extent(&self) -> &Extent3i {
        match self {
            LevelBlock::Labels(labels) => labels.extent(),
            LevelBlock::Multisets(multisets) => multisets.extent(),
        }
    }

    /// Reads `extent` of a level dataset, picking the voxel type from the dataset's attributes.
    pub fn read_extent<C>(dataset: &Dataset<'_, C>, extent: &Extent3i) -> StorageResult<Self>
    where
        C: BlockContainer + ?Sized,
    {
        if dataset.attributes().is_label_multiset {
            read_multisets_in_extent(dataset, extent).map(LevelBlock::Multisets)
        } else {
            read_labels_in_extent(dataset, extent).map(LevelBlock::Labels)
        }
    }

    /// Reads one whole block of a level dataset.
    pub fn read<C>(dataset: &Dataset<'_, C>, grid_position: Point3i) -> StorageResult<Self>
    where
        C: BlockContainer + ?Sized,
    {
        if dataset.attributes().is_label_multiset {
            dataset.read_multiset_block(grid_position).map(LevelBlock::Multisets)
        } else {
            dataset.read_label_block(grid_position).map(LevelBlock::Labels)
        }
    }

    pub fn write<C>(&self, dataset: &Dataset<'_, C>, grid_position: Point3i) -> StorageResult<()>
    where
        C: BlockContainer + ?Sized,
    {
        match self {
            LevelBlock::Labels(labels) => dataset.write_label_block(grid_position, labels),
            LevelBlock::Multisets(multisets) => dataset.write_multiset_block(grid_position, multisets),
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
