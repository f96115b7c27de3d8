//! Whole-volume and sub-volume access that spans block boundaries.

use crate::{copy_extent, Array3, BlockContainer, Dataset, LabelId, LabelMultiset, StorageResult, BACKGROUND};

use label_pyramids_core::prelude::*;

/// Reads the labels of every voxel in `extent`. Voxels outside of the dataset, and voxels of blocks that were never written,
/// are `BACKGROUND`.
pub fn read_labels_in_extent<C>(dataset: &Dataset<'_, C>, extent: &Extent3i) -> StorageResult<Array3<LabelId>>
where
    C: BlockContainer + ?Sized,
{
    let mut labels = Array3::fill(*extent, BACKGROUND);
    let grid = dataset.grid();
    for grid_position in grid.grid_positions_for_extent(extent) {
        let block = dataset.read_label_block(grid_position)?;
        copy_extent(extent, &block, &mut labels);
    }

    Ok(labels)
}

/// Reads the multisets of every voxel in `extent`. Voxels outside of the dataset hold the empty multiset.
pub fn read_multisets_in_extent<C>(
    dataset: &Dataset<'_, C>,
    extent: &Extent3i,
) -> StorageResult<Array3<LabelMultiset>>
where
    C: BlockContainer + ?Sized,
{
    let mut multisets = Array3::fill(*extent, LabelMultiset::new());
    let grid = dataset.grid();
    for grid_position in grid.grid_positions_for_extent(extent) {
        let block = dataset.read_multiset_block(grid_position)?;
        copy_extent(extent, &block, &mut multisets);
    }

    Ok(multisets)
}

pub fn read_label_volume<C>(dataset: &Dataset<'_, C>) -> StorageResult<Array3<LabelId>>
where
    C: BlockContainer + ?Sized,
{
    read_labels_in_extent(dataset, &dataset.grid().extent())
}

pub fn read_multiset_volume<C>(dataset: &Dataset<'_, C>) -> StorageResult<Array3<LabelMultiset>>
where
    C: BlockContainer + ?Sized,
{
    read_multisets_in_extent(dataset, &dataset.grid().extent())
}

/// Writes every voxel of `labels` that lies in the dataset. Blocks that `labels` covers only partially keep their other
/// voxels.
pub fn write_labels<C>(dataset: &Dataset<'_, C>, labels: &Array3<LabelId>) -> StorageResult<()>
where
    C: BlockContainer + ?Sized,
{
    let grid = dataset.grid();
    for grid_position in grid.grid_positions_for_extent(labels.extent()) {
        let block_extent = grid.block_extent(grid_position);
        let mut block = if block_extent.is_subset_of(labels.extent()) {
            Array3::fill(block_extent, BACKGROUND)
        } else {
            dataset.read_label_block(grid_position)?
        };
        copy_extent(&block_extent, labels, &mut block);
        dataset.write_label_block(grid_position, &block)?;
    }

    Ok(())
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
