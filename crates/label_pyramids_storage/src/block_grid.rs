use label_pyramids_core::prelude::*;

use serde::{Deserialize, Serialize};

/// Calculates block locations for one dataset, i.e. one level of a pyramid.
///
/// Blocks are addressed by grid position: block `g` covers the voxels starting at `g * block_shape`. Blocks on the upper
/// boundary of the volume are clipped to the dataset dimensions, so they can be smaller than `block_shape`. Block shapes do
/// not need to be powers of 2.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BlockGrid {
    dimensions: Point3i,
    block_shape: Point3i,
}

impl BlockGrid {
    #[inline]
    pub fn new(dimensions: Point3i, block_shape: Point3i) -> Self {
        assert!(block_shape > Point3i::ZERO, "bad block shape {:?}", block_shape);
        assert!(dimensions >= Point3i::ZERO, "bad dimensions {:?}", dimensions);

        Self {
            dimensions,
            block_shape,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> Point3i {
        self.dimensions
    }

    /// The constant shape of an interior block.
    #[inline]
    pub fn block_shape(&self) -> Point3i {
        self.block_shape
    }

    /// The extent of the whole dataset.
    #[inline]
    pub fn extent(&self) -> Extent3i {
        Extent3i::from_min_and_shape(Point3i::ZERO, self.dimensions)
    }

    /// The number of blocks along each axis.
    #[inline]
    pub fn grid_shape(&self) -> Point3i {
        self.dimensions.vector_div_ceil(&self.block_shape)
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.grid_shape().volume() as usize
    }

    /// Returns `true` iff the whole dataset fits in one block along every axis.
    #[inline]
    pub fn is_single_block(&self) -> bool {
        self.grid_shape() == Point3i::ONES
    }

    /// Iterates over every block grid position, X fastest.
    #[inline]
    pub fn iter_grid_positions(&self) -> Extent3PointIter {
        Extent3i::from_min_and_shape(Point3i::ZERO, self.grid_shape()).iter_points()
    }

    /// The extent spanned by the block at `grid_position`, clipped to the dataset.
    #[inline]
    pub fn block_extent(&self, grid_position: Point3i) -> Extent3i {
        Extent3i::from_min_and_shape(grid_position * self.block_shape, self.block_shape)
            .intersection(&self.extent())
    }

    /// Returns the grid position of the block that contains `point`.
    #[inline]
    pub fn grid_position_containing_point(&self, point: Point3i) -> Point3i {
        point.vector_div_floor(&self.block_shape)
    }

    /// Returns an iterator over all grid positions for blocks that overlap the given extent.
    #[inline]
    pub fn grid_positions_for_extent(&self, extent: &Extent3i) -> Extent3PointIter {
        let clipped = extent.intersection(&self.extent());
        if clipped.is_empty() {
            return Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::ZERO).iter_points();
        }

        Extent3i::from_min_and_max(
            self.grid_position_containing_point(clipped.minimum),
            self.grid_position_containing_point(clipped.max()),
        )
        .iter_points()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_blocks_are_clipped() {
        let grid = BlockGrid::new(PointN([5, 4, 4]), Point3i::fill(3));

        assert_eq!(grid.grid_shape(), Point3i::fill(2));
        assert_eq!(grid.num_blocks(), 8);
        assert_eq!(
            grid.block_extent(Point3i::ZERO),
            Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(3))
        );
        assert_eq!(
            grid.block_extent(PointN([1, 1, 1])),
            Extent3i::from_min_and_shape(Point3i::fill(3), PointN([2, 1, 1]))
        );
    }

    #[test]
    fn block_extents_tile_the_dataset() {
        let grid = BlockGrid::new(PointN([7, 5, 9]), PointN([3, 2, 4]));

        let total: usize = grid
            .iter_grid_positions()
            .map(|g| grid.block_extent(g).num_points())
            .sum();

        assert_eq!(total, grid.extent().num_points());
    }

    #[test]
    fn grid_positions_for_extent_gives_blocks_overlapping_extent() {
        let grid = BlockGrid::new(Point3i::fill(32), Point3i::fill(16));
        let query_extent = Extent3i::from_min_and_shape(Point3i::fill(15), Point3i::fill(16));
        let grid_positions: Vec<_> = grid.grid_positions_for_extent(&query_extent).collect();

        assert_eq!(
            grid_positions,
            vec![
                PointN([0, 0, 0]),
                PointN([1, 0, 0]),
                PointN([0, 1, 0]),
                PointN([1, 1, 0]),
                PointN([0, 0, 1]),
                PointN([1, 0, 1]),
                PointN([0, 1, 1]),
                PointN([1, 1, 1])
            ]
        );
    }

    #[test]
    fn grid_positions_for_extent_outside_dataset_is_empty() {
        let grid = BlockGrid::new(Point3i::fill(8), Point3i::fill(4));
        let query_extent = Extent3i::from_min_and_shape(Point3i::fill(8), Point3i::fill(4));

        assert_eq!(grid.grid_positions_for_extent(&query_extent).count(), 0);
    }

    #[test]
    fn single_block_grid() {
        assert!(BlockGrid::new(PointN([3, 2, 2]), Point3i::fill(3)).is_single_block());
        assert!(!BlockGrid::new(PointN([5, 4, 4]), Point3i::fill(3)).is_single_block());
    }
}
