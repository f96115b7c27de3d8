use label_pyramids_core::prelude::*;

/// Dimensions of `sample_segmentation`.
pub const SAMPLE_DIMENSIONS: Point3i = PointN([5, 4, 4]);

/// The block shape the sample is stored with. It does not divide the dimensions, so boundary blocks are clipped.
pub const SAMPLE_BLOCK_SHAPE: Point3i = PointN([3, 3, 3]);

pub const SAMPLE_MAX_ID: u64 = 5;

/// A small segmentation with labels 1, 4 and 5, X fastest.
pub fn sample_segmentation() -> Vec<u64> {
    vec![
        5, 5, 5, 4, 4, //
        5, 5, 4, 4, 4, //
        5, 4, 4, 4, 4, //
        5, 4, 4, 4, 1, //
        //
        5, 5, 4, 4, 4, //
        5, 4, 4, 4, 4, //
        5, 5, 4, 4, 4, //
        5, 5, 5, 1, 1, //
        //
        4, 4, 4, 4, 4, //
        4, 4, 4, 4, 4, //
        5, 4, 4, 4, 4, //
        5, 5, 5, 5, 1, //
        //
        4, 4, 4, 4, 4, //
        4, 4, 4, 4, 4, //
        5, 4, 4, 4, 4, //
        5, 5, 5, 5, 1, //
    ]
}

/// Level 1 of `sample_segmentation` by majority vote over 2x2x2 neighborhoods. Only full neighborhoods count, so the
/// dimensions round down.
pub fn sample_winner_takes_all_level_1() -> (Point3i, Vec<u64>) {
    (PointN([2, 2, 2]), vec![5, 4, 5, 4, 4, 4, 5, 4])
}

/// The argmax of each multiset of level 1 of `sample_segmentation` aggregated over 2x2x2 neighborhoods. Boundary
/// neighborhoods are clipped, so the dimensions round up.
pub fn sample_multiset_level_1_arg_max() -> (Point3i, Vec<u64>) {
    (PointN([3, 2, 2]), vec![5, 4, 4, 5, 4, 1, 4, 4, 4, 5, 4, 1])
}

/// A segmentation of `dimensions` made of cubes with edge length `cell`, each with its own label starting at 1. Every
/// label is contiguous, so its voxels, blocks and downsampled voxels are easy to predict.
pub fn cube_segmentation(dimensions: Point3i, cell: i32) -> Vec<u64> {
    let cells = dimensions.vector_div_ceil(&Point3i::fill(cell));
    Extent3i::from_min_and_shape(Point3i::ZERO, dimensions)
        .iter_points()
        .map(|p| {
            let c = p.vector_div_floor(&Point3i::fill(cell));
            1 + (c.x() + cells.x() * (c.y() + cells.y() * c.z())) as u64
        })
        .collect()
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
    fn sample_has_one_label_per_voxel() {
        assert_eq!(sample_segmentation().len(), SAMPLE_DIMENSIONS.volume() as usize);
        assert_eq!(sample_segmentation().iter().max(), Some(&SAMPLE_MAX_ID));
    }

    #[test]
    fn cubes_are_numbered_x_fastest() {
        let labels = cube_segmentation(PointN([4, 2, 2]), 2);

        assert_eq!(labels, vec![1, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2, 1, 1, 2, 2]);
    }
}
