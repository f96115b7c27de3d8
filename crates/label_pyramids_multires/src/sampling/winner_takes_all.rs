use super::{reduce_neighborhoods, BlockDownsampler};
use crate::{PyramidError, PyramidResult};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::{Array3, LabelId};

/// Keeps the most frequent label of each neighborhood.
pub struct WinnerTakesAllDownsampler;

impl BlockDownsampler<LabelId, LabelId> for WinnerTakesAllDownsampler {
    fn downsample(&self, src: &Array3<LabelId>, dst_extent: Extent3i) -> PyramidResult<Array3<LabelId>> {
        let mut scratch = Vec::new();

        reduce_neighborhoods(src, dst_extent, |neighborhood| {
            scratch.clear();
            scratch.extend(neighborhood.iter().map(|&&label| label));
            majority_label(&mut scratch)
        })
    }
}

/// The most frequent label. Among labels with equal counts, the smallest id wins. Reorders `labels`.
pub fn majority_label(labels: &mut [LabelId]) -> PyramidResult<LabelId> {
    if labels.is_empty() {
        return Err(PyramidError::InvalidInput("majority of an empty neighborhood".into()));
    }
    labels.sort_unstable();

    let mut winner = (labels[0], 0);
    let mut run = (labels[0], 0);
    for &label in labels.iter() {
        if label == run.0 {
            run.1 += 1;
        } else {
            run = (label, 1);
        }
        // Runs are visited in increasing label order, so only a strictly longer run may replace the winner.
        if run.1 > winner.1 {
            winner = run;
        }
    }

    Ok(winner.0)
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

    #[test]
    fn clear_majority_wins() {
        assert_eq!(majority_label(&mut [5, 5, 5, 4]).unwrap(), 5);
        assert_eq!(majority_label(&mut [4, 5, 5, 5, 4, 5, 4, 4, 4]).unwrap(), 4);
        assert_eq!(majority_label(&mut [9]).unwrap(), 9);
    }

    #[test]
    fn ties_go_to_the_smallest_label() {
        assert_eq!(majority_label(&mut [5, 4, 4, 5, 5, 4, 4, 5]).unwrap(), 4);
        assert_eq!(majority_label(&mut [4, 1, 4, 1]).unwrap(), 1);
        assert_eq!(majority_label(&mut [7, 3, 9]).unwrap(), 3);
    }

    #[test]
    fn empty_neighborhood_is_invalid() {
        assert!(matches!(
            majority_label(&mut []),
            Err(PyramidError::InvalidInput(_))
        ));
    }

    #[test]
    fn every_output_voxel_sees_a_full_neighborhood() {
        let src_extent = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(4));
        // Each 2x2x2 neighborhood holds 5 voxels of its own label and 3 of label 1.
        let src = Array3::fill_with(src_extent, |p| {
            let cell = p.vector_div_floor(&Point3i::fill(2));
            let local = p - cell * 2;
            if local.x() + local.y() + local.z() <= 1 || local == Point3i::fill(1) {
                10 + (cell.x() + 2 * cell.y() + 4 * cell.z()) as u64
            } else {
                1
            }
        });
        let dst_extent = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(2));

        let dst = WinnerTakesAllDownsampler.downsample(&src, dst_extent).unwrap();

        assert_eq!(dst.values_slice(), &[10, 11, 12, 13, 14, 15, 16, 17]);
    }
}
