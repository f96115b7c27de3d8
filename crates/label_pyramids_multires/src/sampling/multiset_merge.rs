use super::{reduce_neighborhoods, BlockDownsampler};
use crate::{PyramidError, PyramidResult};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::{Array3, LabelId, LabelMultiset};

/// Aggregates each neighborhood into one multiset. Plain source labels count as singleton multisets.
pub struct MultisetDownsampler;

impl BlockDownsampler<LabelId, LabelMultiset> for MultisetDownsampler {
    fn downsample(&self, src: &Array3<LabelId>, dst_extent: Extent3i) -> PyramidResult<Array3<LabelMultiset>> {
        reduce_neighborhoods(src, dst_extent, |neighborhood| {
            Ok(neighborhood.iter().map(|&&label| label).collect())
        })
    }
}

impl BlockDownsampler<LabelMultiset, LabelMultiset> for MultisetDownsampler {
    fn downsample(
        &self,
        src: &Array3<LabelMultiset>,
        dst_extent: Extent3i,
    ) -> PyramidResult<Array3<LabelMultiset>> {
        reduce_neighborhoods(src, dst_extent, |neighborhood| {
            merge_neighborhood(neighborhood.iter().copied())
        })
    }
}

/// Merges every multiset of a neighborhood. The result does not depend on the order of the neighborhood.
pub fn merge_neighborhood<'a>(
    multisets: impl IntoIterator<Item = &'a LabelMultiset>,
) -> PyramidResult<LabelMultiset> {
    let mut multisets = multisets.into_iter();
    let mut merged = multisets
        .next()
        .cloned()
        .ok_or_else(|| PyramidError::InvalidInput("merge of an empty neighborhood".into()))?;
    for m in multisets {
        merged.merge_from(m);
    }

    Ok(merged)
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
