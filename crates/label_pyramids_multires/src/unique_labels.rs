use crate::{LevelBlock, PyramidResult};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::{
    decode_label_list, encode_label_list, BlockContainer, Dataset, LabelId, LabelMultiset, StorageError,
    StorageResult,
};

use itertools::Itertools;

/// The distinct labels of one block, in increasing order.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct UniqueLabels {
    labels: Vec<LabelId>,
}

impl UniqueLabels {
    pub fn from_labels(labels: &[LabelId]) -> Self {
        let mut labels = labels.to_vec();
        labels.sort_unstable();
        labels.dedup();

        Self { labels }
    }

    /// Every label of every multiset, not only the argmax of each voxel. A minority label still has data in the block.
    pub fn from_multisets(multisets: &[LabelMultiset]) -> Self {
        let labels = multisets.iter().map(|m| m.ids()).kmerge().dedup().collect();

        Self { labels }
    }

    pub fn of_block(block: &LevelBlock) -> Self {
        match block {
            LevelBlock::Labels(labels) => Self::from_labels(labels.values_slice()),
            LevelBlock::Multisets(multisets) => Self::from_multisets(multisets.values_slice()),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[LabelId] {
        &self.labels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn contains(&self, label: LabelId) -> bool {
        self.labels.binary_search(&label).is_ok()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.labels.iter().copied()
    }
}

/// Stores the unique labels of the block at `grid_position` in a unique-labels dataset.
pub fn write_unique_labels<C>(
    dataset: &Dataset<'_, C>,
    grid_position: Point3i,
    unique: &UniqueLabels,
) -> StorageResult<()>
where
    C: BlockContainer + ?Sized,
{
    dataset.write_block_bytes(grid_position, &encode_label_list(unique.as_slice())?)
}

/// Reads the unique labels of the block at `grid_position` from a unique-labels dataset.
pub fn read_unique_labels<C>(dataset: &Dataset<'_, C>, grid_position: Point3i) -> PyramidResult<UniqueLabels>
where
    C: BlockContainer + ?Sized,
{
    let bytes = dataset
        .read_block_bytes(grid_position)?
        .ok_or_else(|| StorageError::MissingBlock {
            path: dataset.path().to_string(),
            block: grid_position,
        })?;
    let labels = decode_label_list(&bytes)?;

    Ok(UniqueLabels { labels })
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
    use label_pyramids_storage::prelude::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn labels_are_sorted_and_distinct() {
        let unique = UniqueLabels::from_labels(&[5, 1, 5, 4, 1]);

        assert_eq!(unique.as_slice(), &[1, 4, 5]);
        assert!(unique.contains(4));
        assert!(!unique.contains(2));
    }

    #[test]
    fn minority_labels_of_multisets_count() {
        let multisets = vec![
            vec![5, 5, 5, 4].into_iter().collect::<LabelMultiset>(),
            vec![1, 4, 4, 4].into_iter().collect(),
            LabelMultiset::new(),
        ];

        let unique = UniqueLabels::from_multisets(&multisets);

        assert_eq!(unique.as_slice(), &[1, 4, 5]);
    }

    #[test]
    fn uniform_block_has_one_label() {
        let extent = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(3));
        let block = LevelBlock::Multisets(Array3::fill(extent, LabelMultiset::from_entries(vec![Entry::new(7, 8)])));

        assert_eq!(UniqueLabels::of_block(&block).as_slice(), &[7]);
    }

    #[test]
    fn stored_unique_labels() {
        let container = MemoryContainer::new();
        let dataset = container
            .create_dataset(
                "unique-labels/s0",
                DatasetAttributes::labels(Point3i::fill(4), Point3i::fill(2), BlockCompression::Raw),
            )
            .unwrap();
        let unique = UniqueLabels::from_labels(&[3, 1, 2]);

        write_unique_labels(&dataset, PointN([1, 0, 0]), &unique).unwrap();

        assert_eq!(read_unique_labels(&dataset, PointN([1, 0, 0])).unwrap(), unique);
        assert!(read_unique_labels(&dataset, PointN([0, 0, 0])).is_err());
    }
}
