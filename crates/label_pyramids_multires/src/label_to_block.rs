//! The inverse of the unique-label sets of one level: for every label, the blocks that contain it.
//!
//! The mapping is built as a reduction. Every block emits one `(label, block)` pair per unique label, groups of pairs are
//! folded into partial mappings, and partial mappings are merged. Because sets are sorted at the end, the result does not
//! depend on how blocks were grouped or ordered.

use crate::{
    read_unique_labels, LevelBlock, PyramidError, PyramidLayout, PyramidResult, TaskExecutor, UniqueLabels,
};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::{
    decode_grid_positions, encode_grid_positions, BlockContainer, BlockContainerExt, ContainerKey, LabelId,
    StorageResult,
};

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelToBlockMapping {
    blocks: BTreeMap<LabelId, Vec<Point3i>>,
}

impl LabelToBlockMapping {
    /// Inverts the unique labels of every block of one level.
    pub fn build(executor: &impl TaskExecutor, blocks: &[(Point3i, UniqueLabels)]) -> Self {
        executor
            .fold_reduce(
                blocks,
                Self::default,
                |mut mapping, (grid_position, unique)| {
                    mapping.insert_block(*grid_position, unique);
                    mapping
                },
                Self::merge,
            )
            .finish()
    }

    /// Collects `(label, block)` pairs in any order, with or without duplicates.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (LabelId, Point3i)>) -> Self {
        let mut mapping = Self::default();
        for (label, grid_position) in pairs {
            mapping.blocks.entry(label).or_default().push(grid_position);
        }

        mapping.finish()
    }

    fn insert_block(&mut self, grid_position: Point3i, unique: &UniqueLabels) {
        for label in unique.iter() {
            self.blocks.entry(label).or_default().push(grid_position);
        }
    }

    fn merge(mut self, other: Self) -> Self {
        if self.blocks.len() < other.blocks.len() {
            return other.merge(self);
        }
        for (label, mut blocks) in other.blocks {
            self.blocks.entry(label).or_default().append(&mut blocks);
        }

        self
    }

    fn finish(mut self) -> Self {
        for blocks in self.blocks.values_mut() {
            blocks.sort_by_key(|p| p.zyx());
            blocks.dedup();
        }

        self
    }

    /// The blocks containing `label`, sorted by `(z, y, x)`. Empty if no block does.
    pub fn blocks(&self, label: LabelId) -> &[Point3i] {
        self.blocks.get(&label).map_or(&[][..], Vec::as_slice)
    }

    pub fn contains(&self, label: LabelId, grid_position: Point3i) -> bool {
        self.blocks(label).contains(&grid_position)
    }

    /// Labels in increasing order.
    pub fn labels(&self) -> impl Iterator<Item = LabelId> + '_ {
        self.blocks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &[Point3i])> {
        self.blocks.iter().map(|(&label, blocks)| (label, blocks.as_slice()))
    }

    /// The number of distinct labels.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Stores one value per label under the group at `path`.
    pub fn write<C>(&self, container: &C, path: &str) -> StorageResult<()>
    where
        C: BlockContainer + ?Sized,
    {
        container.create_group(path)?;
        for (label, blocks) in self.iter() {
            container.write_raw(path, label.to_key_bytes().as_ref(), &encode_grid_positions(blocks)?)?;
        }

        Ok(())
    }

    pub fn read<C>(container: &C, path: &str) -> PyramidResult<Self>
    where
        C: BlockContainer + ?Sized,
    {
        let mut blocks = BTreeMap::new();
        for key in container.list_keys(path)? {
            let label = LabelId::from_key_bytes(&key).ok_or_else(|| {
                PyramidError::InvalidInput(format!("`{}` holds a key of {} bytes, not a label", path, key.len()))
            })?;
            if let Some(bytes) = container.read_raw(path, &key)? {
                blocks.insert(label, decode_grid_positions(&bytes)?);
            }
        }

        Ok(Self { blocks })
    }
}

/// Reads the blocks of one level that contain `label` from the label-to-block group at `path`. Empty if the label does
/// not occur.
pub fn read_label_blocks<C>(container: &C, path: &str, label: LabelId) -> PyramidResult<Vec<Point3i>>
where
    C: BlockContainer + ?Sized,
{
    match container.read_raw(path, label.to_key_bytes().as_ref())? {
        Some(bytes) => Ok(decode_grid_positions(&bytes)?),
        None => Ok(Vec::new()),
    }
}

/// Re-derives the unique labels of every stored block of `level` and checks them against the stored unique labels and
/// the stored label-to-block mapping. Any disagreement is an `InconsistentIndex`.
pub fn verify_level_index<C>(
    container: &C,
    layout: &PyramidLayout,
    level: usize,
    executor: &impl TaskExecutor,
) -> PyramidResult<()>
where
    C: BlockContainer + ?Sized,
{
    let data = container.open_dataset(&layout.level_data(level))?;
    let unique_labels = container.open_dataset(&layout.unique_labels(level))?;
    let grid_positions: Vec<Point3i> = data.grid().iter_grid_positions().collect();

    let derived = executor.map(&grid_positions, |&grid_position| -> PyramidResult<_> {
        let derived = UniqueLabels::of_block(&LevelBlock::read(&data, grid_position)?);
        let stored = read_unique_labels(&unique_labels, grid_position)?;
        if derived != stored {
            return Err(PyramidError::InconsistentIndex {
                level,
                detail: format!(
                    "block {:?} holds labels {:?} but its unique labels are {:?}",
                    grid_position,
                    derived.as_slice(),
                    stored.as_slice()
                ),
            });
        }

        Ok((grid_position, derived))
    });
    let derived = derived.into_iter().collect::<PyramidResult<Vec<_>>>()?;

    let expected = LabelToBlockMapping::build(executor, &derived);
    let stored = LabelToBlockMapping::read(container, &layout.label_to_block(level))?;
    if expected != stored {
        let label = expected
            .labels()
            .chain(stored.labels())
            .find(|&label| expected.blocks(label) != stored.blocks(label));
        return Err(PyramidError::InconsistentIndex {
            level,
            detail: match label {
                Some(label) => format!(
                    "label {} is in blocks {:?} but the mapping says {:?}",
                    label,
                    expected.blocks(label),
                    stored.blocks(label)
                ),
                None => "label-to-block mapping differs from the unique labels".into(),
            },
        });
    }

    Ok(())
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
    use crate::{write_unique_labels, LabelPyramidBuilder, SerialExecutor};
    use label_pyramids_storage::prelude::*;

    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
    use utilities::data_sets::*;

    fn random_level(rng: &mut StdRng) -> Vec<(Point3i, UniqueLabels)> {
        Extent3i::from_min_and_shape(Point3i::ZERO, PointN([4, 3, 2]))
            .iter_points()
            .map(|p| {
                let labels: Vec<LabelId> = (0..rng.gen_range(0..6)).map(|_| rng.gen_range(0..10)).collect();
                (p, UniqueLabels::from_labels(&labels))
            })
            .collect()
    }

    #[test]
    fn block_is_listed_under_label_iff_label_is_in_block() {
        let mut rng = StdRng::seed_from_u64(11);
        let level = random_level(&mut rng);

        let mapping = LabelToBlockMapping::build(&SerialExecutor, &level);

        for (grid_position, unique) in level.iter() {
            for label in 0..10 {
                assert_eq!(
                    mapping.contains(label, *grid_position),
                    unique.contains(label),
                    "label {} block {:?}",
                    label,
                    grid_position
                );
            }
        }
    }

    #[test]
    fn order_of_blocks_does_not_matter() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut level = random_level(&mut rng);
        let expected = LabelToBlockMapping::build(&SerialExecutor, &level);

        for _ in 0..10 {
            level.shuffle(&mut rng);
            assert_eq!(LabelToBlockMapping::build(&SerialExecutor, &level), expected);
        }

        let pairs = level
            .iter()
            .flat_map(|(g, unique)| unique.iter().map(move |label| (label, *g)));
        assert_eq!(LabelToBlockMapping::from_pairs(pairs), expected);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_build_matches_serial_build() {
        let mut rng = StdRng::seed_from_u64(13);
        let level = random_level(&mut rng);

        assert_eq!(
            LabelToBlockMapping::build(&crate::ParallelExecutor::new(), &level),
            LabelToBlockMapping::build(&SerialExecutor, &level)
        );
    }

    #[test]
    fn giant_label_is_in_every_block() {
        let level: Vec<_> = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(16))
            .iter_points()
            .map(|p| (p, UniqueLabels::from_labels(&[1])))
            .collect();

        let mapping = LabelToBlockMapping::build(&SerialExecutor, &level);

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.blocks(1).len(), 16 * 16 * 16);
        assert_eq!(mapping.blocks(1)[1], PointN([1, 0, 0]));
        assert!(mapping.blocks(2).is_empty());
    }

    #[test]
    fn stored_mapping() {
        let container = MemoryContainer::new();
        let mapping = LabelToBlockMapping::from_pairs(vec![
            (5, PointN([1, 0, 0])),
            (5, PointN([0, 1, 0])),
            (4, PointN([0, 0, 0])),
            (5, PointN([1, 0, 0])),
        ]);

        mapping.write(&container, "seg/label-to-block-mapping/s0").unwrap();

        assert_eq!(
            LabelToBlockMapping::read(&container, "seg/label-to-block-mapping/s0").unwrap(),
            mapping
        );
        assert_eq!(
            read_label_blocks(&container, "seg/label-to-block-mapping/s0", 5).unwrap(),
            vec![PointN([1, 0, 0]), PointN([0, 1, 0])]
        );
        assert!(read_label_blocks(&container, "seg/label-to-block-mapping/s0", 6)
            .unwrap()
            .is_empty());
    }

    fn sample_pyramid() -> (MemoryContainer, PyramidLayout) {
        let container = MemoryContainer::new();
        let source = container
            .create_dataset(
                "raw",
                DatasetAttributes::labels(SAMPLE_DIMENSIONS, SAMPLE_BLOCK_SHAPE, BlockCompression::Raw),
            )
            .unwrap();
        write_labels(&source, &Array3::new(source.grid().extent(), sample_segmentation())).unwrap();
        let summary = LabelPyramidBuilder::new(&container, "raw", &container, "pyramid")
            .build_with(&SerialExecutor)
            .unwrap();
        assert_eq!(summary.levels.len(), 2);

        (container, PyramidLayout::new("pyramid"))
    }

    #[test]
    fn mapping_with_a_foreign_label_is_inconsistent() {
        let (container, layout) = sample_pyramid();
        verify_level_index(&container, &layout, 0, &SerialExecutor).unwrap();

        container
            .write_raw(
                &layout.label_to_block(0),
                99u64.to_key_bytes().as_ref(),
                &encode_grid_positions(&[Point3i::ZERO]).unwrap(),
            )
            .unwrap();

        match verify_level_index(&container, &layout, 0, &SerialExecutor) {
            Err(PyramidError::InconsistentIndex { level, detail }) => {
                assert_eq!(level, 0);
                assert!(detail.contains("label 99"), "{}", detail);
            }
            other => panic!("expected an inconsistent index, got {:?}", other),
        }
        verify_level_index(&container, &layout, 1, &SerialExecutor).unwrap();
    }

    #[test]
    fn wrong_unique_labels_are_inconsistent() {
        let (container, layout) = sample_pyramid();
        verify_level_index(&container, &layout, 1, &SerialExecutor).unwrap();

        let unique_labels = container.open_dataset(&layout.unique_labels(1)).unwrap();
        write_unique_labels(&unique_labels, Point3i::ZERO, &UniqueLabels::from_labels(&[99])).unwrap();

        assert!(matches!(
            verify_level_index(&container, &layout, 1, &SerialExecutor),
            Err(PyramidError::InconsistentIndex { level: 1, .. })
        ));
        verify_level_index(&container, &layout, 0, &SerialExecutor).unwrap();
    }
}
