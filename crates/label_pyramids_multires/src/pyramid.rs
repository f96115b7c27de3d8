//! Builds a whole pyramid from one source dataset, level by level.
//!
//! The build is a small state machine: the source is registered and validated, then every level `s0, s1, ...` is written
//! completely (blocks, unique labels, label-to-block mapping, attributes) before the next one starts. A level's blocks
//! are independent tasks on the `TaskExecutor`. If any of them fails, the level is removed again and the failure is
//! reported with its level and block.

use crate::{
    layout::*, max_label_id, source_extent, verify_level_index, write_unique_labels, LabelToBlockMapping, LevelBlock,
    PyramidConfig, PyramidError, PyramidResult, TaskExecutor, UniqueLabels,
};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::{
    normalize_path, paths_overlap, read_labels_in_extent, BlockContainer, BlockContainerExt, BlockGrid, Dataset,
    DatasetAttributes, LabelId,
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, info_span, warn};

/// One finished level of a pyramid.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Level {
    pub index: usize,
    pub dimensions: Point3i,
    pub block_shape: Point3i,
    /// The contraction relative to `s0`, along each axis.
    pub downsampling_factors: Point3i,
    pub num_blocks: usize,
    /// The number of distinct labels in the level, i.e. the size of its label-to-block mapping.
    pub num_labels: usize,
}

impl Level {
    pub fn grid(&self) -> BlockGrid {
        BlockGrid::new(self.dimensions, self.block_shape)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PyramidSummary {
    pub max_id: LabelId,
    pub levels: Vec<Level>,
}

enum BuildState {
    SourceRegistered,
    LevelReady(Level),
    Terminal,
}

/// What the blocks of a level are computed from: the source for `s0`, the previous level otherwise.
enum LevelInput<'a, S: ?Sized, T: ?Sized> {
    Source(Dataset<'a, S>),
    Parent(Dataset<'a, T>),
}

/// Converts the label dataset at `source_path` into a pyramid under `target_group`.
///
/// Source and target may be the same container, as long as neither path contains the other.
pub struct LabelPyramidBuilder<'a, S: ?Sized, T: ?Sized> {
    source_container: &'a S,
    source_path: String,
    target_container: &'a T,
    layout: PyramidLayout,
    config: PyramidConfig,
}

impl<'a, S, T> LabelPyramidBuilder<'a, S, T>
where
    S: BlockContainer + ?Sized,
    T: BlockContainer + ?Sized,
{
    pub fn new(source_container: &'a S, source_path: &str, target_container: &'a T, target_group: &str) -> Self {
        Self {
            source_container,
            source_path: normalize_path(source_path),
            target_container,
            layout: PyramidLayout::new(target_group),
            config: PyramidConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PyramidConfig) -> Self {
        self.config = config;
        self
    }

    pub fn layout(&self) -> &PyramidLayout {
        &self.layout
    }

    /// Builds on the global `rayon` pool when the `rayon` feature is enabled, otherwise on the calling thread.
    pub fn build(&self) -> PyramidResult<PyramidSummary> {
        #[cfg(feature = "rayon")]
        {
            self.build_with(&crate::ParallelExecutor::new())
        }
        #[cfg(not(feature = "rayon"))]
        {
            self.build_with(&crate::SerialExecutor)
        }
    }

    pub fn build_with(&self, executor: &impl TaskExecutor) -> PyramidResult<PyramidSummary> {
        self.config.validate()?;
        let source_attributes = self.validate_source()?;
        self.prepare_target()?;

        let source = self.source_container.open_dataset(&self.source_path)?;
        let max_id = max_label_id(executor, &source)?;
        info!(source = %self.source_path, max_id, "registered source");
        self.write_group_metadata(max_id)?;

        let block_shape = self.config.block_shape.unwrap_or(source_attributes.block_size);
        let mut levels = Vec::new();
        let mut state = BuildState::SourceRegistered;
        loop {
            state = match state {
                BuildState::SourceRegistered => {
                    let level = self.write_level(executor, 0, source_attributes.dimensions, block_shape, max_id)?;
                    BuildState::LevelReady(level)
                }
                BuildState::LevelReady(level) => {
                    levels.push(level);
                    match self.next_dimensions(&level) {
                        Some(dimensions) => BuildState::LevelReady(self.write_level(
                            executor,
                            level.index + 1,
                            dimensions,
                            block_shape,
                            max_id,
                        )?),
                        None => BuildState::Terminal,
                    }
                }
                BuildState::Terminal => break,
            };
        }
        info!(num_levels = levels.len(), "pyramid complete");

        Ok(PyramidSummary { max_id, levels })
    }

    fn validate_source(&self) -> PyramidResult<DatasetAttributes> {
        let container = self.source_container;
        let path = self.source_path.as_str();
        if !container.exists(path)? {
            return Err(PyramidError::InvalidInput(format!("source `{}` does not exist", path)));
        }
        if !container.dataset_exists(path)? {
            return Err(PyramidError::InvalidInput(format!("source `{}` is a group, not a dataset", path)));
        }
        let dimensions: Vec<i64> = container.require_attribute(path, "dimensions")?;
        if dimensions.len() != 3 {
            return Err(PyramidError::InvalidInput(format!(
                "source `{}` has {} dimensions, expected 3",
                path,
                dimensions.len()
            )));
        }

        let attributes = container.dataset_attributes(path)?;
        if attributes.is_label_multiset {
            return Err(PyramidError::InvalidInput(format!(
                "source `{}` already holds label multisets",
                path
            )));
        }
        if !attributes.data_type.is_label() {
            return Err(PyramidError::InvalidInput(format!(
                "source `{}` holds {}, expected uint64, uint32 or int64 labels",
                path, attributes.data_type
            )));
        }

        Ok(attributes)
    }

    fn prepare_target(&self) -> PyramidResult<()> {
        let group = self.layout.group();
        if self.source_container.location() == self.target_container.location()
            && paths_overlap(&self.source_path, group)
        {
            return Err(PyramidError::SourceTargetCollision {
                location: self.target_container.location().to_string(),
                source_path: self.source_path.clone(),
                target: group.to_string(),
            });
        }

        if self.target_container.exists(group)? {
            if !self.config.overwrite_existing {
                return Err(PyramidError::OutputExists(group.to_string()));
            }
            info!(group, "removing existing pyramid");
            self.target_container.remove(group)?;
        }

        Ok(())
    }

    fn write_group_metadata(&self, max_id: LabelId) -> PyramidResult<()> {
        let target = self.target_container;
        let group = self.layout.group();
        target.create_group(group)?;
        target.set_attribute(group, PAINTERA_DATA_ATTRIBUTE, &json!({ "type": "label" }))?;
        target.set_attribute(group, MAX_ID_ATTRIBUTE, &max_id)?;

        let data_group = self.layout.data_group();
        target.create_group(&data_group)?;
        target.set_attribute(&data_group, MULTI_SCALE_ATTRIBUTE, &true)?;
        for name in [RESOLUTION_ATTRIBUTE, OFFSET_ATTRIBUTE] {
            if let Some(value) = self
                .source_container
                .get_attribute::<Value>(&self.source_path, name)?
            {
                target.set_attribute(&data_group, name, &value)?;
            }
        }

        Ok(())
    }

    /// The dimensions of the level after `level`, or `None` if `level` is the last one.
    fn next_dimensions(&self, level: &Level) -> Option<Point3i> {
        if self
            .config
            .max_levels
            .map_or(false, |max_levels| level.index + 1 >= max_levels)
        {
            return None;
        }
        if level.grid().is_single_block() {
            return None;
        }

        let next = self.config.strategy.output_dimensions(level.dimensions);
        if next.0.iter().any(|&c| c <= 0) || next == level.dimensions {
            return None;
        }

        Some(next)
    }

    fn write_level(
        &self,
        executor: &impl TaskExecutor,
        index: usize,
        dimensions: Point3i,
        block_shape: Point3i,
        max_id: LabelId,
    ) -> PyramidResult<Level> {
        let span = info_span!("level", index);
        let _enter = span.enter();

        match self
            .try_write_level(executor, index, dimensions, block_shape, max_id)
            .map_err(|e| e.in_level(index))
        {
            Ok(level) => {
                info!(
                    dimensions = ?level.dimensions,
                    num_blocks = level.num_blocks,
                    num_labels = level.num_labels,
                    "level complete"
                );
                Ok(level)
            }
            Err(e) => {
                warn!(error = %e, "discarding incomplete level");
                for path in self.layout.level_paths(index).iter() {
                    if let Err(remove_error) = self.target_container.remove(path) {
                        warn!(path = %path, error = %remove_error, "failed to remove incomplete level");
                    }
                }
                Err(e)
            }
        }
    }

    fn try_write_level(
        &self,
        executor: &impl TaskExecutor,
        index: usize,
        dimensions: Point3i,
        block_shape: Point3i,
        max_id: LabelId,
    ) -> PyramidResult<Level> {
        let target = self.target_container;
        let strategy = self.config.strategy;
        let compression = self.config.compression;

        let data_path = self.layout.level_data(index);
        let data = target.create_dataset(
            &data_path,
            strategy.level_attributes(dimensions, block_shape, compression),
        )?;
        let unique_labels = target.create_dataset(
            &self.layout.unique_labels(index),
            DatasetAttributes::labels(dimensions, block_shape, compression),
        )?;

        let grid = data.grid();
        let grid_positions: Vec<Point3i> = grid.iter_grid_positions().collect();

        let input = match index {
            0 => LevelInput::Source(self.source_container.open_dataset(&self.source_path)?),
            _ => LevelInput::Parent(target.open_dataset(&self.layout.level_data(index - 1))?),
        };

        let results = executor.map(&grid_positions, |&grid_position| {
            let extent = grid.block_extent(grid_position);
            let write_block = || -> PyramidResult<(Point3i, UniqueLabels)> {
                let block = match &input {
                    LevelInput::Source(source) => {
                        strategy.convert_source_block(read_labels_in_extent(source, &extent)?)
                    }
                    LevelInput::Parent(parent) => {
                        let src_extent = source_extent(&extent).intersection(&parent.grid().extent());
                        strategy.downsample_block(&LevelBlock::read_extent(parent, &src_extent)?, extent)?
                    }
                };
                block.write(&data, grid_position)?;

                let unique = UniqueLabels::of_block(&block);
                write_unique_labels(&unique_labels, grid_position, &unique)?;
                debug!(block = ?grid_position, num_labels = unique.len(), "wrote block");

                Ok((grid_position, unique))
            };

            write_block().map_err(|e| e.in_block(index, grid_position))
        });
        let blocks = results.into_iter().collect::<PyramidResult<Vec<_>>>()?;

        let mapping = LabelToBlockMapping::build(executor, &blocks);
        mapping.write(target, &self.layout.label_to_block(index))?;

        if self.config.verify_indices {
            verify_level_index(target, &self.layout, index, executor)?;
        }

        let downsampling_factors = Point3i::fill(1 << index);
        target.set_attribute(&data_path, DOWNSAMPLING_FACTORS_ATTRIBUTE, &downsampling_factors)?;
        target.set_attribute(&data_path, MAX_ID_ATTRIBUTE, &max_id)?;

        Ok(Level {
            index,
            dimensions,
            block_shape,
            downsampling_factors,
            num_blocks: grid_positions.len(),
            num_labels: mapping.len(),
        })
    }
}

/// Builds a pyramid with `config`, on the default executor.
pub fn build_label_pyramid<S, T>(
    source_container: &S,
    source_path: &str,
    target_container: &T,
    target_group: &str,
    config: PyramidConfig,
) -> PyramidResult<PyramidSummary>
where
    S: BlockContainer + ?Sized,
    T: BlockContainer + ?Sized,
{
    LabelPyramidBuilder::new(source_container, source_path, target_container, target_group)
        .with_config(config)
        .build()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
