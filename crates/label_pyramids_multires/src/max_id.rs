use crate::{PyramidResult, TaskExecutor};

use label_pyramids_core::prelude::*;
use label_pyramids_storage::{BlockContainer, Dataset, LabelId, BACKGROUND};

/// The largest label of a plain label dataset, as a max-reduction over its blocks. Blocks that were never written only
/// hold `BACKGROUND`.
pub fn max_label_id<C>(executor: &impl TaskExecutor, dataset: &Dataset<'_, C>) -> PyramidResult<LabelId>
where
    C: BlockContainer + ?Sized,
{
    let grid_positions: Vec<Point3i> = dataset.grid().iter_grid_positions().collect();

    executor.fold_reduce(
        &grid_positions,
        || Ok(BACKGROUND),
        |max, &grid_position| {
            // Stop reading once a block has failed.
            let max = max?;
            let block = dataset.read_label_block(grid_position)?;
            let block_max = block.values_slice().iter().copied().max().unwrap_or(BACKGROUND);

            Ok(max.max(block_max))
        },
        |a: PyramidResult<LabelId>, b| Ok(a?.max(b?)),
    )
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
