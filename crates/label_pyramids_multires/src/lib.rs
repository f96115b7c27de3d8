#![allow(clippy::neg_cmp_op_on_partial_ord)]

//! Multi-resolution pyramids of chunked label volumes.
//!
//! Each level halves the resolution of its parent along every axis. Levels are built one at a time, one task per output
//! block, by either of two `DownsamplingStrategy`s:
//!   - winner-takes-all: every coarse voxel gets the most frequent label of its 2x2x2 neighborhood
//!   - label multisets: every coarse voxel keeps a histogram of all labels that contributed to it
//!
//! Next to every level, the `LabelPyramidBuilder` writes the unique labels of each block and the inverse mapping from label
//! to blocks, and it attaches the source's maximum label id to every level.
//!
//! ```
//! use label_pyramids_core::prelude::*;
//! use label_pyramids_storage::prelude::*;
//! use label_pyramids_multires::prelude::*;
//!
//! let container = MemoryContainer::new();
//! let source = container
//!     .create_dataset("raw", DatasetAttributes::labels(PointN([8, 8, 8]), Point3i::fill(4), BlockCompression::Raw))
//!     .unwrap();
//! write_labels(&source, &Array3::fill(source.grid().extent(), 3)).unwrap();
//!
//! let summary = LabelPyramidBuilder::new(&container, "raw", &container, "pyramid")
//!     .with_config(PyramidConfig::default().with_strategy(DownsamplingStrategy::WinnerTakesAll))
//!     .build_with(&SerialExecutor)
//!     .unwrap();
//!
//! assert_eq!(summary.max_id, 3);
//! assert_eq!(summary.levels.len(), 2);
//! assert!(container.dataset_exists("pyramid/data/s1").unwrap());
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod label_to_block;
pub mod layout;
pub mod max_id;
pub mod pyramid;
pub mod sampling;
pub mod unique_labels;

#[cfg(test)]
mod test_util;

pub use config::*;
pub use error::*;
pub use executor::*;
pub use label_to_block::*;
pub use layout::*;
pub use max_id::*;
pub use pyramid::*;
pub use sampling::*;
pub use unique_labels::*;

pub mod prelude {
    pub use super::{
        build_label_pyramid, max_label_id, read_label_blocks, read_unique_labels, verify_level_index,
        BlockDownsampler, DownsamplingStrategy, LabelPyramidBuilder, LabelToBlockMapping, Level, LevelBlock,
        MultisetDownsampler, PyramidConfig, PyramidError, PyramidLayout, PyramidResult, PyramidSummary,
        SerialExecutor, TaskExecutor, UniqueLabels, WinnerTakesAllDownsampler,
    };

    #[cfg(feature = "rayon")]
    pub use super::ParallelExecutor;
}
