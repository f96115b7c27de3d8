//! Multi-resolution pyramids of chunked, integer-labeled 3D volumes, e.g. segmentations of microscopy images.
//!
//! This library is organized into several crates:
//! - **core**: lattice point and extent data types
//! - **storage**: arrays, block grids, label multisets and their codec, and block containers
//! - **multires**: downsampling, per-block label indices, and the pyramid builder
//!
//! ```
//! use label_pyramids::prelude::*;
//!
//! let container = MemoryContainer::new();
//! let source = container
//!     .create_dataset("raw", DatasetAttributes::labels(PointN([6, 6, 6]), Point3i::fill(4), BlockCompression::Raw))
//!     .unwrap();
//! let labels = Array3::fill_with(source.grid().extent(), |p| if p.x() < 3 { 1 } else { 2 });
//! write_labels(&source, &labels).unwrap();
//!
//! let summary = build_label_pyramid(&container, "raw", &container, "pyramid", PyramidConfig::default()).unwrap();
//!
//! assert_eq!(summary.max_id, 2);
//! assert_eq!(read_label_blocks(&container, "pyramid/label-to-block-mapping/s1", 2).unwrap(), vec![Point3i::ZERO]);
//! ```

pub use label_pyramids_core as core;
pub use label_pyramids_multires as multires;
pub use label_pyramids_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::multires::prelude::*;
    pub use super::storage::prelude::*;
}
