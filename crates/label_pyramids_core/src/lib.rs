//! The core data types for addressing chunked 3D label volumes:
//! - `Point3i`: a voxel coordinate or a block grid coordinate
//! - `Extent3i`: an axis-aligned box of voxels, e.g. a block or a downsampling neighborhood

pub mod extent;
pub mod int_math;
pub mod point;

pub use extent::{Extent3PointIter, Extent3i, ExtentN};
pub use int_math::{div_ceil, div_floor};
pub use point::{Point3i, PointN};

pub use num;

pub mod prelude {
    pub use super::{Extent3PointIter, Extent3i, ExtentN, Point3i, PointN};
}
