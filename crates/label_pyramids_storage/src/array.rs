//! Dense 3-dimensional arrays.
//!
//! The domain of an array is located within the ambient voxel space of one pyramid level. This means it contains data at
//! exactly the set of points in an `Extent3i`, and no more. A block read from a container is an `Array3` whose extent is the
//! block's (possibly boundary-clipped) extent in level coordinates.
//!
//! ```
//! use label_pyramids_core::prelude::*;
//! use label_pyramids_storage::prelude::*;
//!
//! let array_extent = Extent3i::from_min_and_shape(Point3i::ZERO, Point3i::fill(4));
//! let mut array = Array3::fill(array_extent, 0u64);
//!
//! // Write all points in the extent to the same value.
//! let write_extent = Extent3i::from_min_and_lub(Point3i::fill(1), Point3i::fill(3));
//! array.fill_extent(&write_extent, 1);
//!
//! // Only the points in the extent should have been written.
//! array.for_each(array.extent(), |p, &value| {
//!     if write_extent.contains(p) {
//!         assert_eq!(value, 1);
//!     } else {
//!         assert_eq!(value, 0);
//!     }
//! });
//! ```
//!
//! Values are laid out with X fastest, then Y, then Z, which is also the order of `Extent3i::iter_points` and the order of
//! values in a serialized block.

use label_pyramids_core::prelude::*;

/// A map from lattice location `Point3i` to data `T`, stored as a flat array on the heap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Array3<T> {
    values: Vec<T>,
    extent: Extent3i,
}

impl<T> Array3<T> {
    /// Create a new `Array3` directly from the extent and values. This asserts that the number of points in the extent
    /// matches the length of the values `Vec`.
    pub fn new(extent: Extent3i, values: Vec<T>) -> Self {
        assert_eq!(extent.num_points(), values.len());

        Self { values, extent }
    }

    /// Creates a map that fills the entire `extent` with the same `value`.
    pub fn fill(extent: Extent3i, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(extent, vec![value; extent.num_points()])
    }

    /// Create a new array for `extent` where each point's value is determined by the `filler` function.
    pub fn fill_with(extent: Extent3i, filler: impl FnMut(Point3i) -> T) -> Self {
        Self::new(extent, extent.iter_points().map(filler).collect())
    }

    #[inline]
    pub fn extent(&self) -> &Extent3i {
        &self.extent
    }

    /// Returns the entire slice of values.
    #[inline]
    pub fn values_slice(&self) -> &[T] {
        &self.values
    }

    /// Returns `true` iff this map contains point `p`.
    #[inline]
    pub fn contains(&self, p: Point3i) -> bool {
        self.extent.contains(p)
    }

    /// The flat offset of the global point `p`.
    #[inline]
    pub fn stride(&self, p: Point3i) -> usize {
        debug_assert!(self.contains(p), "{:?} is not in {:?}", p, self.extent);

        let local = p - self.extent.minimum;
        let shape = self.extent.shape;

        (local.x() + shape.x() * (local.y() + shape.y() * local.z())) as usize
    }

    /// Panics if `p` is out of bounds.
    #[inline]
    pub fn get(&self, p: Point3i) -> &T {
        &self.values[self.stride(p)]
    }

    /// Panics if `p` is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, p: Point3i) -> &mut T {
        let stride = self.stride(p);

        &mut self.values[stride]
    }

    /// Visits every point of `extent` that is also in-bounds of the array.
    pub fn for_each(&self, extent: &Extent3i, mut f: impl FnMut(Point3i, &T)) {
        for p in extent.intersection(&self.extent).iter_points() {
            f(p, self.get(p));
        }
    }

    /// Fill the in-bounds part of `extent` with the same `value`.
    pub fn fill_extent(&mut self, extent: &Extent3i, value: T)
    where
        T: Clone,
    {
        if self.extent.eq(extent) {
            self.values.fill(value);
        } else {
            for p in extent.intersection(&self.extent).iter_points() {
                *self.get_mut(p) = value.clone();
            }
        }
    }

    /// A new array over the same extent with `f` applied to every value.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Array3<U> {
        Array3 {
            values: self.values.iter().map(f).collect(),
            extent: self.extent,
        }
    }
}

/// Copy all points in `extent` from `src` to `dst`. Points outside of either array are skipped.
pub fn copy_extent<T: Clone>(extent: &Extent3i, src: &Array3<T>, dst: &mut Array3<T>) {
    let in_bounds = extent
        .intersection(src.extent())
        .intersection(dst.extent());
    for p in in_bounds.iter_points() {
        *dst.get_mut(p) = src.get(p).clone();
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
