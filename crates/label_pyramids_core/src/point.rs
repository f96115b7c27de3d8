use crate::int_math::{div_ceil, div_floor};

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// A lattice point, which is just a primitive array of type `N`. Volumes are 3-dimensional, so the only instantiation with
/// arithmetic is `Point3i`.
///
/// ```
/// use label_pyramids_core::prelude::*;
///
/// let p1 = PointN([1, 2, 3]);
/// let p2 = PointN([3, 4, 5]);
///
/// assert_eq!(p1 + p2, PointN([4, 6, 8]));
/// assert_eq!(p2 - p1, PointN([2, 2, 2]));
/// assert_eq!(p1 * 2, PointN([2, 4, 6]));
/// ```
///
/// There is also a partial order defined on points which says that a point A is greater than a point B if and only if all
/// of the components of point A are greater than point B. This is what makes extent containment checks read naturally:
///
/// ```
/// use label_pyramids_core::prelude::*;
///
/// let min = Point3i::ZERO;
/// let least_upper_bound = Point3i::fill(3);
///
/// let p = PointN([0, 1, 2]);
/// assert!(min <= p && p < least_upper_bound);
/// ```
#[derive(Copy, Clone, Debug, Deserialize, Default, Eq, Hash, PartialEq, Serialize)]
pub struct PointN<N>(pub N);

/// A 3-dimensional point with scalar type `i32`. Used both for voxel coordinates and for block grid coordinates.
pub type Point3i = PointN<[i32; 3]>;

impl Point3i {
    pub const ZERO: Self = PointN([0; 3]);
    pub const ONES: Self = PointN([1; 3]);

    #[inline]
    pub const fn fill(value: i32) -> Self {
        PointN([value; 3])
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.0[2]
    }

    /// Components in reverse order. Sorting by this key gives the same order as iterating an extent (X fastest).
    #[inline]
    pub fn zyx(&self) -> [i32; 3] {
        [self.z(), self.y(), self.x()]
    }

    /// Returns the component specified by index. I.e. X = 0, Y = 1, Z = 2.
    #[inline]
    pub fn at(&self, component_index: usize) -> i32 {
        self.0[component_index]
    }

    /// Returns the point after applying `f` component-wise.
    #[inline]
    pub fn map_components(&self, f: impl Fn(i32) -> i32) -> Self {
        PointN([f(self.x()), f(self.y()), f(self.z())])
    }

    /// Returns the point after applying `f` to each pair of components.
    #[inline]
    pub fn zip_map(&self, other: &Self, f: impl Fn(i32, i32) -> i32) -> Self {
        PointN([
            f(self.x(), other.x()),
            f(self.y(), other.y()),
            f(self.z(), other.z()),
        ])
    }

    /// The component-wise maximum.
    #[inline]
    pub fn join(&self, other: &Self) -> Self {
        self.zip_map(other, core::cmp::max)
    }

    /// The component-wise minimum.
    #[inline]
    pub fn meet(&self, other: &Self) -> Self {
        self.zip_map(other, core::cmp::min)
    }

    /// The product of all components. Widened so large volumes don't overflow.
    #[inline]
    pub fn volume(&self) -> i64 {
        self.0.iter().map(|&c| c as i64).product()
    }

    #[inline]
    pub fn vector_div_floor(&self, rhs: &Self) -> Self {
        self.zip_map(rhs, div_floor)
    }

    #[inline]
    pub fn vector_div_ceil(&self, rhs: &Self) -> Self {
        self.zip_map(rhs, div_ceil)
    }

    #[inline]
    pub fn all_components(&self, f: impl Fn(i32) -> bool) -> bool {
        self.0.iter().all(|&c| f(c))
    }

    #[inline]
    pub fn any_component(&self, f: impl Fn(i32) -> bool) -> bool {
        self.0.iter().any(|&c| f(c))
    }

    /// Widens the components for attribute storage, where dimensions are conventionally 64-bit.
    #[inline]
    pub fn to_i64_array(&self) -> [i64; 3] {
        [self.x() as i64, self.y() as i64, self.z() as i64]
    }
}

impl From<[i32; 3]> for Point3i {
    #[inline]
    fn from(components: [i32; 3]) -> Self {
        PointN(components)
    }
}

impl PartialOrd for Point3i {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.lt(other) {
            Some(Ordering::Less)
        } else if self.gt(other) {
            Some(Ordering::Greater)
        } else if self.eq(other) {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    #[inline]
    fn lt(&self, other: &Self) -> bool {
        self.x() < other.x() && self.y() < other.y() && self.z() < other.z()
    }

    #[inline]
    fn gt(&self, other: &Self) -> bool {
        self.x() > other.x() && self.y() > other.y() && self.z() > other.z()
    }

    #[inline]
    fn le(&self, other: &Self) -> bool {
        self.x() <= other.x() && self.y() <= other.y() && self.z() <= other.z()
    }

    #[inline]
    fn ge(&self, other: &Self) -> bool {
        self.x() >= other.x() && self.y() >= other.y() && self.z() >= other.z()
    }
}

impl Add for Point3i {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.zip_map(&rhs, |a, b| a + b)
    }
}

impl Sub for Point3i {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.zip_map(&rhs, |a, b| a - b)
    }
}

impl Mul for Point3i {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.zip_map(&rhs, |a, b| a * b)
    }
}

impl Mul<i32> for Point3i {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: i32) -> Self {
        self.map_components(|c| c * rhs)
    }
}

impl Mul<Point3i> for i32 {
    type Output = Point3i;

    #[inline]
    fn mul(self, rhs: Point3i) -> Point3i {
        rhs * self
    }
}

/// Truncating division, same as the scalar operator. Use `vector_div_floor` or `vector_div_ceil` when rounding matters.
impl Div for Point3i {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.zip_map(&rhs, |a, b| a / b)
    }
}

impl Div<i32> for Point3i {
    type Output = Self;

    #[inline]
    fn div(self, rhs: i32) -> Self {
        self.map_components(|c| c / rhs)
    }
}

impl AddAssign for Point3i {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Point3i {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
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
    fn partial_order_is_component_wise() {
        let a = PointN([0, 0, 0]);
        let b = PointN([1, 2, 3]);
        let c = PointN([2, 0, 5]);

        assert!(a < b);
        assert!(a <= c);
        assert!(!(a < c));
        assert_eq!(b.partial_cmp(&c), None);
    }

    #[test]
    fn rounding_division() {
        let dims = PointN([5, 4, 4]);
        let two = Point3i::fill(2);

        assert_eq!(dims.vector_div_floor(&two), PointN([2, 2, 2]));
        assert_eq!(dims.vector_div_ceil(&two), PointN([3, 2, 2]));
        assert_eq!(dims.vector_div_ceil(&Point3i::fill(3)), PointN([2, 2, 2]));
    }

    #[test]
    fn volume_does_not_overflow() {
        let p = Point3i::fill(4096);

        assert_eq!(p.volume(), 4096 * 4096 * 4096);
    }

    #[test]
    fn serializes_as_plain_array() {
        let p = PointN([3, 2, 1]);
        let json = serde_json::to_string(&p).unwrap();

        assert_eq!(json, "[3,2,1]");
        assert_eq!(serde_json::from_str::<Point3i>(&json).unwrap(), p);
    }
}
