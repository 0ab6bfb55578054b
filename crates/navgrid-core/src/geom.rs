//! Grid geometry: [`Point`] and [`Range`].
//!
//! `x` runs along the world X axis and `y` along the world Z axis, so a grid
//! laid over the ground plane keeps its orientation when viewed from above.

use std::fmt;
use std::ops::{Add, Sub};

/// Unit steps to the eight surrounding cells, lowest row first.
const AROUND: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A cell coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Each axis collapsed to -1, 0 or 1. On the delta between two cells
    /// this is the unit step direction.
    #[inline]
    pub const fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// The eight cells touching `self` by an edge or a corner, lowest row
    /// first. Bounds are not checked.
    pub fn neighbors_8(self) -> impl Iterator<Item = Point> {
        AROUND.into_iter().map(move |(dx, dy)| self.shift(dx, dy))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.shift(rhs.x, rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.shift(-rhs.x, -rhs.y)
    }
}

/// Cells `min.x..max.x` by `min.y..max.y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Range spanning two corners, in any order. `max` is exclusive.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// `width` by `height` cells starting at the origin.
    #[inline]
    pub fn with_size(width: i32, height: i32) -> Self {
        Self::new(Point::ZERO, Point::new(width, height))
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Number of cells.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Every cell, row by row from `min`. This is the storage order of
    /// row-major grids.
    pub fn points(self) -> impl ExactSizeIterator<Item = Point> {
        let width = self.width().max(0) as usize;
        let min = self.min;
        (0..self.len()).map(move |i| min.shift((i % width) as i32, (i / width) as i32))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn range_as_json() {
        let r = Range::with_size(10, 20);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"min":{"x":0,"y":0},"max":{"x":10,"y":20}}"#);
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
