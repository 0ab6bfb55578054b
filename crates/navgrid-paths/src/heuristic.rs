use navgrid_core::Point;

/// Cost of an orthogonal step in octile units.
pub const ORTHOGONAL_COST: i32 = 10;
/// Cost of a diagonal step in octile units (10·√2 rounded).
pub const DIAGONAL_COST: i32 = 14;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Squared Euclidean distance. Orders points like the true distance without
/// taking a square root. Saturates at `i32::MAX` for far-apart points.
#[inline]
pub fn euclidean_squared(a: Point, b: Point) -> i32 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    i32::try_from(dx * dx + dy * dy).unwrap_or(i32::MAX)
}

/// Octile distance scaled to integers: diagonal steps cost
/// [`DIAGONAL_COST`], orthogonal steps [`ORTHOGONAL_COST`].
#[inline]
pub fn octile(a: Point, b: Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    DIAGONAL_COST * lo + ORTHOGONAL_COST * (hi - lo)
}

/// Distance estimator used both for the step cost between adjacent cells and
/// for the estimate to the goal.
///
/// Only [`Heuristic::Octile`] matches the 8-connected movement model exactly;
/// the other two are kept for comparison runs and small experiments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Heuristic {
    Manhattan,
    Euclidean,
    #[default]
    Octile,
}

impl Heuristic {
    #[inline]
    pub fn distance(self, a: Point, b: Point) -> i32 {
        match self {
            Self::Manhattan => manhattan(a, b),
            Self::Euclidean => euclidean_squared(a, b),
            Self::Octile => octile(a, b),
        }
    }
}
