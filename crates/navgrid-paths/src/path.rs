use navgrid_core::{Point, WorldPoint};

use crate::error::PathError;

/// A successful search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Every cell from start to goal, both included.
    pub cells: Vec<Point>,
    /// Turning points and the goal in world space, start excluded. An agent
    /// standing on the start cell walks these in order.
    pub waypoints: Vec<WorldPoint>,
    /// Accumulated cost at the goal: step distances plus entered-cell
    /// penalties.
    pub cost: i32,
    /// Number of nodes closed during the search.
    pub expansions: usize,
}

/// What a search reports. `Ok` is the success case; an `Err` never carries
/// waypoints.
pub type PathResult = Result<Path, PathError>;

/// Drop collinear interior points.
///
/// Keeps the first point, every point where the step direction (sign of the
/// coordinate delta) changes, and the last point. Running it on its own
/// output changes nothing.
pub fn simplify(cells: &[Point]) -> Vec<Point> {
    let Some((&first, rest)) = cells.split_first() else {
        return Vec::new();
    };
    let mut out = vec![first];
    let mut prev = first;
    let mut dir: Option<Point> = None;
    for &p in rest {
        let d = (p - prev).signum();
        if d == Point::ZERO {
            continue;
        }
        if dir.is_some_and(|old| old != d) {
            out.push(prev);
        }
        dir = Some(d);
        prev = p;
    }
    if prev != first {
        out.push(prev);
    }
    out
}
