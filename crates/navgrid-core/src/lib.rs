//! Geometry shared by the navgrid crates.
//!
//! Grid cells are addressed with integer [`Point`]s inside a half-open
//! [`Range`]. Positions in the simulated scene are [`WorldPoint`]s; the grid
//! only looks at their horizontal `x`/`z` components.

pub mod geom;
pub mod world;

pub use geom::{Point, Range};
pub use world::WorldPoint;
