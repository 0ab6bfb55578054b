//! A* pathfinding over a navigation grid laid on a 3D scene.
//!
//! A [`NavGrid`] samples a rectangular area of the scene into cells, asking
//! a [`Classifier`] whether each cell is walkable and how much entering it
//! costs. Searches then run between cells:
//!
//! - [`Search`] is one resumable A\* run, advanced in bounded
//!   [`steps`](Search::step) or [`run`](Search::run) to completion.
//! - [`Pathfinder`] owns a grid plus the [`SearchOptions`] every search uses,
//!   and translates world positions to cells.
//! - [`PathRequestQueue`] serves requests one at a time, in submission
//!   order, from a host-driven [`tick`](PathRequestQueue::tick).
//! - [`PathService`] runs such a queue on a worker thread behind cloneable
//!   [`PathRequester`] handles.
//!
//! Step costs are integers: [`ORTHOGONAL_COST`] for a straight move,
//! [`DIAGONAL_COST`] for a diagonal one, plus the penalty of the entered
//! cell.
//!
//! # Scene adapters
//!
//! | Type | Role |
//! |---|---|
//! | [`Classifier`] | cell centre and radius to [`Terrain`] |
//! | [`SceneProbe`] | overlap and surface queries against scene layers |
//! | [`LayerClassifier`] | [`Classifier`] built from a probe and [`GridConfig`] masks |
//! | [`AsciiScene`] | text map implementing [`SceneProbe`] |

mod astar;
mod config;
mod error;
mod grid;
mod heap;
mod heuristic;
mod node;
mod path;
mod pathfinder;
mod queue;
mod service;
mod terrain;

pub use astar::{Progress, Search, SearchState};
pub use config::GridConfig;
pub use error::{ConfigError, Endpoint, EndpointFault, PathError, ServiceError};
pub use grid::NavGrid;
pub use heap::{HeapItem, IndexedHeap};
pub use heuristic::{
    DIAGONAL_COST, Heuristic, ORTHOGONAL_COST, euclidean_squared, manhattan, octile,
};
pub use node::{Node, UNREACHABLE};
pub use path::{Path, PathResult, simplify};
pub use pathfinder::{Pathfinder, SearchOptions};
pub use queue::{PathCallback, PathRequest, PathRequestQueue};
pub use service::{PathRequester, PathService};
pub use terrain::{
    AsciiScene, Classifier, GROUND_LAYER, LayerClassifier, LayerMask, SceneProbe, Terrain,
    TerrainPenalty, WALL_LAYER,
};

pub use navgrid_core::{Point, Range, WorldPoint};
