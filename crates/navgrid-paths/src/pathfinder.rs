use navgrid_core::{Point, WorldPoint};

use crate::astar::Search;
use crate::config::GridConfig;
use crate::error::ConfigError;
use crate::grid::NavGrid;
use crate::heuristic::Heuristic;
use crate::path::PathResult;
use crate::terrain::Classifier;

/// Per-search knobs, taken from [`GridConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub heuristic: Heuristic,
    pub corner_cutting: bool,
    pub max_expansions: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Octile,
            corner_cutting: true,
            max_expansions: None,
        }
    }
}

impl From<&GridConfig> for SearchOptions {
    fn from(config: &GridConfig) -> Self {
        Self {
            heuristic: config.heuristic,
            corner_cutting: config.corner_cutting,
            max_expansions: config.max_expansions,
        }
    }
}

/// A grid plus the options every search on it uses.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: NavGrid,
    options: SearchOptions,
}

impl Pathfinder {
    pub fn new(grid: NavGrid, options: SearchOptions) -> Self {
        Self { grid, options }
    }

    /// Build the grid described by `config` and take the search options from
    /// the same config.
    pub fn from_config<C>(config: &GridConfig, classifier: &C) -> Result<Self, ConfigError>
    where
        C: Classifier + ?Sized,
    {
        let grid = NavGrid::new(config, classifier)?;
        Ok(Self::new(grid, SearchOptions::from(config)))
    }

    #[inline]
    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    #[inline]
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Begin a search between two world positions. Positions outside the
    /// grid snap to the nearest edge cell.
    pub fn start_search(&self, start: WorldPoint, goal: WorldPoint) -> Search {
        self.start_search_cells(self.grid.node_at(start), self.grid.node_at(goal))
    }

    /// Begin a search between two cells.
    pub fn start_search_cells(&self, start: Point, goal: Point) -> Search {
        Search::new(&self.grid, start, goal, self.options)
    }

    /// Search between two world positions to completion.
    pub fn find_path(&self, start: WorldPoint, goal: WorldPoint) -> PathResult {
        self.start_search(start, goal).run(&self.grid)
    }

    /// Search between two cells to completion.
    pub fn find_path_cells(&self, start: Point, goal: Point) -> PathResult {
        self.start_search_cells(start, goal).run(&self.grid)
    }
}
