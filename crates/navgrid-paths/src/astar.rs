//! Resumable A* search over a [`NavGrid`].
//!
//! A [`Search`] owns everything one query needs: the open set, the closed
//! flags and a scratch cost array sized to the grid. The grid itself is only
//! read, so a search can be advanced a few expansions at a time from a host
//! loop and dropped at any point without leaving state behind.

use std::time::Instant;

use navgrid_core::Point;

use crate::error::{Endpoint, EndpointFault, PathError};
use crate::grid::NavGrid;
use crate::heap::IndexedHeap;
use crate::node::{NO_PARENT, NodeState, OpenNode};
use crate::path::{Path, PathResult, simplify};
use crate::pathfinder::SearchOptions;

/// Lifecycle of a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    Succeeded,
    Failed,
}

/// Outcome of one [`Search::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The expansion budget ran out before the search ended.
    Running,
    Finished(PathResult),
}

/// One path query in progress.
#[derive(Debug)]
pub struct Search {
    start: Point,
    goal: Point,
    goal_idx: usize,
    options: SearchOptions,
    open: IndexedHeap<OpenNode>,
    states: Vec<NodeState>,
    expansions: usize,
    started: Instant,
    nbuf: Vec<Point>,
    finished: Option<PathResult>,
}

impl Search {
    /// Prepare a search from cell `start` to cell `goal`.
    ///
    /// Invalid endpoints do not panic: the search is created already failed
    /// and its first [`step`](Self::step) reports the error.
    pub fn new(grid: &NavGrid, start: Point, goal: Point, options: SearchOptions) -> Self {
        let mut search = Self {
            start,
            goal,
            goal_idx: NO_PARENT,
            options,
            open: IndexedHeap::with_capacity(0),
            states: Vec::new(),
            expansions: 0,
            started: Instant::now(),
            nbuf: Vec::with_capacity(8),
            finished: None,
        };

        let endpoints = check_endpoint(grid, Endpoint::Start, start)
            .and_then(|si| check_endpoint(grid, Endpoint::Goal, goal).map(|gi| (si, gi)));
        let (start_idx, goal_idx) = match endpoints {
            Ok(idx) => idx,
            Err(err) => {
                log::debug!("rejected search {} -> {}: {}", start, goal, err);
                search.finished = Some(Err(err));
                return search;
            }
        };

        search.goal_idx = goal_idx;
        search.open = IndexedHeap::with_capacity(grid.capacity());
        search.states = vec![NodeState::default(); grid.capacity()];

        let h = options.heuristic.distance(start, goal);
        let st = &mut search.states[start_idx];
        st.g = 0;
        st.h = h;
        search.open.insert(OpenNode {
            idx: start_idx,
            g: 0,
            h,
        });
        search
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Nodes closed so far.
    #[inline]
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Size of the open set.
    #[inline]
    pub fn frontier(&self) -> usize {
        self.open.len()
    }

    pub fn state(&self) -> SearchState {
        match &self.finished {
            None => SearchState::Searching,
            Some(Ok(_)) => SearchState::Succeeded,
            Some(Err(_)) => SearchState::Failed,
        }
    }

    /// Advance by up to `budget` expansions (at least one).
    ///
    /// `grid` must be the grid the search was created on. Once finished, the
    /// same result is returned on every further call.
    pub fn step(&mut self, grid: &NavGrid, budget: usize) -> Progress {
        if let Some(result) = &self.finished {
            return Progress::Finished(result.clone());
        }
        for _ in 0..budget.max(1) {
            match self.expand(grid) {
                Ok(false) => {}
                Ok(true) => {
                    let path = self.build_path(grid);
                    return self.finish(Ok(path));
                }
                Err(err) => return self.finish(Err(err)),
            }
        }
        Progress::Running
    }

    /// Step until finished.
    pub fn run(&mut self, grid: &NavGrid) -> PathResult {
        loop {
            if let Progress::Finished(result) = self.step(grid, usize::MAX) {
                return result;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Close the best open node and relax its neighbours. Returns `true`
    /// when the goal was closed.
    fn expand(&mut self, grid: &NavGrid) -> Result<bool, PathError> {
        if self.open.is_empty() {
            return Err(PathError::UnreachableGoal);
        }
        let current = self.open.extract_best()?;
        let ci = current.idx;
        self.states[ci].closed = true;
        self.expansions += 1;

        if ci == self.goal_idx {
            return Ok(true);
        }
        if let Some(limit) = self.options.max_expansions {
            if self.expansions >= limit {
                return Err(PathError::ExpansionLimit { limit });
            }
        }

        let cp = grid.point(ci);
        let current_g = self.states[ci].g;
        let heuristic = self.options.heuristic;

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        grid.neighbors(cp, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = grid.idx(np) else {
                continue;
            };
            let node = &grid.nodes()[ni];
            if !node.walkable || self.states[ni].closed {
                continue;
            }
            if !self.options.corner_cutting && !diagonal_clear(grid, cp, np) {
                continue;
            }

            // Saturate rather than wrap when penalties are near i32::MAX.
            let tentative_g = current_g
                .saturating_add(heuristic.distance(cp, np))
                .saturating_add(node.penalty);
            let in_open = self.open.contains_key(ni);
            if in_open && tentative_g >= self.states[ni].g {
                continue;
            }

            let h = heuristic.distance(np, self.goal);
            let st = &mut self.states[ni];
            st.g = tentative_g;
            st.h = h;
            st.parent = ci;

            let entry = OpenNode {
                idx: ni,
                g: tentative_g,
                h,
            };
            if in_open {
                self.open.update_item(entry);
            } else {
                self.open.insert(entry);
            }
        }

        self.nbuf = nbuf;
        Ok(false)
    }

    fn build_path(&self, grid: &NavGrid) -> Path {
        let mut cells = Vec::new();
        let mut ci = self.goal_idx;
        while ci != NO_PARENT {
            cells.push(grid.point(ci));
            ci = self.states[ci].parent;
        }
        cells.reverse();

        let waypoints = simplify(&cells)
            .into_iter()
            .skip(1)
            .map(|p| grid.world_point(p))
            .collect();

        Path {
            cells,
            waypoints,
            cost: self.states[self.goal_idx].g,
            expansions: self.expansions,
        }
    }

    fn finish(&mut self, result: PathResult) -> Progress {
        let elapsed = self.started.elapsed();
        match &result {
            Ok(path) => log::info!(
                "path found {} -> {}: {} waypoints, cost {}, {} expansions, {}ms",
                self.start,
                self.goal,
                path.waypoints.len(),
                path.cost,
                path.expansions,
                elapsed.as_millis()
            ),
            Err(PathError::ExpansionLimit { limit }) => log::warn!(
                "search {} -> {} abandoned after {} expansions",
                self.start,
                self.goal,
                limit
            ),
            Err(err) => log::debug!(
                "search {} -> {} failed after {} expansions: {}",
                self.start,
                self.goal,
                self.expansions,
                err
            ),
        }
        // The open set and scratch costs are no longer needed.
        self.open = IndexedHeap::with_capacity(0);
        self.states = Vec::new();
        self.finished = Some(result.clone());
        Progress::Finished(result)
    }
}

fn check_endpoint(grid: &NavGrid, endpoint: Endpoint, cell: Point) -> Result<usize, PathError> {
    let fault = |reason| PathError::InvalidEndpoint {
        endpoint,
        cell,
        reason,
    };
    let idx = grid.idx(cell).ok_or_else(|| fault(EndpointFault::OutOfBounds))?;
    if !grid.nodes()[idx].walkable {
        return Err(fault(EndpointFault::Unwalkable));
    }
    Ok(idx)
}

/// Whether a step from `from` to `to` avoids squeezing past a blocked cell.
/// Orthogonal steps always pass.
fn diagonal_clear(grid: &NavGrid, from: Point, to: Point) -> bool {
    let d = to - from;
    if d.x == 0 || d.y == 0 {
        return true;
    }
    grid.is_walkable(from.shift(d.x, 0)) && grid.is_walkable(from.shift(0, d.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::heuristic::{Heuristic, octile};
    use crate::terrain::Terrain;
    use navgrid_core::WorldPoint;
    use rand::{Rng, SeedableRng};
    use std::cmp::Reverse;
    use std::collections::{BinaryHeap, HashSet};

    fn config(w: i32, h: i32) -> GridConfig {
        GridConfig {
            world_size: [w as f32, h as f32],
            node_radius: 0.5,
            ..GridConfig::default()
        }
    }

    fn grid_with_walls(w: i32, h: i32, walls: &[(i32, i32)]) -> NavGrid {
        let walls: HashSet<Point> = walls.iter().map(|&(x, y)| Point::new(x, y)).collect();
        NavGrid::with_cells(&config(w, h), |p| {
            if walls.contains(&p) {
                Terrain::BLOCKED
            } else {
                Terrain::OPEN
            }
        })
        .unwrap()
    }

    fn search(grid: &NavGrid, from: (i32, i32), to: (i32, i32)) -> PathResult {
        search_with(grid, from, to, SearchOptions::default())
    }

    fn search_with(
        grid: &NavGrid,
        from: (i32, i32),
        to: (i32, i32),
        options: SearchOptions,
    ) -> PathResult {
        let mut s = Search::new(
            grid,
            Point::new(from.0, from.1),
            Point::new(to.0, to.1),
            options,
        );
        s.run(grid)
    }

    /// Cost of walking `cells` under the octile + penalty model.
    fn walked_cost(grid: &NavGrid, cells: &[Point]) -> i32 {
        cells
            .windows(2)
            .map(|w| octile(w[0], w[1]) + grid.node(w[1]).unwrap().penalty)
            .sum()
    }

    /// Plain Dijkstra with the same movement model, as a reference.
    fn dijkstra_cost(grid: &NavGrid, from: Point, to: Point) -> Option<i32> {
        let mut dist = vec![i32::MAX; grid.capacity()];
        let mut heap = BinaryHeap::new();
        let si = grid.idx(from)?;
        dist[si] = 0;
        heap.push(Reverse((0, si)));
        while let Some(Reverse((d, i))) = heap.pop() {
            if d > dist[i] {
                continue;
            }
            let p = grid.point(i);
            if p == to {
                return Some(d);
            }
            for n in grid.neighbors_of(p) {
                let node = grid.node(n).unwrap();
                if !node.walkable {
                    continue;
                }
                let nd = d + octile(p, n) + node.penalty;
                let ni = grid.idx(n).unwrap();
                if nd < dist[ni] {
                    dist[ni] = nd;
                    heap.push(Reverse((nd, ni)));
                }
            }
        }
        None
    }

    #[test]
    fn open_grid_diagonal() {
        let grid = grid_with_walls(5, 5, &[]);
        let path = search(&grid, (0, 0), (4, 4)).unwrap();
        assert_eq!(path.cost, 56);
        assert_eq!(path.cells.len(), 5);
        assert_eq!(path.cells.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.cells.last(), Some(&Point::new(4, 4)));
        assert_eq!(path.waypoints, vec![grid.world_point(Point::new(4, 4))]);
    }

    #[test]
    fn wall_forces_detour_through_gap() {
        let grid = grid_with_walls(5, 5, &[(2, 0), (2, 1), (2, 2), (2, 3)]);
        let path = search(&grid, (0, 0), (4, 4)).unwrap();
        let cells: Vec<Point> = [(0, 0), (1, 1), (1, 2), (1, 3), (2, 4), (3, 4), (4, 4)]
            .iter()
            .map(|&(x, y)| Point::new(x, y))
            .collect();
        assert_eq!(path.cells, cells);
        assert_eq!(path.cost, 68);
        assert_eq!(walked_cost(&grid, &path.cells), path.cost);
        // Turns at (1, 1), (1, 3) and (2, 4), then the goal.
        let turns = [(1, 1), (1, 3), (2, 4), (4, 4)];
        let expected: Vec<WorldPoint> = turns
            .iter()
            .map(|&(x, y)| grid.world_point(Point::new(x, y)))
            .collect();
        assert_eq!(path.waypoints, expected);
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let ring = [
            (2, 2),
            (3, 2),
            (4, 2),
            (2, 3),
            (4, 3),
            (2, 4),
            (3, 4),
            (4, 4),
        ];
        let grid = grid_with_walls(6, 6, &ring);
        assert_eq!(
            search(&grid, (0, 0), (3, 3)),
            Err(PathError::UnreachableGoal)
        );
    }

    #[test]
    fn unwalkable_endpoints_are_rejected() {
        let grid = grid_with_walls(5, 5, &[(0, 0), (4, 4)]);
        let err = search(&grid, (0, 0), (2, 2)).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidEndpoint {
                endpoint: Endpoint::Start,
                cell: Point::new(0, 0),
                reason: EndpointFault::Unwalkable,
            }
        );
        let mut s = Search::new(&grid, Point::new(1, 1), Point::new(4, 4), SearchOptions::default());
        assert_eq!(s.state(), SearchState::Failed);
        assert_eq!(s.frontier(), 0);
        assert!(matches!(
            s.step(&grid, 1),
            Progress::Finished(Err(PathError::InvalidEndpoint {
                endpoint: Endpoint::Goal,
                ..
            }))
        ));
        assert_eq!(s.expansions(), 0);
    }

    #[test]
    fn out_of_bounds_endpoints_are_rejected() {
        let grid = grid_with_walls(3, 3, &[]);
        assert!(matches!(
            search(&grid, (0, 0), (7, 1)),
            Err(PathError::InvalidEndpoint {
                endpoint: Endpoint::Goal,
                reason: EndpointFault::OutOfBounds,
                ..
            })
        ));
    }

    #[test]
    fn start_equals_goal() {
        let grid = grid_with_walls(3, 3, &[]);
        let path = search(&grid, (1, 1), (1, 1)).unwrap();
        assert_eq!(path.cost, 0);
        assert_eq!(path.cells, vec![Point::new(1, 1)]);
        assert!(path.waypoints.is_empty());
    }

    #[test]
    fn penalties_steer_the_path() {
        // A costly band across the middle row except at the far right.
        let grid = NavGrid::with_cells(&config(5, 3), |p| {
            if p.y == 1 && p.x < 4 {
                Terrain::with_penalty(100)
            } else {
                Terrain::OPEN
            }
        })
        .unwrap();
        let path = search(&grid, (0, 0), (0, 2)).unwrap();
        assert!(path.cells.contains(&Point::new(4, 1)));
        assert_eq!(walked_cost(&grid, &path.cells), path.cost);
        assert_eq!(Some(path.cost), dijkstra_cost(&grid, Point::new(0, 0), Point::new(0, 2)));
    }

    #[test]
    fn corner_cutting_policy() {
        let grid = grid_with_walls(2, 2, &[(1, 0), (0, 1)]);
        let path = search(&grid, (0, 0), (1, 1)).unwrap();
        assert_eq!(path.cost, 14);

        let strict = SearchOptions {
            corner_cutting: false,
            ..SearchOptions::default()
        };
        assert_eq!(
            search_with(&grid, (0, 0), (1, 1), strict),
            Err(PathError::UnreachableGoal)
        );
    }

    #[test]
    fn no_corner_cutting_goes_around() {
        let grid = grid_with_walls(3, 3, &[(1, 0)]);
        let strict = SearchOptions {
            corner_cutting: false,
            ..SearchOptions::default()
        };
        let path = search_with(&grid, (0, 0), (2, 0), strict).unwrap();
        for w in path.cells.windows(2) {
            assert!(diagonal_clear(&grid, w[0], w[1]));
        }
        // (0,0) -> (0,1) -> (1,1) -> (2,1) -> (2,0)
        assert_eq!(path.cost, 40);
    }

    #[test]
    fn expansion_limit_stops_search() {
        let grid = grid_with_walls(10, 10, &[]);
        let capped = SearchOptions {
            max_expansions: Some(3),
            ..SearchOptions::default()
        };
        assert_eq!(
            search_with(&grid, (0, 0), (9, 9), capped),
            Err(PathError::ExpansionLimit { limit: 3 })
        );
        let roomy = SearchOptions {
            max_expansions: Some(100),
            ..SearchOptions::default()
        };
        assert!(search_with(&grid, (0, 0), (9, 9), roomy).is_ok());
    }

    #[test]
    fn stepping_matches_run() {
        let grid = grid_with_walls(8, 8, &[(3, 1), (3, 2), (3, 3), (3, 4), (3, 5), (3, 6)]);
        let whole = search(&grid, (0, 3), (7, 3)).unwrap();

        let mut s = Search::new(&grid, Point::new(0, 3), Point::new(7, 3), SearchOptions::default());
        let mut ticks = 0;
        let stepped = loop {
            assert_eq!(s.state(), SearchState::Searching);
            match s.step(&grid, 1) {
                Progress::Running => ticks += 1,
                Progress::Finished(r) => break r.unwrap(),
            }
        };
        assert!(ticks > 1);
        assert_eq!(stepped, whole);
        assert_eq!(s.state(), SearchState::Succeeded);
        // Finished searches keep answering the same result.
        assert_eq!(s.step(&grid, 1), Progress::Finished(Ok(whole)));
    }

    #[test]
    fn manhattan_heuristic_still_finds_paths() {
        let grid = grid_with_walls(5, 5, &[]);
        let opts = SearchOptions {
            heuristic: Heuristic::Manhattan,
            ..SearchOptions::default()
        };
        let path = search_with(&grid, (0, 0), (4, 0), opts).unwrap();
        assert_eq!(path.cost, 4);
        assert_eq!(path.cells.len(), 5);
    }

    #[test]
    fn huge_penalty_saturates_cost() {
        let cfg = config(3, 1);
        let grid = NavGrid::with_cells(&cfg, |p| {
            if p.x == 1 {
                Terrain::with_penalty(i32::MAX)
            } else {
                Terrain::OPEN
            }
        })
        .unwrap();
        let path = search(&grid, (0, 0), (2, 0)).unwrap();
        assert_eq!(path.cells.len(), 3);
        assert_eq!(path.cost, i32::MAX);

        // With a second row the costly cell is simply avoided.
        let grid = NavGrid::with_cells(&config(3, 2), |p| {
            if p == Point::new(1, 0) {
                Terrain::with_penalty(i32::MAX)
            } else {
                Terrain::OPEN
            }
        })
        .unwrap();
        let path = search(&grid, (0, 0), (2, 0)).unwrap();
        assert_eq!(path.cost, 28);
        assert!(!path.cells.contains(&Point::new(1, 0)));
    }

    #[test]
    fn euclidean_on_very_long_row() {
        let grid = NavGrid::open(&config(50_000, 1)).unwrap();
        let opts = SearchOptions {
            heuristic: Heuristic::Euclidean,
            ..SearchOptions::default()
        };
        let path = search_with(&grid, (0, 0), (49_999, 0), opts).unwrap();
        assert_eq!(path.cost, 49_999);
        assert_eq!(path.waypoints, vec![grid.world_point(Point::new(49_999, 0))]);
    }

    #[test]
    fn matches_dijkstra_on_random_grids() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let (w, h) = (5, 5);
            let cells = (w * h) as usize;
            let blocked: Vec<bool> = (0..cells).map(|_| rng.random_range(0..4) == 0).collect();
            let penalty: Vec<i32> = (0..cells).map(|_| rng.random_range(0..3) * 5).collect();
            let grid = NavGrid::with_cells(&config(w, h), |p| {
                let i = (p.y * w + p.x) as usize;
                if blocked[i] {
                    Terrain::BLOCKED
                } else {
                    Terrain::with_penalty(penalty[i])
                }
            })
            .unwrap();

            let from = Point::new(rng.random_range(0..w), rng.random_range(0..h));
            let to = Point::new(rng.random_range(0..w), rng.random_range(0..h));
            if !grid.is_walkable(from) || !grid.is_walkable(to) {
                continue;
            }

            let mut s = Search::new(&grid, from, to, SearchOptions::default());
            match (s.run(&grid), dijkstra_cost(&grid, from, to)) {
                (Ok(path), Some(best)) => {
                    assert_eq!(path.cost, best, "{from} -> {to}");
                    assert_eq!(walked_cost(&grid, &path.cells), path.cost);
                    assert!(path.cells.iter().all(|&c| grid.is_walkable(c)));
                }
                (Err(PathError::UnreachableGoal), None) => {}
                (got, want) => panic!("{from} -> {to}: got {got:?}, dijkstra {want:?}"),
            }
        }
    }
}
