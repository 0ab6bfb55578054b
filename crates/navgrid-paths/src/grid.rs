//! The navigation grid: a fixed rectangle of [`Node`]s laid over the scene.

use navgrid_core::{Point, Range, WorldPoint};

use crate::config::GridConfig;
use crate::error::ConfigError;
use crate::node::Node;
use crate::terrain::{Classifier, Terrain};

/// Owns the cells of one scene. Built once; never resized or mutated by
/// searches, which keep their costs in separate scratch storage.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavGrid {
    rng: Range,
    width: usize,
    nodes: Vec<Node>,
    world_size: [f32; 2],
    origin: WorldPoint,
    node_radius: f32,
}

impl NavGrid {
    /// Build a grid, asking `classifier` about every cell centre.
    pub fn new<C>(config: &GridConfig, classifier: &C) -> Result<Self, ConfigError>
    where
        C: Classifier + ?Sized,
    {
        let radius = config.node_radius;
        Self::build(config, |_, center| classifier.classify(center, radius))
    }

    /// Build a grid with terrain given per grid coordinate.
    pub fn with_cells(
        config: &GridConfig,
        terrain: impl Fn(Point) -> Terrain,
    ) -> Result<Self, ConfigError> {
        Self::build(config, |p, _| terrain(p))
    }

    /// A grid where every cell is walkable and free.
    pub fn open(config: &GridConfig) -> Result<Self, ConfigError> {
        Self::with_cells(config, |_| Terrain::OPEN)
    }

    fn build(
        config: &GridConfig,
        terrain: impl Fn(Point, WorldPoint) -> Terrain,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (w, h) = config.grid_size();
        let mut grid = Self {
            rng: Range::with_size(w, h),
            width: w as usize,
            nodes: Vec::with_capacity((w as usize) * (h as usize)),
            world_size: config.world_size,
            origin: config.origin,
            node_radius: config.node_radius,
        };
        let mut blocked = 0usize;
        for p in grid.rng.points() {
            let world = grid.world_point(p);
            let t = terrain(p, world);
            if !t.walkable {
                blocked += 1;
            }
            grid.nodes.push(Node {
                pos: p,
                walkable: t.walkable,
                world,
                penalty: t.penalty.max(0),
            });
        }
        log::debug!(
            "built {}x{} navigation grid, {} of {} cells blocked",
            w,
            h,
            blocked,
            grid.nodes.len()
        );
        Ok(grid)
    }

    // -----------------------------------------------------------------------
    // Dimensions
    // -----------------------------------------------------------------------

    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.rng.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.rng.height()
    }

    /// Total number of cells. A search never holds more open nodes than this.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    #[inline]
    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    // -----------------------------------------------------------------------
    // Cells
    // -----------------------------------------------------------------------

    #[inline]
    pub fn node(&self, p: Point) -> Option<&Node> {
        self.idx(p).map(|i| &self.nodes[i])
    }

    /// All cells in row-major order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether `p` is inside the grid and walkable.
    #[inline]
    pub fn is_walkable(&self, p: Point) -> bool {
        self.node(p).is_some_and(|n| n.walkable)
    }

    /// Every in-bounds cell of the 3×3 block around `p`, excluding `p`.
    /// Walkability is not considered.
    pub fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_8() {
            if self.rng.contains(n) {
                buf.push(n);
            }
        }
    }

    /// Owned-vector form of [`neighbors`](Self::neighbors).
    pub fn neighbors_of(&self, p: Point) -> Vec<Point> {
        let mut buf = Vec::with_capacity(8);
        self.neighbors(p, &mut buf);
        buf
    }

    // -----------------------------------------------------------------------
    // World mapping
    // -----------------------------------------------------------------------

    /// World-space centre of cell `p`.
    pub fn world_point(&self, p: Point) -> WorldPoint {
        let d = self.node_diameter();
        let [w, depth] = self.world_size;
        WorldPoint::new(
            self.origin.x - w / 2.0 + (p.x as f32 + 0.5) * d,
            self.origin.y,
            self.origin.z - depth / 2.0 + (p.y as f32 + 0.5) * d,
        )
    }

    /// Cell containing `world`. Positions outside the covered area map to
    /// the nearest edge cell.
    pub fn node_at(&self, world: WorldPoint) -> Point {
        let [w, depth] = self.world_size;
        let px = ((world.x - self.origin.x) / w + 0.5).clamp(0.0, 1.0);
        let py = ((world.z - self.origin.z) / depth + 0.5).clamp(0.0, 1.0);
        let x = ((self.width() - 1) as f32 * px).round() as i32;
        let y = ((self.height() - 1) as f32 * py).round() as i32;
        Point::new(x, y)
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Convert a `Point` to a flat index. Returns `None` if out of range.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        if !self.rng.contains(p) {
            return None;
        }
        Some(p.y as usize * self.width + p.x as usize)
    }

    /// Convert a flat index back to a `Point`.
    #[inline]
    pub(crate) fn point(&self, idx: usize) -> Point {
        Point::new((idx % self.width) as i32, (idx / self.width) as i32)
    }
}
