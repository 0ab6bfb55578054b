//! Cell classification: the boundary between the grid and the scene.
//!
//! The grid never looks at scene geometry itself. While it is being built it
//! asks a [`Classifier`] for the [`Terrain`] under every cell centre. Hosts
//! either implement [`Classifier`] directly (closures work) or provide a
//! [`SceneProbe`] answering physics-style layer queries and wrap it in a
//! [`LayerClassifier`], which applies the configured masks and penalties.

use std::fmt;
use std::ops::BitOr;

use navgrid_core::WorldPoint;

use crate::config::GridConfig;

/// Walkability and movement penalty of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terrain {
    pub walkable: bool,
    pub penalty: i32,
}

impl Terrain {
    pub const OPEN: Self = Self {
        walkable: true,
        penalty: 0,
    };

    pub const BLOCKED: Self = Self {
        walkable: false,
        penalty: 0,
    };

    /// Walkable terrain with an extra entry cost.
    #[inline]
    pub const fn with_penalty(penalty: i32) -> Self {
        Self {
            walkable: true,
            penalty,
        }
    }
}

/// Decides the terrain under a cell.
pub trait Classifier {
    /// Classify the cell whose centre is `center`. `radius` is half the
    /// cell's width.
    fn classify(&self, center: WorldPoint, radius: f32) -> Terrain;
}

impl<F> Classifier for F
where
    F: Fn(WorldPoint) -> Terrain,
{
    #[inline]
    fn classify(&self, center: WorldPoint, _radius: f32) -> Terrain {
        self(center)
    }
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// A set of scene layers (0..32) as a bit mask.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);

    /// Mask holding a single layer. Layers past 31 yield an empty mask.
    #[inline]
    pub const fn layer(layer: u8) -> Self {
        if layer < 32 {
            Self(1 << layer)
        } else {
            Self::NONE
        }
    }

    #[inline]
    pub const fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for LayerMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerMask({:#034b})", self.0)
    }
}

/// Movement penalty applied to cells whose surface is on `layer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainPenalty {
    pub layer: u8,
    pub penalty: i32,
}

/// Physics queries a scene answers for grid construction.
pub trait SceneProbe {
    /// Union of the layers of every obstacle overlapping the sphere.
    fn overlap(&self, center: WorldPoint, radius: f32) -> LayerMask;

    /// Layer of the first surface a vertical ray through `point` hits,
    /// considering only layers in `mask`.
    fn surface(&self, point: WorldPoint, mask: LayerMask) -> Option<u8>;
}

/// [`Classifier`] built on a [`SceneProbe`] and the grid configuration.
///
/// A cell is blocked when anything on an unwalkable layer overlaps its
/// sphere. Walkable cells take the penalty of the terrain layer under them;
/// surfaces on layers without a configured penalty cost nothing extra.
#[derive(Debug, Clone)]
pub struct LayerClassifier<P> {
    probe: P,
    unwalkable: LayerMask,
    terrain: LayerMask,
    penalties: [i32; 32],
}

impl<P: SceneProbe> LayerClassifier<P> {
    pub fn new(probe: P, config: &GridConfig) -> Self {
        let mut terrain = LayerMask::NONE;
        let mut penalties = [0; 32];
        for tp in &config.terrain_penalties {
            if tp.layer < 32 {
                terrain = terrain | LayerMask::layer(tp.layer);
                penalties[tp.layer as usize] = tp.penalty;
            }
        }
        Self {
            probe,
            unwalkable: config.unwalkable_mask,
            terrain,
            penalties,
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }
}

impl<P: SceneProbe> Classifier for LayerClassifier<P> {
    fn classify(&self, center: WorldPoint, radius: f32) -> Terrain {
        if self.probe.overlap(center, radius).intersects(self.unwalkable) {
            return Terrain::BLOCKED;
        }
        let penalty = match self.probe.surface(center, self.terrain) {
            Some(layer) if self.terrain.contains(layer) => self.penalties[layer as usize],
            _ => 0,
        };
        Terrain::with_penalty(penalty)
    }
}

// ---------------------------------------------------------------------------
// AsciiScene
// ---------------------------------------------------------------------------

/// Layer of `#` obstacles in an [`AsciiScene`].
pub const WALL_LAYER: u8 = 10;
/// Layer of plain `.` ground in an [`AsciiScene`].
pub const GROUND_LAYER: u8 = 0;

/// A scene described by a character map, viewed from above.
///
/// Each character covers a `cell_size` square. `#` is an obstacle on
/// [`WALL_LAYER`], digits `1`–`9` are ground on that layer number, anything
/// else is ground on [`GROUND_LAYER`]. The first text line is the far edge
/// (largest `z`); the map is centred on the world origin.
#[derive(Debug, Clone)]
pub struct AsciiScene {
    rows: Vec<Vec<char>>,
    width: usize,
    cell_size: f32,
}

impl AsciiScene {
    pub fn parse(text: &str, cell_size: f32) -> Self {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self {
            rows,
            width,
            cell_size,
        }
    }

    /// Number of characters per line (longest line).
    pub fn columns(&self) -> usize {
        self.width
    }

    pub fn lines(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Extent of the map on the `x`/`z` plane.
    pub fn world_size(&self) -> [f32; 2] {
        [
            self.width as f32 * self.cell_size,
            self.rows.len() as f32 * self.cell_size,
        ]
    }

    /// A configuration whose grid cells line up one-to-one with the map's
    /// characters, blocking on [`WALL_LAYER`].
    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            world_size: self.world_size(),
            node_radius: self.cell_size / 2.0,
            unwalkable_mask: LayerMask::layer(WALL_LAYER),
            ..GridConfig::default()
        }
    }

    /// Character under a world position, if inside the map.
    pub fn char_at(&self, point: WorldPoint) -> Option<char> {
        let [w, d] = self.world_size();
        let col = ((point.x + w / 2.0) / self.cell_size).floor();
        let from_bottom = ((point.z + d / 2.0) / self.cell_size).floor();
        if col < 0.0 || from_bottom < 0.0 {
            return None;
        }
        let (col, from_bottom) = (col as usize, from_bottom as usize);
        if from_bottom >= self.rows.len() {
            return None;
        }
        let row = &self.rows[self.rows.len() - 1 - from_bottom];
        row.get(col).copied()
    }

    fn layer_of(ch: char) -> u8 {
        match ch {
            '#' => WALL_LAYER,
            '1'..='9' => ch as u8 - b'0',
            _ => GROUND_LAYER,
        }
    }
}

impl SceneProbe for AsciiScene {
    fn overlap(&self, center: WorldPoint, _radius: f32) -> LayerMask {
        match self.char_at(center) {
            Some('#') => LayerMask::layer(WALL_LAYER),
            _ => LayerMask::NONE,
        }
    }

    fn surface(&self, point: WorldPoint, mask: LayerMask) -> Option<u8> {
        let layer = Self::layer_of(self.char_at(point)?);
        mask.contains(layer).then_some(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
..#
.3.
1..";

    #[test]
    fn layer_mask_ops() {
        let m = LayerMask::layer(3) | LayerMask::layer(5);
        assert!(m.contains(3));
        assert!(m.contains(5));
        assert!(!m.contains(4));
        assert!(!m.contains(40));
        assert!(m.intersects(LayerMask::layer(5)));
        assert!(!m.intersects(LayerMask::layer(0)));
        assert!(LayerMask::layer(32).is_empty());
    }

    #[test]
    fn ascii_scene_orientation() {
        let scene = AsciiScene::parse(MAP, 1.0);
        assert_eq!(scene.world_size(), [3.0, 3.0]);
        // Bottom-left character is the last line's first char.
        assert_eq!(scene.char_at(WorldPoint::ground(-1.0, -1.0)), Some('1'));
        assert_eq!(scene.char_at(WorldPoint::ground(1.0, 1.0)), Some('#'));
        assert_eq!(scene.char_at(WorldPoint::ground(0.0, 0.0)), Some('3'));
        assert_eq!(scene.char_at(WorldPoint::ground(5.0, 0.0)), None);
    }

    #[test]
    fn layer_classifier_applies_masks() {
        let scene = AsciiScene::parse(MAP, 1.0);
        let mut config = scene.grid_config();
        config.terrain_penalties = vec![TerrainPenalty {
            layer: 3,
            penalty: 7,
        }];
        let classifier = LayerClassifier::new(scene, &config);

        let wall = classifier.classify(WorldPoint::ground(1.0, 1.0), 0.5);
        assert_eq!(wall, Terrain::BLOCKED);
        let mud = classifier.classify(WorldPoint::ground(0.0, 0.0), 0.5);
        assert_eq!(mud, Terrain::with_penalty(7));
        // Layer 1 has no configured penalty.
        let plain = classifier.classify(WorldPoint::ground(-1.0, -1.0), 0.5);
        assert_eq!(plain, Terrain::OPEN);
    }

    #[test]
    fn closures_classify() {
        let c = |p: WorldPoint| {
            if p.x < 0.0 {
                Terrain::BLOCKED
            } else {
                Terrain::OPEN
            }
        };
        assert_eq!(c.classify(WorldPoint::ground(-1.0, 0.0), 0.5), Terrain::BLOCKED);
        assert_eq!(c.classify(WorldPoint::ground(1.0, 0.0), 0.5), Terrain::OPEN);
    }
}
