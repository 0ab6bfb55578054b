use navgrid_core::WorldPoint;

use crate::error::ConfigError;
use crate::heuristic::Heuristic;
use crate::terrain::{LayerMask, TerrainPenalty};

/// Settings for building a [`NavGrid`](crate::NavGrid) and searching it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Extent of the covered area along world X and world Z.
    pub world_size: [f32; 2],
    /// Centre of the covered area.
    pub origin: WorldPoint,
    /// Half the width of one cell.
    pub node_radius: f32,
    /// Obstacles on these layers make a cell unwalkable.
    pub unwalkable_mask: LayerMask,
    /// Extra entry cost per terrain layer.
    pub terrain_penalties: Vec<TerrainPenalty>,
    pub heuristic: Heuristic,
    /// Allow a diagonal step past a blocked orthogonal neighbour.
    pub corner_cutting: bool,
    /// Give up after closing this many nodes.
    pub max_expansions: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            world_size: [10.0, 10.0],
            origin: WorldPoint::ZERO,
            node_radius: 0.5,
            unwalkable_mask: LayerMask::NONE,
            terrain_penalties: Vec::new(),
            heuristic: Heuristic::Octile,
            corner_cutting: true,
            max_expansions: None,
        }
    }
}

impl GridConfig {
    #[inline]
    pub fn node_diameter(&self) -> f32 {
        self.node_radius * 2.0
    }

    /// Cell counts along each axis: world extent over node diameter, rounded
    /// to the nearest integer.
    pub fn grid_size(&self) -> (i32, i32) {
        let d = self.node_diameter();
        (
            (self.world_size[0] / d).round() as i32,
            (self.world_size[1] / d).round() as i32,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = self.node_radius;
        if !(r.is_finite() && r > 0.0) {
            return Err(ConfigError::InvalidNodeRadius(r));
        }
        let [width, depth] = self.world_size;
        if !(width.is_finite() && depth.is_finite() && width > 0.0 && depth > 0.0) {
            return Err(ConfigError::InvalidWorldSize { width, depth });
        }
        let (w, h) = self.grid_size();
        if w <= 0 || h <= 0 {
            return Err(ConfigError::EmptyGrid {
                width: w,
                height: h,
            });
        }
        for tp in &self.terrain_penalties {
            if tp.layer >= 32 {
                return Err(ConfigError::InvalidLayer(tp.layer));
            }
            if tp.penalty < 0 {
                return Err(ConfigError::NegativePenalty {
                    layer: tp.layer,
                    penalty: tp.penalty,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_rounds() {
        let config = GridConfig {
            world_size: [10.4, 7.6],
            node_radius: 0.5,
            ..GridConfig::default()
        };
        assert_eq!(config.grid_size(), (10, 8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_radius() {
        let config = GridConfig {
            node_radius: 0.0,
            ..GridConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidNodeRadius(0.0)));
    }

    #[test]
    fn rejects_degenerate_world() {
        let config = GridConfig {
            world_size: [0.2, 5.0],
            node_radius: 0.5,
            ..GridConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 5
            })
        );
        let config = GridConfig {
            world_size: [-1.0, 5.0],
            ..GridConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWorldSize { .. })
        ));
    }

    #[test]
    fn rejects_negative_penalty() {
        let config = GridConfig {
            terrain_penalties: vec![TerrainPenalty {
                layer: 4,
                penalty: -2,
            }],
            ..GridConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativePenalty {
                layer: 4,
                penalty: -2
            })
        );
    }
}
