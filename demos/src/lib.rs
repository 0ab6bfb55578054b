//! Shared scene and rendering for the pathfinding demos.
//!
//! The scene is a small walled yard with a swamp (`5`) that costs extra to
//! cross. Paths are drawn over it with one letter per request.

use navgrid_core::Point;
use navgrid_paths::{
    AsciiScene, ConfigError, LayerClassifier, Path, Pathfinder, TerrainPenalty, WorldPoint,
};

pub const SCENE: &str = "\
........................
.######.........######..
.#....#..55555..#....#..
.#....#..55555..#....#..
.#..............#.......
.######..55555..######..
.........55555..........
..####################..
........................
..........#.............
..........#.............
........................";

/// World units per map character.
pub const CELL_SIZE: f32 = 1.0;

/// Extra cost of entering a swamp cell.
pub const SWAMP_PENALTY: i32 = 40;

/// The demo scene and a pathfinder over it.
pub fn setup() -> Result<(AsciiScene, Pathfinder), ConfigError> {
    let scene = AsciiScene::parse(SCENE, CELL_SIZE);
    let mut config = scene.grid_config();
    config.terrain_penalties = vec![TerrainPenalty {
        layer: 5,
        penalty: SWAMP_PENALTY,
    }];
    let classifier = LayerClassifier::new(scene.clone(), &config);
    let pathfinder = Pathfinder::from_config(&config, &classifier)?;
    Ok((scene, pathfinder))
}

/// World position of a map character, counting lines from the top.
pub fn at(pathfinder: &Pathfinder, column: i32, line: i32) -> WorldPoint {
    let grid = pathfinder.grid();
    grid.world_point(Point::new(column, grid.height() - 1 - line))
}

/// Move `from` toward `to` by at most `step` units on the ground plane.
pub fn advance(from: WorldPoint, to: WorldPoint, step: f32) -> WorldPoint {
    let dist = from.horizontal_distance(to);
    if dist <= step {
        return to;
    }
    from + (to - from) * (step / dist)
}

/// Frames an agent moving `speed` units per frame takes to follow `path`'s
/// waypoints from `start`.
pub fn frames_to_walk(start: WorldPoint, path: &Path, speed: f32) -> usize {
    let mut pos = start;
    let mut frames = 0;
    for &target in &path.waypoints {
        while pos != target {
            pos = advance(pos, target, speed);
            frames += 1;
        }
    }
    frames
}

/// Draw the scene with each path's cells marked by its letter.
pub fn render(scene: &AsciiScene, pathfinder: &Pathfinder, paths: &[(char, &Path)]) -> String {
    let grid = pathfinder.grid();
    let mut out = String::new();
    for y in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            let p = Point::new(x, y);
            let mark = paths
                .iter()
                .rev()
                .find(|(_, path)| path.cells.contains(&p))
                .map(|(c, _)| *c);
            let ch = mark
                .or_else(|| scene.char_at(grid.world_point(p)))
                .unwrap_or(' ');
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
