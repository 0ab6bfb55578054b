//! Single-flight queue demo: three agents ask for paths in the same frame,
//! the queue answers them one at a time across ticks.
//!
//! Run: RUST_LOG=debug cargo run --bin pathfind

use std::sync::mpsc;

use navgrid_demos::{at, frames_to_walk, render, setup};
use navgrid_paths::{Path, PathRequestQueue};

/// Node expansions allowed per simulated frame.
const FRAME_BUDGET: usize = 16;
/// Agent speed in world units per frame.
const AGENT_SPEED: f32 = 0.25;

fn main() {
    env_logger::init();

    let (scene, pathfinder) = match setup() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let requests = [
        ('a', at(&pathfinder, 0, 11), at(&pathfinder, 3, 3)),
        ('b', at(&pathfinder, 23, 11), at(&pathfinder, 11, 0)),
        ('c', at(&pathfinder, 0, 0), at(&pathfinder, 4, 2)),
    ];

    let mut queue = PathRequestQueue::new(pathfinder);
    let (tx, rx) = mpsc::channel();
    for &(label, start, goal) in &requests {
        let tx = tx.clone();
        queue.request_path(start, goal, move |result| {
            let _ = tx.send((label, start, result));
        });
    }

    let mut frames = 0;
    while queue.tick(FRAME_BUDGET) {
        frames += 1;
    }
    println!("{} requests answered over {} frames", queue.completed(), frames);

    let mut found: Vec<(char, Path)> = Vec::new();
    for (label, start, result) in rx.try_iter() {
        match result {
            Ok(path) => {
                println!(
                    "{label}: cost {} over {} cells, {} waypoints, {} expansions, {} frames to walk",
                    path.cost,
                    path.cells.len(),
                    path.waypoints.len(),
                    path.expansions,
                    frames_to_walk(start, &path, AGENT_SPEED)
                );
                found.push((label, path));
            }
            Err(e) => println!("{label}: {e}"),
        }
    }

    let paths: Vec<(char, &Path)> = found.iter().map(|(c, p)| (*c, p)).collect();
    print!("{}", render(&scene, queue.pathfinder(), &paths));
}
