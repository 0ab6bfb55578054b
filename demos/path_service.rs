//! Threaded service demo: several client threads share one path worker.
//!
//! Run: RUST_LOG=debug cargo run --bin path-service

use std::sync::mpsc;
use std::thread;

use navgrid_demos::{at, setup};
use navgrid_paths::{PathService, ServiceError};

const WORKER_BUDGET: usize = 64;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (_, pathfinder) = setup()?;
    let goals = [
        at(&pathfinder, 3, 3),
        at(&pathfinder, 19, 3),
        at(&pathfinder, 11, 11),
        at(&pathfinder, 2, 2),
    ];
    let start = at(&pathfinder, 23, 8);

    let service = PathService::spawn(pathfinder, WORKER_BUDGET)?;
    let (tx, rx) = mpsc::channel();

    let clients: Vec<_> = goals
        .into_iter()
        .enumerate()
        .map(|(id, goal)| {
            let requester = service.requester();
            let tx = tx.clone();
            thread::spawn(move || -> Result<(), ServiceError> {
                requester.request_path(start, goal, move |result| {
                    let _ = tx.send((id, result));
                })
            })
        })
        .collect();
    drop(tx);

    for client in clients {
        client
            .join()
            .map_err(|_| "client thread panicked")??;
    }
    service.shutdown()?;
    log::debug!("path service shut down");

    for (id, result) in rx {
        match result {
            Ok(path) => println!(
                "client {id}: cost {} in {} waypoints",
                path.cost,
                path.waypoints.len()
            ),
            Err(e) => println!("client {id}: {e}"),
        }
    }
    Ok(())
}
