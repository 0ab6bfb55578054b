use navgrid_core::Point;
use thiserror::Error;

/// Which end of a request an endpoint error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

/// Why an endpoint was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFault {
    Unwalkable,
    OutOfBounds,
}

/// Failures reported by a search.
///
/// Every variant reaches the caller through the normal completion path; none
/// of them abort the request queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{endpoint:?} cell {cell} is invalid: {reason:?}")]
    InvalidEndpoint {
        endpoint: Endpoint,
        cell: Point,
        reason: EndpointFault,
    },
    #[error("goal is unreachable: open set exhausted")]
    UnreachableGoal,
    #[error("search gave up after expanding {limit} nodes")]
    ExpansionLimit { limit: usize },
    #[error("extract from an empty priority queue")]
    EmptyQueue,
}

/// Rejected grid configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("node radius must be positive and finite, got {0}")]
    InvalidNodeRadius(f32),
    #[error("world size must be positive and finite, got {width} x {depth}")]
    InvalidWorldSize { width: f32, depth: f32 },
    #[error("grid of {width} x {height} cells has no cells")]
    EmptyGrid { width: i32, height: i32 },
    #[error("terrain layer {layer} has negative penalty {penalty}")]
    NegativePenalty { layer: u8, penalty: i32 },
    #[error("terrain layer {0} is out of range (layers are 0..32)")]
    InvalidLayer(u8),
}

/// Failures of the threaded [`PathService`](crate::PathService).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("path service is shut down")]
    Closed,
    #[error("failed to spawn path worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("path worker panicked")]
    WorkerPanicked,
}
