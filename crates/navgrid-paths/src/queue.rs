//! Single-flight request queue.
//!
//! Callers submit path requests at any time; the queue keeps them in
//! submission order and runs exactly one [`Search`] at a time. The host
//! drives it by calling [`PathRequestQueue::tick`] from its frame or event
//! loop, giving each tick a bounded number of node expansions.

use std::collections::VecDeque;
use std::fmt;

use navgrid_core::WorldPoint;

use crate::astar::{Progress, Search};
use crate::path::PathResult;
use crate::pathfinder::Pathfinder;

/// Completion handler of a request. Called exactly once.
pub type PathCallback = Box<dyn FnOnce(PathResult) + Send>;

/// A pending path query.
pub struct PathRequest {
    pub start: WorldPoint,
    pub goal: WorldPoint,
    handler: PathCallback,
}

impl PathRequest {
    pub fn new<F>(start: WorldPoint, goal: WorldPoint, handler: F) -> Self
    where
        F: FnOnce(PathResult) + Send + 'static,
    {
        Self {
            start,
            goal,
            handler: Box::new(handler),
        }
    }
}

impl fmt::Debug for PathRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRequest")
            .field("start", &self.start)
            .field("goal", &self.goal)
            .finish_non_exhaustive()
    }
}

struct ActiveRequest {
    search: Search,
    handler: PathCallback,
}

/// FIFO of [`PathRequest`]s served one search at a time.
pub struct PathRequestQueue {
    pathfinder: Pathfinder,
    pending: VecDeque<PathRequest>,
    active: Option<ActiveRequest>,
    completed: u64,
}

impl PathRequestQueue {
    pub fn new(pathfinder: Pathfinder) -> Self {
        Self {
            pathfinder,
            pending: VecDeque::new(),
            active: None,
            completed: 0,
        }
    }

    #[inline]
    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Queue a path query. `handler` runs during a later [`tick`](Self::tick),
    /// never inside this call.
    pub fn request_path<F>(&mut self, start: WorldPoint, goal: WorldPoint, handler: F)
    where
        F: FnOnce(PathResult) + Send + 'static,
    {
        self.submit(PathRequest::new(start, goal, handler));
    }

    /// Queue a request and start it right away if no search is running.
    pub fn submit(&mut self, request: PathRequest) {
        self.pending.push_back(request);
        if self.active.is_some() {
            log::debug!(
                "path request queued behind active search ({} waiting)",
                self.pending.len()
            );
        }
        self.try_dispatch();
    }

    /// Advance the active search by up to `budget` expansions. Completes it
    /// and starts the next request when it finishes.
    ///
    /// Returns whether work remains.
    pub fn tick(&mut self, budget: usize) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        log::trace!(
            "tick: {} expansions so far, frontier {}",
            active.search.expansions(),
            active.search.frontier()
        );
        match active.search.step(self.pathfinder.grid(), budget) {
            Progress::Running => true,
            Progress::Finished(result) => {
                self.on_engine_completed(result);
                self.active.is_some()
            }
        }
    }

    /// Tick without a budget until every queued request has been answered.
    pub fn run_until_idle(&mut self) {
        while self.tick(usize::MAX) {}
    }

    /// Whether a search is in flight.
    #[inline]
    pub fn is_searching(&self) -> bool {
        self.active.is_some()
    }

    /// Requests waiting behind the active search.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    /// Requests answered so far.
    #[inline]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    fn on_engine_completed(&mut self, result: PathResult) {
        if let Some(active) = self.active.take() {
            (active.handler)(result);
            self.completed += 1;
        }
        self.try_dispatch();
    }

    fn try_dispatch(&mut self) {
        if self.active.is_some() {
            return;
        }
        let Some(request) = self.pending.pop_front() else {
            return;
        };
        let search = self.pathfinder.start_search(request.start, request.goal);
        log::debug!(
            "dispatching path request {} -> {} (cells {} -> {})",
            request.start,
            request.goal,
            search.start(),
            search.goal()
        );
        self.active = Some(ActiveRequest {
            search,
            handler: request.handler,
        });
    }
}

impl fmt::Debug for PathRequestQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathRequestQueue")
            .field("searching", &self.is_searching())
            .field("pending", &self.pending.len())
            .field("completed", &self.completed)
            .finish()
    }
}
