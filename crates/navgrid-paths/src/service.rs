//! A [`PathRequestQueue`] running on its own thread.
//!
//! Requests arrive over an `mpsc` channel from any number of
//! [`PathRequester`] handles. The worker serves them one search at a time,
//! checking the channel between expansion batches so new requests are
//! queued promptly while a long search is running.
//!
//! Every requester shares one sender slot. Shutting down empties that slot,
//! so a request is either refused with [`ServiceError::Closed`] or already
//! in the channel, where the worker is guaranteed to read and answer it.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use navgrid_core::WorldPoint;

use crate::error::ServiceError;
use crate::path::PathResult;
use crate::pathfinder::Pathfinder;
use crate::queue::{PathRequest, PathRequestQueue};

type Intake = Arc<Mutex<Option<Sender<PathRequest>>>>;

/// Cloneable handle for submitting requests to a [`PathService`].
#[derive(Clone)]
pub struct PathRequester {
    intake: Intake,
}

impl PathRequester {
    /// Submit a query. `handler` runs on the worker thread once the search
    /// completes.
    pub fn request_path<F>(
        &self,
        start: WorldPoint,
        goal: WorldPoint,
        handler: F,
    ) -> Result<(), ServiceError>
    where
        F: FnOnce(PathResult) + Send + 'static,
    {
        self.submit(PathRequest::new(start, goal, handler))
    }

    /// Hand `request` to the worker. `Ok` means its handler will run.
    pub fn submit(&self, request: PathRequest) -> Result<(), ServiceError> {
        let intake = self.intake.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = intake.as_ref().ok_or(ServiceError::Closed)?;
        tx.send(request).map_err(|_| ServiceError::Closed)
    }

    /// Stop accepting requests. Returns whether this call closed the intake.
    fn close(&self) -> bool {
        let mut intake = self.intake.lock().unwrap_or_else(PoisonError::into_inner);
        intake.take().is_some()
    }
}

/// Owner of the worker thread.
pub struct PathService {
    requester: PathRequester,
    worker: Option<JoinHandle<()>>,
}

impl PathService {
    /// Start a worker serving `pathfinder`, advancing the active search by
    /// `budget` expansions between channel checks.
    pub fn spawn(pathfinder: Pathfinder, budget: usize) -> Result<Self, ServiceError> {
        let (tx, rx) = mpsc::channel();
        let queue = PathRequestQueue::new(pathfinder);
        let worker = thread::Builder::new()
            .name("navgrid-paths".into())
            .spawn(move || serve(queue, rx, budget.max(1)))?;
        Ok(Self {
            requester: PathRequester {
                intake: Arc::new(Mutex::new(Some(tx))),
            },
            worker: Some(worker),
        })
    }

    /// A new handle for submitting requests.
    pub fn requester(&self) -> PathRequester {
        self.requester.clone()
    }

    pub fn request_path<F>(
        &self,
        start: WorldPoint,
        goal: WorldPoint,
        handler: F,
    ) -> Result<(), ServiceError>
    where
        F: FnOnce(PathResult) + Send + 'static,
    {
        self.requester.request_path(start, goal, handler)
    }

    /// Refuse new requests, answer every accepted one, then stop the worker.
    pub fn shutdown(mut self) -> Result<(), ServiceError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), ServiceError> {
        if self.requester.close() {
            log::debug!("path service intake closed");
        }
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        worker.join().map_err(|_| ServiceError::WorkerPanicked)
    }
}

impl Drop for PathService {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::error!("path service stopped uncleanly: {}", err);
        }
    }
}

/// Worker loop. Runs until the intake is closed, the channel is drained and
/// the queue is idle.
fn serve(mut queue: PathRequestQueue, rx: Receiver<PathRequest>, budget: usize) {
    log::debug!("path worker started");
    let mut open = true;
    loop {
        if queue.is_idle() {
            if !open {
                break;
            }
            // Nothing to do: block until the next request or disconnect.
            match rx.recv() {
                Ok(request) => queue.submit(request),
                Err(_) => open = false,
            }
        }
        // Buffered requests are still delivered after the intake closes;
        // `Disconnected` only comes once the channel is empty.
        while open {
            match rx.try_recv() {
                Ok(request) => queue.submit(request),
                Err(TryRecvError::Disconnected) => open = false,
                Err(TryRecvError::Empty) => break,
            }
        }
        queue.tick(budget);
    }
    log::debug!("path worker stopped after {} requests", queue.completed());
}
