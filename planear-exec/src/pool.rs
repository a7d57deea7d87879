//! Fixed-size worker pool over a shared task queue.

use crate::error::{PoolError, PoolResult};
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::{debug, error};

type Action<'a, E> = Box<dyn FnOnce() -> Result<(), E> + Send + 'a>;
type SuccessCallback<'a> = Box<dyn FnOnce() + Send + 'a>;
type FailureCallback<'a, E> = Box<dyn FnOnce(E) + Send + 'a>;

/// A unit of work for [`execute_tasks`].
///
/// The action runs exactly once. Afterwards exactly one of the callbacks
/// (when present) runs on the same worker thread.
pub struct Task<'a, E> {
    action: Action<'a, E>,
    on_success: Option<SuccessCallback<'a>>,
    on_failure: Option<FailureCallback<'a, E>>,
}

impl<'a, E> Task<'a, E> {
    pub fn new(action: impl FnOnce() -> Result<(), E> + Send + 'a) -> Self {
        Self {
            action: Box::new(action),
            on_success: None,
            on_failure: None,
        }
    }

    pub fn on_success(mut self, callback: impl FnOnce() + Send + 'a) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_failure(mut self, callback: impl FnOnce(E) + Send + 'a) -> Self {
        self.on_failure = Some(Box::new(callback));
        self
    }

    fn run(self) {
        match (self.action)() {
            Ok(()) => {
                if let Some(callback) = self.on_success {
                    callback();
                }
            }
            Err(err) => {
                if let Some(callback) = self.on_failure {
                    callback(err);
                }
            }
        }
    }
}

/// Runs every task on at most `workers` threads and blocks until the queue
/// is drained and all workers have exited.
///
/// Task outcomes are reported only through the task callbacks. A task that
/// panics is logged and counted, and its worker moves on to the next one;
/// the count is returned as [`PoolError::TaskPanicked`] once the queue is
/// drained. The caller's tracing dispatcher is installed in every worker.
pub fn execute_tasks<E>(tasks: Vec<Task<'_, E>>, workers: usize) -> PoolResult<()> {
    if workers == 0 {
        return Err(PoolError::NoWorkers);
    }
    if tasks.is_empty() {
        return Ok(());
    }

    let worker_count = workers.min(tasks.len());
    debug!(tasks = tasks.len(), workers = worker_count, "starting worker pool");

    let queue = Mutex::new(VecDeque::from(tasks));
    let dispatch = tracing::dispatcher::get_default(|current| current.clone());

    let panicked = thread::scope(|s| {
        let handles: Vec<_> = (0..worker_count)
            .map(|worker| {
                let queue = &queue;
                let dispatch = dispatch.clone();
                s.spawn(move || {
                    tracing::dispatcher::with_default(&dispatch, || drain(worker, queue))
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or(1))
            .sum::<usize>()
    });

    if panicked > 0 {
        return Err(PoolError::TaskPanicked(panicked));
    }
    Ok(())
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Returns the number of tasks that panicked.
fn drain<E>(worker: usize, queue: &Mutex<VecDeque<Task<'_, E>>>) -> usize {
    let mut completed = 0usize;
    let mut panicked = 0usize;
    loop {
        // The queue only holds tasks nobody has started, so a poisoned lock
        // still guards consistent data.
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match next {
            Some(task) => {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
                    error!(worker, panic = panic_message(payload.as_ref()), "task panicked");
                    panicked += 1;
                }
                completed += 1;
            }
            None => break,
        }
    }
    debug!(worker, completed, panicked, "worker finished");
    panicked
}
