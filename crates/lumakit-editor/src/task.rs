//! Background task dispatch and polling.
//!
//! Heavy work (decode, transform recompute, export) runs as discrete
//! blocking jobs on a small rayon pool. Results travel back over `mpsc`
//! channels and the interactive thread observes them by polling, so a
//! task's lifecycle is always visible as an explicit [`TaskStatus`].

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

/// Worker threads for the editor pool. Enough for one in-flight job per
/// concern (load, preview, export) without oversubscribing the host.
const POOL_THREADS: usize = 2;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Failed to build worker pool: {0}")]
    Pool(String),
}

/// Observable lifecycle of one background operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus<T> {
    Idle,
    Running,
    Done(T),
    Failed(String),
}

impl<T> TaskStatus<T> {
    pub fn is_running(&self) -> bool {
        matches!(self, TaskStatus::Running)
    }
}

/// Handle to one dispatched job. Poll it from the interactive thread;
/// once it reports `Done` or `Failed` the handle is spent.
pub struct BackgroundTask<T> {
    rx: Receiver<Result<T, String>>,
    finished: bool,
}

impl<T> BackgroundTask<T> {
    /// Non-blocking check for the job's result.
    ///
    /// Returns `Running` while the job is still executing, `Done`/`Failed`
    /// exactly once when it completes, and `Idle` on every poll after
    /// that.
    pub fn poll(&mut self) -> TaskStatus<T> {
        if self.finished {
            return TaskStatus::Idle;
        }
        match self.rx.try_recv() {
            Ok(Ok(value)) => {
                self.finished = true;
                TaskStatus::Done(value)
            }
            Ok(Err(reason)) => {
                self.finished = true;
                TaskStatus::Failed(reason)
            }
            Err(TryRecvError::Empty) => TaskStatus::Running,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                TaskStatus::Failed("worker disconnected".to_string())
            }
        }
    }

    /// Block until the job completes. Test and shutdown helper; the
    /// interactive path always polls.
    pub fn wait(mut self) -> TaskStatus<T> {
        if self.finished {
            return TaskStatus::Idle;
        }
        self.finished = true;
        match self.rx.recv() {
            Ok(Ok(value)) => TaskStatus::Done(value),
            Ok(Err(reason)) => TaskStatus::Failed(reason),
            Err(_) => TaskStatus::Failed("worker disconnected".to_string()),
        }
    }
}

/// Fixed-size worker pool for discrete CPU-bound jobs.
#[derive(Clone)]
pub struct WorkerPool {
    pool: Arc<ThreadPool>,
}

impl WorkerPool {
    pub fn new() -> Result<Self, TaskError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(POOL_THREADS)
            .build()
            .map_err(|e| TaskError::Pool(e.to_string()))?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Dispatch one job. The job's `Err` string becomes the task's
    /// `Failed` reason; nothing is retried.
    pub fn dispatch<T, F>(&self, job: F) -> BackgroundTask<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, String> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        self.pool.spawn(move || {
            // A dropped receiver means the caller abandoned the handle.
            let _ = tx.send(job());
        });
        BackgroundTask {
            rx,
            finished: false,
        }
    }
}
