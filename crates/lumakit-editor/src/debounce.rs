//! Cancellable delayed scheduling for adjustment previews.
//!
//! Each `schedule` arms a timer thread that fires the job after a quiet
//! period, and atomically cancels any previously scheduled job that has
//! not started yet. Cancellation is cooperative: the flag is checked once
//! the quiet period elapses, before the job runs; a job already running
//! completes normally. A burst of schedules therefore settles to exactly
//! one execution carrying the final value.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Quiet period between the last value change and the preview recompute.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<Arc<AtomicBool>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Schedule `job` to run after the quiet period, cancelling any job
    /// scheduled earlier that has not yet started.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let cancelled = Arc::new(AtomicBool::new(false));
        self.pending = Some(cancelled.clone());
        let quiet = self.quiet_period;
        thread::spawn(move || {
            thread::sleep(quiet);
            if !cancelled.load(Ordering::Acquire) {
                job();
            }
        });
    }

    /// Cancel the scheduled-but-not-started job, if any.
    pub fn cancel(&mut self) {
        if let Some(flag) = self.pending.take() {
            flag.store(true, Ordering::Release);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;

    fn settle(quiet: Duration) {
        // Bounded wait comfortably past the quiet period.
        thread::sleep(quiet * 4 + Duration::from_millis(50));
    }

    #[test]
    fn test_job_runs_after_quiet_period() {
        let quiet = Duration::from_millis(20);
        let mut debouncer = Debouncer::new(quiet);
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        debouncer.schedule(move || flag.store(true, Ordering::SeqCst));
        assert!(!ran.load(Ordering::SeqCst));
        settle(quiet);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_burst_settles_to_one_execution_with_final_value() {
        let quiet = Duration::from_millis(30);
        let mut debouncer = Debouncer::new(quiet);
        let runs = Arc::new(AtomicU32::new(0));
        let last = Arc::new(Mutex::new(0));

        for value in [10, 20, 30] {
            let runs = runs.clone();
            let last = last.clone();
            debouncer.schedule(move || {
                runs.fetch_add(1, Ordering::SeqCst);
                *last.lock().unwrap() = value;
            });
            thread::sleep(Duration::from_millis(5));
        }
        settle(quiet);

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(*last.lock().unwrap(), 30);
    }

    #[test]
    fn test_cancel_prevents_execution() {
        let quiet = Duration::from_millis(20);
        let mut debouncer = Debouncer::new(quiet);
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        debouncer.schedule(move || flag.store(true, Ordering::SeqCst));
        debouncer.cancel();
        assert!(!debouncer.has_pending());
        settle(quiet);
        assert!(!ran.load(Ordering::SeqCst));
    }
}
