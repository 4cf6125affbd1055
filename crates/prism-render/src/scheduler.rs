//! Fork-join scheduling interface used by extraction.
//!
//! The draw pass never reaches for a global job system. It is handed a
//! [`Scheduler`] at construction and blocks on [`Scheduler::run_and_wait`]
//! until every job of the frame has finished.

/// A unit of work handed to a scheduler.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Executes a group of independent jobs and waits for all of them.
pub trait Scheduler: Send + Sync {
    /// Run every job, returning only once all of them completed.
    ///
    /// Jobs may run in any order and on any thread. There is no cancellation.
    fn run_and_wait(&self, jobs: Vec<Job>);

    /// Number of threads jobs may be spread across.
    fn worker_count(&self) -> usize;
}

/// Runs jobs one after another on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineScheduler;

impl Scheduler for InlineScheduler {
    fn run_and_wait(&self, jobs: Vec<Job>) {
        for job in jobs {
            job();
        }
    }

    fn worker_count(&self) -> usize {
        1
    }
}
