//! Thread pool backing parallel extraction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use async_executor::{Executor, Task};

use crate::scheduler::{Job, Scheduler};

/// A pool of worker threads draining a shared async executor.
///
/// The pool implements [`Scheduler`]: `run_and_wait` spawns each job as a task
/// and the calling thread helps drain the executor until every task finished.
///
/// # Example
///
/// ```
/// use prism_render::{Job, Scheduler, TaskPool};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let pool = TaskPool::new(2);
/// let hits = Arc::new(AtomicUsize::new(0));
/// let jobs: Vec<Job> = (0..4)
///     .map(|_| {
///         let hits = hits.clone();
///         Box::new(move || {
///             hits.fetch_add(1, Ordering::Relaxed);
///         }) as Job
///     })
///     .collect();
///
/// pool.run_and_wait(jobs);
/// assert_eq!(hits.load(Ordering::Relaxed), 4);
/// ```
pub struct TaskPool {
    executor: Arc<Executor<'static>>,
    threads: Vec<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl TaskPool {
    /// Create a new task pool with the specified number of threads.
    ///
    /// # Panics
    ///
    /// Panics if num_threads is 0.
    pub fn new(num_threads: usize) -> Self {
        assert!(num_threads > 0, "TaskPool must have at least one thread");

        let executor = Arc::new(Executor::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut threads = Vec::with_capacity(num_threads);

        for i in 0..num_threads {
            let exec = executor.clone();
            let shutdown_flag = shutdown.clone();

            let handle = thread::Builder::new()
                .name(format!("prism-task-{}", i))
                .spawn(move || {
                    while !shutdown_flag.load(Ordering::Relaxed) {
                        if !exec.try_tick() {
                            // No tasks ready, sleep briefly
                            thread::sleep(std::time::Duration::from_micros(200));
                        }
                    }
                })
                .expect("Failed to spawn task pool thread");

            threads.push(handle);
        }

        tracing::debug!("TaskPool created with {} threads", num_threads);

        Self {
            executor,
            threads,
            shutdown,
        }
    }

    /// Create a task pool using the number of available CPU cores.
    pub fn with_num_cpus() -> Self {
        Self::new(num_cpus::get())
    }

    /// Uses max(1, num_cpus - 1) to leave one core free for the render thread.
    pub fn default_threads() -> Self {
        let num_threads = (num_cpus::get().saturating_sub(1)).max(1);
        Self::new(num_threads)
    }

    /// Spawn a job on the pool without waiting for it.
    pub fn spawn<T>(&self, job: impl FnOnce() -> T + Send + 'static) -> Task<T>
    where
        T: Send + 'static,
    {
        self.executor.spawn(async move { job() })
    }

    /// Get the number of threads in this pool.
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Shutdown the task pool and wait for all threads to finish.
    pub fn shutdown(mut self) {
        tracing::debug!("Shutting down TaskPool with {} threads", self.threads.len());

        self.shutdown.store(true, Ordering::Relaxed);

        let threads = std::mem::take(&mut self.threads);
        for handle in threads {
            if let Err(e) = handle.join() {
                tracing::error!("Task pool thread panicked: {:?}", e);
            }
        }

        tracing::debug!("TaskPool shutdown complete");
    }
}

impl Scheduler for TaskPool {
    fn run_and_wait(&self, jobs: Vec<Job>) {
        if jobs.is_empty() {
            return;
        }

        let tasks: Vec<Task<()>> = jobs
            .into_iter()
            .map(|job| self.executor.spawn(async move { job() }))
            .collect();

        futures_lite::future::block_on(self.executor.run(async move {
            for task in tasks {
                task.await;
            }
        }));
    }

    fn worker_count(&self) -> usize {
        // The calling thread drains the executor too.
        self.threads.len() + 1
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::default_threads()
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
