//! Worker pool
//!
//! Fixed-size thread pool fed by a bounded crossbeam channel. When every
//! worker is busy and the queue is full, `execute` blocks the caller, which
//! is exactly the backpressure the accept loop relies on.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Sender};

use crate::error::Result;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Bounded pool of connection worker threads
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers with a queue of the same depth
    pub fn new(size: usize) -> Result<Self> {
        let (sender, receiver) = bounded::<Job>(size);

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("questline-worker-{}", id))
                .spawn(move || {
                    // Runs until every sender is dropped
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Submit a job; blocks while the pool is saturated
    pub fn execute<F: FnOnce() + Send + 'static>(&self, job: F) {
        if let Some(sender) = &self.sender {
            if sender.send(Box::new(job)).is_err() {
                tracing::warn!("worker pool is shut down, dropping job");
            }
        }
    }

    /// Stop accepting jobs and join every worker (drains queued jobs first)
    pub fn shutdown(&mut self) {
        drop(self.sender.take());
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
