//! TCP Server
//!
//! Accepts connections and dispatches them to the worker pool.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::network::{Connection, WorkerPool};
use crate::sync::SyncPipeline;

/// How often the accept loop re-checks the shutdown flag when idle
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// TCP server for Questline
pub struct Server {
    config: Config,
    pipeline: Arc<SyncPipeline>,
    listener: TcpListener,
    shutdown: AtomicBool,
}

impl Server {
    /// Bind the listening socket
    ///
    /// A bind failure is fatal to startup and is returned to the caller.
    pub fn bind(config: Config, pipeline: Arc<SyncPipeline>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept so the loop can observe the shutdown flag
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            pipeline,
            listener,
            shutdown: AtomicBool::new(false),
        })
    }

    /// The bound address (useful when binding port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until shutdown (blocking)
    ///
    /// Teardown order on shutdown: stop accepting, then drain and join the
    /// worker pool. The adapters close when their owning `Arc`s drop.
    pub fn run(&self) -> Result<()> {
        tracing::info!("listening on {}", self.local_addr()?);

        let mut pool = WorkerPool::new(self.config.worker_threads)?;

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    tracing::debug!("accepted connection from {}", addr);
                    let pipeline = Arc::clone(&self.pipeline);
                    let read_ms = self.config.read_timeout_ms;
                    let write_ms = self.config.write_timeout_ms;

                    // Blocks here when the pool is saturated
                    pool.execute(move || match Connection::new(stream, pipeline) {
                        Ok(mut conn) => {
                            if let Err(e) = conn.set_timeouts(read_ms, write_ms) {
                                tracing::warn!("failed to set timeouts for {}: {}", addr, e);
                            }
                            if let Err(e) = conn.handle() {
                                tracing::warn!("connection {} closed with error: {}", addr, e);
                            }
                        }
                        Err(e) => {
                            tracing::warn!("failed to set up connection from {}: {}", addr, e);
                        }
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    // A failed accept never stops the server
                    tracing::warn!("accept failed: {}", e);
                }
            }
        }

        tracing::info!("shutdown requested, draining worker pool");
        pool.shutdown();
        tracing::info!("server stopped");
        Ok(())
    }

    /// Signal the server to shut down gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
