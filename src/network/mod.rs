//! Network Module
//!
//! TCP server and connection handling.
//!
//! ## Architecture
//! - Single acceptor thread polling a shutdown flag
//! - Fixed worker pool, one active connection per worker
//! - A saturated pool blocks the acceptor (implicit backpressure)
//! - Requests routed through the SyncPipeline

mod connection;
mod pool;
mod server;

pub use connection::Connection;
pub use pool::WorkerPool;
pub use server::Server;
