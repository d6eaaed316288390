//! Connection Handler
//!
//! Handles individual client connections: one request line in, one response
//! line out, strictly in arrival order. Protocol and validation failures are
//! reported to the peer and leave the connection open; only I/O faults and
//! end-of-stream close it.

use std::io::{BufRead, BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{QuestlineError, Result};
use crate::progression::{self, PlayerProgression};
use crate::protocol::{decode_command, player_id_hint, write_response, Command, Response};
use crate::sync::SyncPipeline;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the synchronization pipeline
    pipeline: Arc<SyncPipeline>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O on a blocking stream
    pub fn new(stream: TcpStream, pipeline: Arc<SyncPipeline>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // The listener is non-blocking; this stream must not be
        stream.set_nonblocking(false)?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            pipeline,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 disables)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads request lines in a loop and sends responses. Returns when the
    /// client disconnects or an unrecoverable I/O fault occurs; the socket
    /// is released on every exit path.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("connection established from {}", self.peer_addr);

        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    // Client disconnected gracefully
                    tracing::debug!("client {} disconnected", self.peer_addr);
                    return Ok(());
                }
                Ok(_) => {}
                Err(ref e) if e.kind() == std::io::ErrorKind::ConnectionReset => {
                    tracing::debug!("connection reset by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::ConnectionAborted => {
                    tracing::debug!("connection aborted by client {}", self.peer_addr);
                    return Ok(());
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    // Read timeout: the peer went quiet, free the pool slot
                    tracing::debug!("read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("error reading from {}: {}", self.peer_addr, e);
                    return Err(e.into());
                }
            }

            // A bare SAVE succeeds silently: no response line at all
            if let Some(response) = self.process_line(&line) {
                if let Err(e) = self.send_response(&response) {
                    // Peer may vanish between request and response; treat the
                    // usual disconnect kinds as a clean close.
                    if let QuestlineError::Io(ref io_err) = e {
                        match io_err.kind() {
                            std::io::ErrorKind::ConnectionAborted
                            | std::io::ErrorKind::ConnectionReset
                            | std::io::ErrorKind::BrokenPipe => {
                                tracing::debug!(
                                    "client {} disconnected before response could be sent: {}",
                                    self.peer_addr,
                                    e
                                );
                                return Ok(());
                            }
                            _ => {}
                        }
                    }
                    tracing::warn!("error writing to {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            }
        }
    }

    /// Decode and execute one request line
    fn process_line(&mut self, line: &str) -> Option<Response> {
        let command = match decode_command(line) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!("bad request from {}: {}", self.peer_addr, e);
                return Some(Response::error(player_id_hint(line), e.to_string()));
            }
        };

        tracing::trace!("received command from {}: {:?}", self.peer_addr, command);
        self.execute_command(command)
    }

    /// Execute a command and build its response, if any
    fn execute_command(&mut self, command: Command) -> Option<Response> {
        match command {
            Command::Load { player_id } => Some(match self.pipeline.load(player_id) {
                Ok(state) => Response::progression(&state),
                Err(e) => {
                    tracing::warn!(player_id, "load failed: {}", e);
                    Response::error(player_id, e.to_string())
                }
            }),

            Command::Save { player_id, data } => {
                // Envelope id wins over whatever the blob claims
                let mut state = data;
                state.player_id = player_id;
                match self.pipeline.save(&state) {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!(player_id, "save failed: {}", e);
                        Some(Response::error(player_id, e.to_string()))
                    }
                }
            }

            Command::Event {
                player_id,
                event_type,
                amount,
            } => Some(match self.apply_event(player_id, &event_type, amount) {
                Ok(state) => Response::progression(&state),
                Err(e) => {
                    tracing::warn!(player_id, %event_type, "event failed: {}", e);
                    Response::error(player_id, e.to_string())
                }
            }),

            Command::Ping { player_id } => Some(Response::pong(player_id)),
        }
    }

    /// EVENT orchestration: load, apply, save, then rewards for any levels
    /// crossed. Reward failures are handled inside the pipeline and never
    /// undo the committed save.
    fn apply_event(
        &self,
        player_id: i64,
        event_type: &str,
        amount: i64,
    ) -> Result<PlayerProgression> {
        let mut state = self.pipeline.load(player_id)?;
        let gained = progression::apply_event(&mut state, self.pipeline.rules(), event_type, amount);
        self.pipeline.save(&state)?;
        if gained > 0 {
            self.pipeline.issue_level_rewards(&state, gained);
        }
        Ok(state)
    }

    /// Send a response line to the client
    fn send_response(&mut self, response: &Response) -> Result<()> {
        write_response(&mut self.writer, response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
