//! Outbound server link with automatic reconnect.
//!
//! Socket I/O never touches simulation state directly. Every transport
//! reports through an [`EventSink`], and [`ConnectionManager::poll`] drains
//! those events on the simulation thread at a fixed point in the frame.

pub mod loopback;
pub mod tcp;

pub use loopback::{LoopbackControl, LoopbackTransport};
pub use tcp::TcpTransport;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, warn};
use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use crate::config::{NetworkConfig, ReconnectPolicy};
use crate::utils::error::NetError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl From<&NetworkConfig> for Endpoint {
    fn from(config: &NetworkConfig) -> Self {
        Self::new(config.host.clone(), config.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Lifecycle of the managed link.
///
/// A fault moves the link to `Closed` or `Errored` for the poll that saw it.
/// The next poll drops back to `Disconnected` while the retry waits, and the
/// retry itself re-enters `Connecting`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live socket.
    #[default]
    Disconnected,
    /// Socket opened, waiting for the connect event.
    Connecting,
    /// Connect event seen on the live socket.
    Connected,
    /// Last socket closed by the peer; a retry is scheduled.
    Closed,
    /// Last socket faulted; a retry is scheduled.
    Errored,
}

/// What a socket reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Connected,
    Data(Vec<u8>),
    Error(String),
    Closed,
}

/// A socket event tagged with the generation of the socket that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub generation: u64,
    pub event: SocketEvent,
}

/// Sending half handed to a transport when it opens a socket.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: Sender<ConnectionEvent>,
}

impl EventSink {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `false` once the manager has gone away.
    pub fn emit(&self, event: SocketEvent) -> bool {
        self.tx
            .send(ConnectionEvent {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// One open socket. `destroy` must be idempotent.
pub trait SocketHandle: Send {
    fn write(&mut self, data: &[u8]) -> Result<(), NetError>;
    fn destroy(&mut self);
    fn is_destroyed(&self) -> bool;
}

/// Opens sockets. Connection progress is reported through the sink, never returned.
pub trait Transport: Send {
    fn open(&mut self, endpoint: &Endpoint, sink: EventSink) -> Box<dyn SocketHandle>;
}

/// Received payloads kept for the host before the oldest are dropped.
pub const INBOX_LIMIT: usize = 1024;

/// Owns the one outbound socket and re-dials it after every fault.
///
/// Received payloads queue up in an inbox bounded by [`INBOX_LIMIT`]; hosts
/// that care about server data drain it with [`ConnectionManager::take_inbox`]
/// once per frame.
pub struct ConnectionManager {
    endpoint: Endpoint,
    transport: Box<dyn Transport>,
    policy: ReconnectPolicy,
    socket: Option<Box<dyn SocketHandle>>,
    generation: u64,
    state: ConnectionState,
    events_tx: Sender<ConnectionEvent>,
    events_rx: Receiver<ConnectionEvent>,
    retry_at: Option<Instant>,
    failures: u32,
    attempts: u64,
    inbox: VecDeque<Vec<u8>>,
    last_fault: Option<String>,
}

impl ConnectionManager {
    pub fn new(endpoint: Endpoint, transport: Box<dyn Transport>, policy: ReconnectPolicy) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            endpoint,
            transport,
            policy,
            socket: None,
            generation: 0,
            state: ConnectionState::Disconnected,
            events_tx,
            events_rx,
            retry_at: None,
            failures: 0,
            attempts: 0,
            inbox: VecDeque::new(),
            last_fault: None,
        }
    }

    pub fn from_config(config: &NetworkConfig, transport: Box<dyn Transport>) -> Self {
        Self::new(Endpoint::from(config), transport, config.reconnect)
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Sockets opened so far, retries included.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn last_fault(&self) -> Option<&str> {
        self.last_fault.as_deref()
    }

    pub fn retry_pending(&self) -> bool {
        self.retry_at.is_some()
    }

    pub fn has_live_socket(&self) -> bool {
        self.socket.as_ref().is_some_and(|s| !s.is_destroyed())
    }

    /// Opens a socket unless a live one already exists.
    pub fn connect(&mut self) {
        if self.has_live_socket() {
            warn!("Already connected to {}", self.endpoint);
            return;
        }
        if let Some(mut stale) = self.socket.take() {
            stale.destroy();
        }

        self.retry_at = None;
        self.generation += 1;
        self.attempts += 1;
        let sink = EventSink {
            generation: self.generation,
            tx: self.events_tx.clone(),
        };
        debug!("Connecting to {} (attempt {})", self.endpoint, self.attempts);
        self.socket = Some(self.transport.open(&self.endpoint, sink));
        self.state = ConnectionState::Connecting;
    }

    /// Applies queued socket events, then fires the retry if it is due.
    pub fn poll(&mut self, now: Instant) {
        if matches!(self.state, ConnectionState::Closed | ConnectionState::Errored) {
            self.state = ConnectionState::Disconnected;
        }

        while let Ok(ConnectionEvent { generation, event }) = self.events_rx.try_recv() {
            if generation != self.generation || self.socket.is_none() {
                debug!("Dropping event from released socket #{}: {:?}", generation, event);
                continue;
            }
            self.handle_event(event, now);
        }

        if let Some(at) = self.retry_at {
            if now >= at {
                self.retry_at = None;
                self.connect();
            }
        }
    }

    fn handle_event(&mut self, event: SocketEvent, now: Instant) {
        match event {
            SocketEvent::Connected => {
                info!("Connected to server {}", self.endpoint);
                self.failures = 0;
                self.state = ConnectionState::Connected;
            }
            SocketEvent::Data(bytes) => {
                if self.inbox.len() >= INBOX_LIMIT {
                    self.inbox.pop_front();
                    warn!("Inbox full, dropping oldest payload");
                }
                self.inbox.push_back(bytes);
            }
            SocketEvent::Error(reason) => {
                error!("Connection error: {}", reason);
                self.last_fault = Some(reason);
                self.release_and_retry(ConnectionState::Errored, now);
            }
            SocketEvent::Closed => {
                error!("Connection closed by {}", self.endpoint);
                self.release_and_retry(ConnectionState::Closed, now);
            }
        }
    }

    fn release_and_retry(&mut self, state: ConnectionState, now: Instant) {
        if let Some(mut socket) = self.socket.take() {
            socket.destroy();
        }
        self.failures = self.failures.saturating_add(1);
        let delay = self.policy.delay(self.failures);
        debug!("Reconnecting in {:?}", delay);
        self.retry_at = Some(now + delay);
        self.state = state;
    }

    /// Writes to the live socket. Dropped silently when there is none.
    pub fn send(&mut self, payload: &[u8]) {
        let Some(socket) = self.socket.as_mut() else {
            return;
        };
        if socket.is_destroyed() {
            return;
        }
        if let Err(e) = socket.write(payload) {
            debug!("Dropped outgoing payload: {}", e);
        }
    }

    /// Destroys the socket and cancels any pending retry. Safe to repeat.
    pub fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            socket.destroy();
            info!("Closed connection to {}", self.endpoint);
        }
        self.retry_at = None;
        self.failures = 0;
        self.state = ConnectionState::Disconnected;
    }

    pub fn inbox_len(&self) -> usize {
        self.inbox.len()
    }

    /// Drains every payload received since the last call, oldest first.
    pub fn take_inbox(&mut self) -> Vec<Vec<u8>> {
        self.inbox.drain(..).collect()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            socket.destroy();
        }
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("endpoint", &self.endpoint)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("attempts", &self.attempts)
            .field("retry_at", &self.retry_at)
            .finish()
    }
}
