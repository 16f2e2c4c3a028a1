//! In-process transport. Used for offline sessions and to script socket faults.

use parking_lot::Mutex;
use std::sync::Arc;

use super::{Endpoint, EventSink, SocketEvent, SocketHandle, Transport};
use crate::utils::error::NetError;

struct SocketRecord {
    sink: EventSink,
    destroyed: bool,
    written: Vec<Vec<u8>>,
}

#[derive(Default)]
struct LoopbackState {
    refuse_remaining: u32,
    echo: bool,
    sockets: Vec<SocketRecord>,
}

#[derive(Clone, Default)]
pub struct LoopbackTransport {
    shared: Arc<Mutex<LoopbackState>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write comes straight back as received data.
    pub fn echo() -> Self {
        let transport = Self::new();
        transport.shared.lock().echo = true;
        transport
    }

    pub fn control(&self) -> LoopbackControl {
        LoopbackControl {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Transport for LoopbackTransport {
    fn open(&mut self, _endpoint: &Endpoint, sink: EventSink) -> Box<dyn SocketHandle> {
        let mut state = self.shared.lock();
        if state.refuse_remaining > 0 {
            state.refuse_remaining -= 1;
            sink.emit(SocketEvent::Error("connection refused".to_string()));
        } else {
            sink.emit(SocketEvent::Connected);
        }

        let index = state.sockets.len();
        state.sockets.push(SocketRecord {
            sink,
            destroyed: false,
            written: Vec::new(),
        });

        Box::new(LoopbackSocket {
            index,
            shared: Arc::clone(&self.shared),
        })
    }
}

struct LoopbackSocket {
    index: usize,
    shared: Arc<Mutex<LoopbackState>>,
}

impl SocketHandle for LoopbackSocket {
    fn write(&mut self, data: &[u8]) -> Result<(), NetError> {
        let mut state = self.shared.lock();
        let echo = state.echo;
        let record = &mut state.sockets[self.index];
        if record.destroyed {
            return Err(NetError::Destroyed);
        }
        record.written.push(data.to_vec());
        if echo {
            record.sink.emit(SocketEvent::Data(data.to_vec()));
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.shared.lock().sockets[self.index].destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.shared.lock().sockets[self.index].destroyed
    }
}

/// Test-side view of a [`LoopbackTransport`]. Sockets are indexed in open order.
#[derive(Clone)]
pub struct LoopbackControl {
    shared: Arc<Mutex<LoopbackState>>,
}

impl LoopbackControl {
    /// The next `count` opens fail with a connection error.
    pub fn refuse_next(&self, count: u32) {
        self.shared.lock().refuse_remaining = count;
    }

    pub fn sockets_opened(&self) -> usize {
        self.shared.lock().sockets.len()
    }

    pub fn is_destroyed(&self, socket: usize) -> bool {
        self.shared
            .lock()
            .sockets
            .get(socket)
            .is_some_and(|record| record.destroyed)
    }

    pub fn written(&self, socket: usize) -> Vec<Vec<u8>> {
        self.shared
            .lock()
            .sockets
            .get(socket)
            .map(|record| record.written.clone())
            .unwrap_or_default()
    }

    /// Raises `event` as if socket `socket` had produced it.
    pub fn inject(&self, socket: usize, event: SocketEvent) {
        if let Some(record) = self.shared.lock().sockets.get(socket) {
            record.sink.emit(event);
        }
    }
}
