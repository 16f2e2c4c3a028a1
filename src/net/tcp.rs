use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::{Endpoint, EventSink, SocketEvent, SocketHandle, Transport};
use crate::utils::error::NetError;

const READ_BUFFER: usize = 4096;

/// Plain TCP byte stream. Socket I/O runs on a runtime owned by the transport.
pub struct TcpTransport {
    runtime: Runtime,
}

impl TcpTransport {
    pub fn new() -> Result<Self, NetError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("freeland-net")
            .enable_all()
            .build()
            .map_err(NetError::Runtime)?;
        Ok(Self { runtime })
    }
}

impl Transport for TcpTransport {
    fn open(&mut self, endpoint: &Endpoint, sink: EventSink) -> Box<dyn SocketHandle> {
        let (tx, rx) = unbounded_channel();
        let task = self.runtime.spawn(run_socket(endpoint.to_string(), sink, rx));
        Box::new(TcpSocket {
            outgoing: Some(tx),
            task: Some(task),
        })
    }
}

async fn run_socket(addr: String, sink: EventSink, mut outgoing: UnboundedReceiver<Vec<u8>>) {
    let stream = match TcpStream::connect(&addr).await {
        Ok(stream) => stream,
        Err(e) => {
            sink.emit(SocketEvent::Error(e.to_string()));
            return;
        }
    };
    sink.emit(SocketEvent::Connected);

    let (mut reader, mut writer) = stream.into_split();
    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        tokio::select! {
            read = reader.read(&mut buf) => match read {
                Ok(0) => {
                    sink.emit(SocketEvent::Closed);
                    break;
                }
                Ok(n) => {
                    sink.emit(SocketEvent::Data(buf[..n].to_vec()));
                }
                Err(e) => {
                    sink.emit(SocketEvent::Error(e.to_string()));
                    break;
                }
            },
            payload = outgoing.recv() => match payload {
                Some(bytes) => {
                    if let Err(e) = writer.write_all(&bytes).await {
                        sink.emit(SocketEvent::Error(e.to_string()));
                        break;
                    }
                }
                None => {
                    debug!("Socket #{} released, stopping I/O", sink.generation());
                    break;
                }
            },
        }
    }
}

struct TcpSocket {
    outgoing: Option<UnboundedSender<Vec<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl SocketHandle for TcpSocket {
    fn write(&mut self, data: &[u8]) -> Result<(), NetError> {
        let tx = self.outgoing.as_ref().ok_or(NetError::Destroyed)?;
        tx.send(data.to_vec()).map_err(|_| NetError::WriterClosed)
    }

    fn destroy(&mut self) {
        self.outgoing = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_destroyed(&self) -> bool {
        self.outgoing.is_none()
    }
}

impl Drop for TcpSocket {
    fn drop(&mut self) {
        self.destroy();
    }
}
