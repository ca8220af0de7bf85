//! Line transport for one server session.
//!
//! Reads are framed by [`LineCodec`]. All writes go through a single writer
//! task fed by an mpsc channel, so the read loop and the presence poller can
//! send concurrently without interleaving lines.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, warn};

use super::codec::LineCodec;
use crate::error::TransportError;
use crate::proto::Command;

/// Pending outbound lines before senders start waiting.
const OUTBOUND_QUEUE: usize = 64;

/// Byte stream a session can run over.
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncStream for T {}

pub type BoxedStream = Box<dyn AsyncStream>;

/// Opens connections to the IRC server.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, address: &str) -> Result<BoxedStream, TransportError>;
}

/// Plain TCP with keepalive enabled.
pub struct TcpConnector;

impl TcpConnector {
    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, address: &str) -> Result<BoxedStream, TransportError> {
        let stream = TcpStream::connect(address)
            .await
            .map_err(|source| TransportError::Connect {
                address: address.to_string(),
                source,
            })?;

        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
        Ok(Box::new(stream))
    }
}

/// Cloneable handle for queueing outbound lines.
#[derive(Debug, Clone)]
pub struct LineSender {
    tx: mpsc::Sender<String>,
}

impl LineSender {
    /// Queue one raw line. CRLF is appended by the codec.
    pub async fn send(&self, line: impl Into<String>) -> Result<(), TransportError> {
        self.tx
            .send(line.into())
            .await
            .map_err(|_| TransportError::Closed)
    }

    pub async fn send_command(&self, command: Command) -> Result<(), TransportError> {
        self.send(command.to_string()).await
    }

    /// A sender paired with the receiving end, for exercising handlers
    /// without a socket.
    #[cfg(test)]
    pub(crate) fn pair(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

/// An established session connection.
pub struct Transport {
    reader: FramedRead<ReadHalf<BoxedStream>, LineCodec>,
    sender: LineSender,
    writer: JoinHandle<()>,
}

impl Transport {
    pub fn new(stream: BoxedStream) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE);
        let writer = tokio::spawn(write_loop(
            FramedWrite::new(write_half, LineCodec::new()),
            rx,
        ));

        Self {
            reader: FramedRead::new(read_half, LineCodec::new()),
            sender: LineSender { tx },
            writer,
        }
    }

    pub fn sender(&self) -> LineSender {
        self.sender.clone()
    }

    /// Next inbound line, `Ok(None)` on end of stream.
    ///
    /// Fails with [`TransportError::Closed`] if the writer task has stopped,
    /// which means the socket can no longer be written.
    pub async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        tokio::select! {
            line = self.reader.next() => line.transpose(),
            _ = self.sender.tx.closed() => Err(TransportError::Closed),
        }
    }

    /// Stop the writer and release the connection.
    pub async fn close(mut self) {
        self.writer.abort();
        let _ = (&mut self.writer).await;
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.writer.abort();
    }
}

async fn write_loop(
    mut sink: FramedWrite<WriteHalf<BoxedStream>, LineCodec>,
    mut rx: mpsc::Receiver<String>,
) {
    while let Some(line) = rx.recv().await {
        debug!(line = %line, "send");
        if let Err(e) = sink.send(line).await {
            warn!(error = %e, code = e.error_code(), "Write failed, stopping writer");
            break;
        }
    }
}
