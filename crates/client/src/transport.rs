//! Transport - buffered, newline-delimited I/O over one stream
//!
//! Reads and writes are line-atomic: `read_line` yields exactly one record with
//! its terminator stripped, `write_line` frames and flushes one command before
//! returning so it is on the wire before the next read starts.

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter, Lines,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, trace, warn};

use crate::error::TransportError;
use crate::protocol::encode;
use crate::types::BUF_SIZE;
use crate::wire_log::{Direction, WireLog};

pub struct Transport<R, W> {
    lines: Lines<BufReader<R>>,
    writer: BufWriter<W>,
    wire_log: Option<WireLog>,
    lines_read: u64,
    lines_written: u64,
}

/// Transport over a TCP connection.
pub type TcpTransport = Transport<OwnedReadHalf, OwnedWriteHalf>;

impl TcpTransport {
    /// Connect to the game server.
    pub async fn connect(host: &str, port: u16) -> Result<Self, TransportError> {
        let stream = TcpStream::connect((host, port)).await?;
        // Commands are tiny and must not sit in Nagle's buffer.
        stream.set_nodelay(true)?;
        debug!(host, port, peer = ?stream.peer_addr().ok(), "connected");
        let (read_half, write_half) = stream.into_split();
        Ok(Self::new(read_half, write_half))
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::with_capacity(BUF_SIZE, reader).lines(),
            writer: BufWriter::with_capacity(BUF_SIZE, writer),
            wire_log: None,
            lines_read: 0,
            lines_written: 0,
        }
    }

    /// Mirror every line into a JSONL transcript.
    pub fn with_wire_log(mut self, wire_log: WireLog) -> Self {
        self.wire_log = Some(wire_log);
        self
    }

    /// Read one line. End-of-stream is [`TransportError::ConnectionClosed`].
    pub async fn read_line(&mut self) -> Result<String, TransportError> {
        let Some(line) = self.lines.next_line().await? else {
            return Err(TransportError::ConnectionClosed);
        };
        self.lines_read += 1;
        trace!(line = %line, "recv");
        if let Some(log) = self.wire_log.as_mut() {
            log.record(Direction::In, &line).await;
        }
        Ok(line)
    }

    /// Write one command, newline-terminated exactly once, and flush.
    pub async fn write_line(&mut self, command: &str) -> Result<(), TransportError> {
        let framed = encode(command);
        self.writer.write_all(framed.as_bytes()).await?;
        self.writer.flush().await?;
        self.lines_written += 1;
        debug!(line = %framed.trim_end(), "send");
        if let Some(log) = self.wire_log.as_mut() {
            log.record(Direction::Out, &framed).await;
        }
        Ok(())
    }

    /// Flush and close the write side.
    pub async fn shutdown(&mut self) -> Result<(), TransportError> {
        if self.wire_log.as_ref().is_some_and(|log| !log.is_enabled()) {
            warn!("wire transcript is incomplete");
        }
        self.writer.shutdown().await?;
        Ok(())
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}
