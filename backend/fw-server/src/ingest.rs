//! Line-oriented TCP event source.
//!
//! Every producer connection is read line by line and each non-blank line
//! becomes one broadcast message. A line longer than the configured limit
//! ends that producer's connection; other producers are unaffected.

use crate::{ServerError, ServerErrorResult};

use fw_config::IngestConfig;
use fw_ws::{MessageSender, ShutdownCoordinator};

use std::net::SocketAddr;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::net::TcpListener;

/// Why a producer connection stopped being read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerEnd {
    /// The producer closed its side
    Eof,
    /// A line exceeded the length limit
    LineTooLong,
    /// The queue no longer accepts messages
    QueueClosed,
    /// Server shutdown
    Shutdown,
    /// Read error on the socket
    ReadFailed,
}

pub struct IngestServer {
    listener: TcpListener,
    sender: MessageSender,
    max_line_length: usize,
}

impl IngestServer {
    /// Bind the ingest listener
    pub async fn bind(config: &IngestConfig, sender: MessageSender) -> ServerErrorResult<Self> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ServerError::bind(addr.clone(), e))?;

        Ok(Self {
            listener,
            sender,
            max_line_length: config.max_line_length,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept producers until shutdown
    pub async fn run(self, shutdown: ShutdownCoordinator) {
        let mut guard = shutdown.subscribe_guard();

        loop {
            tokio::select! {
                biased;

                _ = guard.wait() => {
                    info!("Ingest listener stopping");
                    break;
                }

                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!("Producer connected from {peer}");
                        let sender = self.sender.clone();
                        let shutdown = shutdown.clone();
                        let max_line_length = self.max_line_length;
                        tokio::spawn(async move {
                            let end = read_lines(stream, sender, max_line_length, shutdown).await;
                            info!("Producer {peer} disconnected ({end:?})");
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept producer connection: {e}");
                    }
                },
            }
        }
    }
}

/// Push each line of `reader` into the queue
pub async fn read_lines<R>(
    reader: R,
    sender: MessageSender,
    max_line_length: usize,
    shutdown: ShutdownCoordinator,
) -> ProducerEnd
where
    R: AsyncRead + Unpin,
{
    let mut guard = shutdown.subscribe_guard();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    // Room for the longest line plus "\r\n"
    let read_limit = max_line_length as u64 + 2;

    loop {
        buf.clear();
        let mut limited = (&mut reader).take(read_limit);

        let read = tokio::select! {
            biased;

            _ = guard.wait() => return ProducerEnd::Shutdown,
            read = limited.read_until(b'\n', &mut buf) => read,
        };

        match read {
            Ok(0) => return ProducerEnd::Eof,
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read from producer: {e}");
                return ProducerEnd::ReadFailed;
            }
        }

        let line = strip_terminator(&buf);
        if line.len() > max_line_length {
            warn!("Dropping producer: line exceeds {max_line_length} bytes");
            return ProducerEnd::LineTooLong;
        }

        let Ok(line) = std::str::from_utf8(line) else {
            warn!("Skipping line that is not valid UTF-8");
            continue;
        };

        if line.trim().is_empty() {
            continue;
        }

        if sender.send(line).await.is_err() {
            debug!("Queue closed, no longer reading from producer");
            return ProducerEnd::QueueClosed;
        }
    }
}

fn strip_terminator(buf: &[u8]) -> &[u8] {
    match buf {
        [line @ .., b'\r', b'\n'] => line,
        [line @ .., b'\n'] => line,
        line => line,
    }
}
