//! Per-connection read-until-idle loop.
//!
//! A burst is everything a peer sends between two idle checkpoints; each burst
//! becomes exactly one record in that peer's capture file. Termination policy:
//! a read returning zero bytes (clean EOF) or failing hard ends the
//! connection, as does the server's shutdown flag. A timed-out read never
//! does; it only closes out the current burst.

use crate::level::{Category, Level};
use crate::sink::{FileSink, LogRecord, Sink, SinkRegistry, timestamped_formatter};
use std::io::{ErrorKind, Read};
use std::net::{IpAddr, SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// The idle poll: how long a read waits before declaring the current burst
/// finished.
const IDLE_POLL: Duration = Duration::from_millis(1000);

/// Reads drain through a fixed buffer of this size.
const READ_BUF: usize = 1024;

/// Derives a peer's capture file name: dots (and, for IPv6, colons) become
/// underscores, so `192.168.1.10` maps to `192_168_1_10.log`.
#[must_use]
pub fn capture_filename(peer: IpAddr) -> String {
    let mut name = peer.to_string().replace(['.', ':'], "_");
    name.push_str(".log");
    name
}

/// How a handler lays down its peer's capture file, cloned off the server per
/// connection.
#[derive(Clone)]
pub(super) struct CaptureSettings {
    pub dir: PathBuf,
    pub erase_first: bool,
    pub timestamps: bool,
}

/// Owns one accepted connection for its entire lifetime; nothing is shared
/// with other handlers except the registry and the shutdown flag.
pub(super) struct ConnectionHandler {
    stream: TcpStream,
    peer: SocketAddr,
    registry: Arc<SinkRegistry>,
    shutdown: Arc<AtomicBool>,
    capture: CaptureSettings,
}

impl ConnectionHandler {
    pub(super) fn new(
        stream: TcpStream,
        peer: SocketAddr,
        registry: Arc<SinkRegistry>,
        shutdown: Arc<AtomicBool>,
        capture: CaptureSettings,
    ) -> Self {
        Self {
            stream,
            peer,
            registry,
            shutdown,
            capture,
        }
    }

    /// Runs the connection to completion. Failures stay isolated here: the
    /// handler stops, the listener and every other handler keep going.
    pub(super) fn run(mut self) {
        let path = self.capture.dir.join(capture_filename(self.peer.ip()));
        let mut sink = FileSink::new(path, self.capture.erase_first);
        if self.capture.timestamps {
            sink = sink.formatter(timestamped_formatter());
        }

        // Accepted sockets can inherit the listener's nonblocking mode on some
        // platforms; reads here must block for up to one idle poll
        let configured = self
            .stream
            .set_nonblocking(false)
            .and_then(|()| self.stream.set_read_timeout(Some(IDLE_POLL)));
        match configured {
            Ok(()) => self.read_until_closed(&sink),
            Err(e) => self
                .registry
                .error(format!("Failed to configure {}: {e}", self.peer.ip())),
        }

        self.registry.info(format!("Disconnected {}", self.peer.ip()));
    }

    fn read_until_closed(&mut self, sink: &FileSink) {
        let mut buf = [0u8; READ_BUF];
        let mut burst: Vec<u8> = Vec::new();

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            match self.stream.read(&mut buf) {
                // Clean EOF: the pending burst is emitted even when empty, so a
                // peer that connected and sent nothing still leaves one record.
                Ok(0) => {
                    let _ = self.emit_burst(sink, &burst);
                    break;
                }
                Ok(n) => burst.extend_from_slice(&buf[..n]),
                // Idle poll elapsed: a pending burst is complete, an empty one
                // keeps polling.
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    if !burst.is_empty() {
                        if self.emit_burst(sink, &burst).is_err() {
                            break;
                        }
                        burst.clear();
                    }
                }
                Err(e) => {
                    self.registry
                        .verbose(format!("Read error from {}: {e}", self.peer.ip()));
                    break;
                }
            }
        }
    }

    /// One burst, one record, one append. Payload bytes are opaque, so lossy
    /// UTF-8 decoding can never fail the handler.
    fn emit_burst(&self, sink: &FileSink, burst: &[u8]) -> Result<(), crate::Error> {
        let text = String::from_utf8_lossy(burst).into_owned();
        let record = LogRecord::new(text, Level::Normal, Category::Info);
        sink.log(&record).inspect_err(|e| {
            self.registry
                .error(format!("Capture write failed for {}: {e}", self.peer.ip()));
        })
    }
}
