//! The accept loop: take connections forever, hand each to its own handler
//! thread, never wait for any of them.

use super::handler::{CaptureSettings, ConnectionHandler};
use crate::sink::SinkRegistry;
use std::io::ErrorKind;
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// How long the loop sleeps between accept attempts when no connection is
/// pending; this bounds how quickly shutdown is observed.
const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// Everything a running accept loop needs, cloned off the server before the
/// thread spawns.
pub(super) struct AcceptContext {
    pub registry: Arc<SinkRegistry>,
    pub shutdown: Arc<AtomicBool>,
    pub active: Arc<AtomicUsize>,
    pub max_connections: usize,
    pub capture: CaptureSettings,
}

/// Accepts until shutdown is signalled or a non-transient accept error occurs.
///
/// Spawn-and-forget per connection, bounded by `max_connections`: at the
/// ceiling a new connection is logged and dropped instead of getting a handler.
pub(super) fn run_accept_loop(socket: &TcpListener, ctx: &AcceptContext) {
    while !ctx.shutdown.load(Ordering::Relaxed) {
        match socket.accept() {
            Ok((stream, peer)) => {
                if ctx.active.load(Ordering::Relaxed) >= ctx.max_connections {
                    ctx.registry
                        .warning(format!("Connection ceiling reached, dropping {peer}"));
                    continue;
                }

                ctx.registry.info(format!("Connected {}", peer.ip()));
                let handler = ConnectionHandler::new(
                    stream,
                    peer,
                    Arc::clone(&ctx.registry),
                    Arc::clone(&ctx.shutdown),
                    ctx.capture.clone(),
                );

                ctx.active.fetch_add(1, Ordering::Relaxed);
                let active = Arc::clone(&ctx.active);
                let spawned = thread::Builder::new()
                    .name(format!("tcplog-conn-{}", peer.ip()))
                    .spawn(move || {
                        handler.run();
                        active.fetch_sub(1, Ordering::Relaxed);
                    });
                if let Err(e) = spawned {
                    ctx.active.fetch_sub(1, Ordering::Relaxed);
                    ctx.registry
                        .error(format!("Failed to spawn handler for {peer}: {e}"));
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL);
            }
            // A peer that vanished between connect and accept is not our problem
            Err(e) if matches!(e.kind(), ErrorKind::ConnectionAborted | ErrorKind::Interrupted) => {}
            Err(e) => {
                ctx.registry.error(format!("Accept failed: {e}"));
                break;
            }
        }
    }
    ctx.registry.debug("Accept loop stopped");
}
