//! TCP ingestion server: an accept loop on its own thread, one handler thread
//! per connection, cooperative shutdown through a shared flag.

mod handler;
mod listener;

pub use handler::capture_filename;

use crate::config::Config;
use crate::sink::SinkRegistry;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

/// Owns the listening socket's lifecycle and supervises connection handlers.
///
/// Dropping a running server signals shutdown and joins the accept loop;
/// handlers observe the same flag at their next poll tick and exit on their own.
pub struct Server {
    bind_address: String,
    port: u16,
    max_connections: usize,
    capture: handler::CaptureSettings,
    registry: Arc<SinkRegistry>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    local_addr: Option<SocketAddr>,
    accept_thread: Option<JoinHandle<()>>,
}

impl Server {
    /// The registry is created at startup and owned here; handlers receive it
    /// as `Arc` clones rather than reaching for any global state.
    #[must_use]
    pub fn new(config: &Config, registry: SinkRegistry) -> Self {
        Self {
            bind_address: config.server.address.clone(),
            port: config.server.port,
            max_connections: config.server.max_connections,
            capture: handler::CaptureSettings {
                dir: PathBuf::from(&config.file.directory),
                erase_first: config.file.erase_first,
                timestamps: config.file.timestamps,
            },
            registry: Arc::new(registry),
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            local_addr: None,
            accept_thread: None,
        }
    }

    /// Binds the socket and spawns the accept loop.
    ///
    /// Idempotent by run-state check: calling it while the loop is already
    /// running is a no-op. A bind failure is fatal: no retry, the error goes
    /// straight back to the caller.
    ///
    /// # Errors
    /// Invalid bind address, bind failure (port in use, permission denied), or
    /// thread spawn failure.
    pub fn start(&mut self) -> Result<(), crate::Error> {
        if self.is_running() {
            return Ok(());
        }

        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| crate::Error::InvalidAddress(self.bind_address.clone()))?;
        let addr = SocketAddr::new(ip, self.port);
        let socket = TcpListener::bind(addr).map_err(|e| crate::Error::Bind(addr, e))?;
        // Nonblocking so the accept loop can poll the shutdown flag
        socket.set_nonblocking(true)?;
        self.local_addr = Some(socket.local_addr()?);

        self.shutdown.store(false, Ordering::Relaxed);
        let ctx = listener::AcceptContext {
            registry: Arc::clone(&self.registry),
            shutdown: Arc::clone(&self.shutdown),
            active: Arc::clone(&self.active),
            max_connections: self.max_connections,
            capture: self.capture.clone(),
        };
        let thread = thread::Builder::new()
            .name("tcplog-accept".into())
            .spawn(move || listener::run_accept_loop(&socket, &ctx))?;
        self.accept_thread = Some(thread);

        self.registry
            .info(format!("Listening on {}", self.local_addr.unwrap_or(addr)));
        Ok(())
    }

    /// Signals shutdown and joins the accept loop.
    ///
    /// Handlers see the flag within one idle poll and finish on their own;
    /// they are not joined here. Calling `stop` while stopped is a no-op.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.accept_thread.take() {
            let _ = thread.join();
        }
        self.local_addr = None;
    }

    /// Run-state check backing `start`'s idempotence.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.accept_thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// The actually-bound address, for callers that bind port 0.
    #[must_use]
    pub const fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Live handler count, for the shell's `status` command and tests.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// The shell routes its own messages through the server's registry so all
    /// output shares one formatting pipeline.
    #[must_use]
    pub fn registry(&self) -> &Arc<SinkRegistry> {
        &self.registry
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop();
    }
}
