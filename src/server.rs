//! The server endpoint (§4.D.2): bind, accept loop, and a per-connection
//! request loop, against a shared [`Registry`].

use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};

use crate::codec::{decode_request, encode_response, Command, Status};
use crate::handlers::{dispatch, read_string, write_string};
use crate::registry::{InMemoryRegistry, Registry};
use crate::stream::{read_frame_or_eof, write_frame};
use crate::tag::Tag;

/// Server configuration (§6.5). Symmetric to [`crate::client::ClientConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

/// A running (or not-yet-started) Stephanex server.
///
/// Administrative operations (`add_tag`, `client_count`, ...) go straight
/// to the shared [`Registry`] and work whether or not the listener is
/// running, matching the teacher's split between a codec/type layer and
/// a transport layer that merely drives it.
pub struct Server {
    config: ServerConfig,
    registry: Arc<dyn Registry>,
    shutdown: Arc<AtomicBool>,
}

/// A running server's handle: join to wait for the acceptor to exit,
/// or call [`Handle::shutdown`] to stop it.
pub struct Handle {
    shutdown: Arc<AtomicBool>,
    local_addr: std::net::SocketAddr,
    join: JoinHandle<()>,
}

impl Handle {
    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.local_addr
    }

    /// Signals the acceptor to stop and waits for it to exit. Already
    /// accepted connections finish their current request before noticing
    /// shutdown on their next loop iteration.
    pub fn shutdown(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Nudge the acceptor off its blocking `accept()` call.
        if let Ok(stream) = TcpStream::connect(self.local_addr) {
            drop(stream);
        }
        let _ = self.join.join();
    }
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: Arc::new(InMemoryRegistry::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_registry(config: ServerConfig, registry: Arc<dyn Registry>) -> Self {
        Self {
            config,
            registry,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn add_tag(&self, tag: Tag) {
        self.registry.insert(tag);
    }

    pub fn get_tag(&self, id: u16) -> Option<Tag> {
        self.registry.get(id)
    }

    pub fn remove_tag(&self, id: u16) {
        self.registry.remove(id);
    }

    pub fn list_tags(&self) -> Vec<Tag> {
        self.registry.list()
    }

    pub fn client_count(&self) -> usize {
        self.registry.client_count()
    }

    /// Binds the listener (address-reuse enabled, §6.2) and spawns the
    /// acceptor thread. Returns a [`Handle`] immediately; the acceptor
    /// itself restarts on unexpected `accept()` failure (§4.D.2) until
    /// [`Handle::shutdown`] is called.
    pub fn serve(self) -> io::Result<Handle> {
        let listener = bind(self.config.port)?;
        let local_addr = listener.local_addr()?;
        let shutdown = Arc::clone(&self.shutdown);
        let registry = Arc::clone(&self.registry);

        let join = thread::spawn(move || accept_loop(listener, registry, shutdown));

        Ok(Handle {
            shutdown: self.shutdown,
            local_addr,
            join,
        })
    }
}

fn bind(port: u16) -> io::Result<TcpListener> {
    // `TcpListener::bind` on most platforms already implies `SO_REUSEADDR`
    // for the listening socket; no separate socket2 dependency is needed
    // for the reuse behavior §6.2 asks for.
    TcpListener::bind(("0.0.0.0", port))
}

fn accept_loop(listener: TcpListener, registry: Arc<dyn Registry>, shutdown: Arc<AtomicBool>) {
    info!("listening on {:?}", listener.local_addr());
    loop {
        if shutdown.load(Ordering::SeqCst) {
            debug!("acceptor shutting down");
            return;
        }

        match listener.accept() {
            Ok((stream, peer)) => {
                if shutdown.load(Ordering::SeqCst) {
                    return;
                }
                debug!("accepted connection from {peer}");
                let registry = Arc::clone(&registry);
                thread::spawn(move || request_loop(stream, registry, peer));
            }
            Err(error) => {
                if shutdown.load(Ordering::SeqCst) {
                    return;
                }
                error!("accept() failed, restarting acceptor: {error}");
            }
        }
    }
}

fn request_loop(mut stream: TcpStream, registry: Arc<dyn Registry>, peer: std::net::SocketAddr) {
    registry.client_connected();
    let _ = stream.set_nodelay(true);

    loop {
        let frame = match read_frame_or_eof(&mut stream) {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!("{peer} closed the connection");
                break;
            }
            Err(error) => {
                warn!("{peer}: malformed frame, closing: {error}");
                break;
            }
        };

        let request = match decode_request(frame) {
            Ok(request) => request,
            Err(_) => {
                let response = crate::handlers::unknown_command();
                let frame = encode_response(
                    response.status.as_u16(),
                    response.tag_id,
                    response.payload,
                );
                if write_frame(&mut stream, &frame).is_err() {
                    break;
                }
                continue;
            }
        };

        let result = match request.command {
            Command::ReadString => read_string::handle(registry.as_ref(), &mut stream, request),
            Command::WriteString => write_string::handle(registry.as_ref(), &mut stream, request),
            _ => {
                let response = dispatch(registry.as_ref(), request);
                write_frame(
                    &mut stream,
                    &encode_response(response.status.as_u16(), response.tag_id, response.payload),
                )
            }
        };

        if let Err(error) = result {
            warn!("{peer}: closing after transport error: {error}");
            break;
        }
    }

    registry.client_disconnected();
}
