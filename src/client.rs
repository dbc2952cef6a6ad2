//! The client endpoint (§4.D.1): a connection plus an optional background
//! heartbeat, exposing fail-fast operations when disconnected.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::error::Error;
use crate::handlers::{noop, read_string, read_value, write_string, write_value};
use crate::tag::{DataType, Value};

/// Client configuration (§6.4). `host` has no default; everything else
/// does.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub heartbeat_enabled: bool,
    pub heartbeat_interval: Duration,
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 5000,
            timeout: Duration::from_millis(5000),
            heartbeat_enabled: true,
            heartbeat_interval: Duration::from_millis(20_000),
        }
    }
}

/// Resolves `(host, port)` and tries each candidate address in turn with
/// [`TcpStream::connect_timeout`], returning the first successful
/// connection. The last candidate's error is surfaced if every address
/// fails; resolution itself failing (no addresses) is reported the same
/// way, as an `Error::Io`.
fn connect_with_timeout(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, Error> {
    let addrs = (host, port).to_socket_addrs().map_err(Error::Io)?;
    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(error) => last_error = Some(error),
        }
    }
    Err(Error::Io(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("no addresses found for {host}:{port}"))
    })))
}

/// A connection to a Stephanex server.
///
/// `Disconnected -> connect -> Connected -> disconnect -> Disconnected`,
/// with a fatal I/O error on any operation also driving the transition
/// back to `Disconnected` (§4.D.1). The socket lives behind a mutex so
/// the optional heartbeat thread and the caller's own calls serialize on
/// the same connection, matching the "one request in flight per
/// connection" contract of §5.
pub struct Client {
    config: ClientConfig,
    socket: Mutex<Option<TcpStream>>,
    connected: AtomicBool,
    heartbeat: Mutex<Option<HeartbeatHandle>>,
}

struct HeartbeatHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            socket: Mutex::new(None),
            connected: AtomicBool::new(false),
            heartbeat: Mutex::new(None),
        }
    }

    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Opens the TCP connection and, if configured, starts the periodic
    /// heartbeat thread.
    ///
    /// `timeout` (§6.4) bounds the connect step itself, not just the
    /// per-operation reads/writes that follow: each resolved address is
    /// tried with [`TcpStream::connect_timeout`], so a peer that never
    /// answers fails after `timeout` instead of after the OS's own
    /// (typically much longer) SYN timeout.
    pub fn connect(self: &Arc<Self>) -> Result<(), Error> {
        let stream = connect_with_timeout(&self.config.host, self.config.port, self.config.timeout)?;
        stream.set_read_timeout(Some(self.config.timeout)).map_err(Error::Io)?;
        stream.set_write_timeout(Some(self.config.timeout)).map_err(Error::Io)?;
        stream.set_nodelay(true).map_err(Error::Io)?;

        *self.socket.lock().expect("client socket mutex poisoned") = Some(stream);
        self.connected.store(true, Ordering::SeqCst);
        debug!("connected to {}:{}", self.config.host, self.config.port);

        if self.config.heartbeat_enabled {
            self.start_heartbeat();
        }
        Ok(())
    }

    fn start_heartbeat(self: &Arc<Self>) {
        let stop = Arc::new(AtomicBool::new(false));
        let client = Arc::clone(self);
        let stop_for_thread = Arc::clone(&stop);
        let interval = self.config.heartbeat_interval;

        let join = thread::spawn(move || {
            while !stop_for_thread.load(Ordering::SeqCst) {
                thread::sleep(interval);
                if stop_for_thread.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(error) = client.no_op() {
                    warn!("heartbeat failed, disconnecting: {error}");
                    client.close_after_failure();
                    break;
                }
            }
        });

        *self.heartbeat.lock().expect("heartbeat mutex poisoned") = Some(HeartbeatHandle { stop, join });
    }

    /// Closes the socket and transitions to `Disconnected`, without
    /// joining the heartbeat thread (called from inside that thread).
    fn close_after_failure(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.socket.lock().expect("client socket mutex poisoned").take();
    }

    /// Closes the connection and stops the heartbeat thread, if any.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.socket.lock().expect("client socket mutex poisoned").take();

        if let Some(heartbeat) = self.heartbeat.lock().expect("heartbeat mutex poisoned").take() {
            heartbeat.stop.store(true, Ordering::SeqCst);
            let _ = heartbeat.join.join();
        }
    }

    fn with_socket<F, T>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut TcpStream) -> Result<T, Error>,
    {
        if !self.connected() {
            return Err(Error::NotConnected);
        }
        let mut guard = self.socket.lock().expect("client socket mutex poisoned");
        let stream = guard.as_mut().ok_or(Error::NotConnected)?;
        match f(stream) {
            Ok(value) => Ok(value),
            Err(error) => {
                drop(guard);
                self.close_after_failure();
                Err(error)
            }
        }
    }

    /// Sends a heartbeat (§4.B.1).
    pub fn no_op(&self) -> Result<(), Error> {
        self.with_socket(noop::execute)
    }

    /// Reads a numeric tag's value, decoding the raw payload according to
    /// `data_type` (§4.B.2).
    pub fn read_value(&self, tag_id: u16, data_type: DataType) -> Result<Value, Error> {
        let payload = self.with_socket(|stream| read_value::execute(stream, tag_id))?;
        match data_type {
            DataType::Integer => Ok(Value::Integer(i32::from_le_bytes(payload))),
            DataType::Unsigned => Ok(Value::Unsigned(u32::from_le_bytes(payload))),
            DataType::Float => Ok(Value::Float(f32::from_le_bytes(payload))),
            DataType::String => Err(Error::InvalidValue),
        }
    }

    /// Writes a numeric tag's value (§4.B.3).
    pub fn write_value(&self, tag_id: u16, value: Value) -> Result<(), Error> {
        let payload = match value {
            Value::Integer(v) => v.to_le_bytes(),
            Value::Unsigned(v) => v.to_le_bytes(),
            Value::Float(v) => v.to_le_bytes(),
            Value::String => return Err(Error::InvalidValue),
        };
        self.with_socket(|stream| write_value::execute(stream, tag_id, payload))
    }

    /// Reads a string tag (§4.B.4).
    pub fn read_string(&self, tag_id: u16) -> Result<String, Error> {
        self.with_socket(|stream| read_string::execute(stream, tag_id))
    }

    /// Writes a string tag (§4.B.5).
    pub fn write_string(&self, tag_id: u16, value: &str) -> Result<(), Error> {
        self.with_socket(|stream| write_string::execute(stream, tag_id, value))
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        if self.connected() {
            self.disconnect();
        }
    }
}
