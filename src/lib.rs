//! A codec, tag registry, and client/server endpoints for the Stephanex
//! tag protocol: a binary, TCP-based protocol for exchanging named,
//! typed "tag" values with industrial filling/dosing equipment.
//!
//! The crate is organized the way the wire protocol itself is layered:
//!
//! - [`codec`] — the fixed 8-byte frame, command/status tables, and the
//!   UTF-16LE multi-frame string extension. Pure byte transformations,
//!   no I/O.
//! - [`tag`] and [`registry`] — the server-side data model: typed tag
//!   values and the concurrent store handlers read and write.
//! - [`handlers`] — one request/response exchange per command, shared by
//!   both [`client`] and [`server`].
//! - [`client`] and [`server`] — the two connection endpoints built on
//!   blocking `std::net` sockets.
//!
//! [`error::Error`] is the single error type used throughout.

pub mod client;
pub mod codec;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod server;
pub mod stream;
pub mod tag;

pub use client::{Client, ClientConfig};
pub use error::Error;
pub use registry::{InMemoryRegistry, Registry};
pub use server::{Server, ServerConfig};
pub use tag::{Access, DataType, Tag, Value};
