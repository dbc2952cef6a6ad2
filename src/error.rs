//! The crate-wide error type.

use thiserror::Error;

use crate::codec::Status;

/// Everything that can go wrong on either side of a connection.
///
/// Server-side per-request failures are normally turned into a [`Status`]
/// frame and never reach a caller as an `Error` (see the module docs on
/// [`crate::handlers`]); the client surfaces every failure through this
/// type instead, closing the connection whenever the failure leaves the
/// stream's framing in doubt.
#[derive(Debug, Error)]
pub enum Error {
    // ----- Wire-level -----
    #[error("frame is not well-formed")]
    MalformedFrame,

    #[error("unknown command id {0}")]
    UnknownCommand(u16),

    #[error("unknown status code {0:#06x}")]
    UnknownStatus(u16),

    #[error("expected a frame of 8 bytes, got {0}")]
    InvalidFrameSize(usize),

    #[error("response tag_id did not match the request")]
    TagIdMismatch,

    // ----- Protocol-level (surfaced server status) -----
    #[error("server replied with status {0:?}")]
    Status(Status),

    // ----- Encoding -----
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("payload contains an incomplete UTF-8 sequence")]
    IncompleteUtf8,

    #[error("payload is not valid UTF-16")]
    InvalidUtf16,

    #[error("payload contains an incomplete UTF-16 code unit")]
    IncompleteUtf16,

    // ----- Transport -----
    #[error("not connected")]
    NotConnected,

    #[error("operation timed out")]
    Timeout,

    #[error("peer closed the connection")]
    PeerClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    // ----- Semantic -----
    #[error("server's NoOp response was not a valid acknowledgment")]
    InvalidNoOpResponse,

    #[error("server's write response was not a valid acknowledgment")]
    InvalidWriteResponse,

    #[error("value does not match the tag's data type")]
    InvalidValue,

    #[error("tag {0} is not registered")]
    NotFound(u16),
}

impl Status {
    /// Converts a response status into an [`Error`], preserving the status
    /// verbatim. `Successful` and `Alive` are not errors and map to `None`.
    pub fn into_error(self, _tag_id: u16) -> Option<Error> {
        match self {
            Status::Successful | Status::Alive => None,
            other => Some(Error::Status(other)),
        }
    }
}
