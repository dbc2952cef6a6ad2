//! Low-level frame I/O shared by the client and server endpoints.
//!
//! Every suspension point in the protocol (§5) funnels through the two
//! functions here: a read awaits one 8-byte frame, a write sends one.
//! Multi-frame string transfers are built by calling these in a loop; a
//! caller that needs to stop partway (cancellation, a fatal peer error)
//! is expected to close the whole connection rather than resume later,
//! since a short read/write leaves the stream's framing unknown.

use std::io::{self, Read, Write};

use crate::codec::{Frame, FRAME_SIZE};
use crate::error::Error;

fn map_io_error(error: io::Error) -> Error {
    match error.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout,
        _ => Error::Io(error),
    }
}

/// Reads one frame, or `Ok(None)` if the peer closed the connection
/// cleanly before sending any bytes of it.
///
/// A close after some but not all of the 8 bytes arrived is a malformed
/// frame, not a clean close: the stream desynchronized mid-frame.
pub fn read_frame_or_eof<R: Read>(reader: &mut R) -> Result<Option<Frame>, Error> {
    let mut frame = [0u8; FRAME_SIZE];
    let mut filled = 0;

    loop {
        match reader.read(&mut frame[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(Error::MalformedFrame),
            Ok(n) => {
                filled += n;
                if filled == FRAME_SIZE {
                    return Ok(Some(frame));
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(map_io_error(e)),
        }
    }
}

/// Reads one frame. A clean peer close is reported as [`Error::PeerClosed`]
/// rather than `Ok(None)`; use [`read_frame_or_eof`] where a clean close is
/// an expected outcome (the server's top-level request loop).
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Frame, Error> {
    read_frame_or_eof(reader)?.ok_or(Error::PeerClosed)
}

/// Writes one frame.
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<(), Error> {
    writer.write_all(frame).map_err(map_io_error)
}

/// Reads `count` concatenated frames, returning their raw bytes
/// (`count * 8` bytes). Used by the multi-frame string extension.
pub fn read_frames<R: Read>(reader: &mut R, count: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::with_capacity(count * FRAME_SIZE);
    for _ in 0..count {
        bytes.extend_from_slice(&read_frame(reader)?);
    }
    Ok(bytes)
}

/// Writes `bytes` as a sequence of frames. `bytes.len()` must already be a
/// multiple of 8 (see [`crate::codec::pad_to_frame_size`]).
pub fn write_frames<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<(), Error> {
    if bytes.len() % FRAME_SIZE != 0 {
        return Err(Error::InvalidFrameSize(bytes.len()));
    }
    for chunk in bytes.chunks_exact(FRAME_SIZE) {
        let mut frame = [0u8; FRAME_SIZE];
        frame.copy_from_slice(chunk);
        write_frame(writer, &frame)?;
    }
    Ok(())
}
