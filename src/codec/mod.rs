//! Wire framing and codec: the fixed 8-byte frame, the command/status
//! tables, and the multi-frame padding/count arithmetic used by string
//! transfers.
//!
//! The codec is pure and stateless: every function here is a plain
//! transformation on bytes, with no notion of a connection or a tag
//! registry.

mod decode;
mod encode;
mod text;

pub use decode::{decode_request, decode_response};
pub use encode::{encode_request, encode_response};
pub use text::{frames_needed, pad_to_frame_size, utf16le_to_utf8, utf8_to_utf16le};

use crate::error::Error;

/// The fixed wire unit: exactly 8 bytes.
pub const FRAME_SIZE: usize = 8;

pub type Frame = [u8; FRAME_SIZE];

/// A decoded request: the opcode occupying bytes 0-1 of a request frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Command {
    /// Heartbeat.
    NoOp = 1,
    ReadSingleValue = 2,
    WriteSingleValue = 3,
    /// Reserved, unimplemented.
    ReadList = 4,
    /// Reserved, unimplemented.
    WriteList = 5,
    ReadString = 8,
    WriteString = 9,
}

impl Command {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for Command {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Command::NoOp),
            2 => Ok(Command::ReadSingleValue),
            3 => Ok(Command::WriteSingleValue),
            4 => Ok(Command::ReadList),
            5 => Ok(Command::WriteList),
            8 => Ok(Command::ReadString),
            9 => Ok(Command::WriteString),
            other => Err(Error::UnknownCommand(other)),
        }
    }
}

/// A decoded response: the code occupying bytes 0-1 of a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Status {
    Successful = 0x0000,
    WriteNotSuccessful = 0x8888,
    MemoryOverflow = 0x9999,
    UnknownCommand = 0xAAAA,
    UnauthorizedAccess = 0xBBBB,
    ServerOverload = 0xCCCC,
    ImplausibleArgument = 0xDDDD,
    ImplausibleList = 0xEEEE,
    Alive = 0xFFFF,
}

impl Status {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for Status {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0000 => Ok(Status::Successful),
            0x8888 => Ok(Status::WriteNotSuccessful),
            0x9999 => Ok(Status::MemoryOverflow),
            0xAAAA => Ok(Status::UnknownCommand),
            0xBBBB => Ok(Status::UnauthorizedAccess),
            0xCCCC => Ok(Status::ServerOverload),
            0xDDDD => Ok(Status::ImplausibleArgument),
            0xEEEE => Ok(Status::ImplausibleList),
            0xFFFF => Ok(Status::Alive),
            other => Err(Error::UnknownStatus(other)),
        }
    }
}

/// A decoded request frame: `(command, tag_id, payload)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFrame {
    pub command: Command,
    pub tag_id: u16,
    pub payload: [u8; 4],
}

/// A decoded response frame: `(status, tag_id, payload)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame {
    pub status: Status,
    pub tag_id: u16,
    pub payload: [u8; 4],
}
