//! `WriteString` (§4.B.5, §3.5): the multi-frame string-write extension.
//! The announced byte count is always consumed in full before the tag is
//! touched, even when the tag turns out to be missing or invalid — a
//! short read here would desynchronize the stream for every request that
//! follows (§5).

use std::io::{Read, Write};

use crate::codec::{
    decode_response, encode_request, encode_response, frames_needed, pad_to_frame_size,
    utf16le_to_utf8, utf8_to_utf16le, Command, RequestFrame, Status,
};
use crate::error::Error;
use crate::registry::Registry;
use crate::stream::{read_frame, read_frames, write_frame, write_frames};
use crate::tag::DataType;

/// Server-side: consumes the announced body, then validates and applies it.
pub fn handle<S: Read + Write>(
    registry: &dyn Registry,
    stream: &mut S,
    request: RequestFrame,
) -> Result<(), Error> {
    let code_units = u32::from_le_bytes(request.payload) as usize;
    let byte_length = code_units * 2;
    let mut body = read_frames(stream, frames_needed(byte_length))?;
    body.truncate(byte_length);

    let tag = registry.get(request.tag_id);
    let status = match &tag {
        None => Some(Status::ImplausibleArgument),
        Some(tag) if tag.data_type() != DataType::String => Some(Status::ImplausibleArgument),
        Some(tag) if !tag.access.is_writable() => Some(Status::UnauthorizedAccess),
        Some(_) => None,
    };
    if let Some(status) = status {
        return reply(stream, status, request.tag_id);
    }

    let value = match utf16le_to_utf8(&body) {
        Ok(value) => value,
        Err(_) => return reply(stream, Status::ImplausibleArgument, request.tag_id),
    };

    match registry.update_string(request.tag_id, value) {
        Ok(()) => reply(stream, Status::Successful, request.tag_id),
        Err(_) => reply(stream, Status::WriteNotSuccessful, request.tag_id),
    }
}

fn reply<S: Write>(stream: &mut S, status: Status, tag_id: u16) -> Result<(), Error> {
    write_frame(stream, &encode_response(status.as_u16(), tag_id, [0; 4]))
}

/// Client-side: writes `value` as `tag_id`'s string body.
pub fn execute<S: Read + Write>(stream: &mut S, tag_id: u16, value: &str) -> Result<(), Error> {
    let unpadded = utf8_to_utf16le(value);
    let code_units = (unpadded.len() / 2) as u32;
    write_frame(
        stream,
        &encode_request(Command::WriteString.as_u16(), tag_id, code_units.to_le_bytes()),
    )?;
    write_frames(stream, &pad_to_frame_size(unpadded))?;

    let response = decode_response(read_frame(stream)?)?;
    if let Some(error) = response.status.into_error(tag_id) {
        return Err(error);
    }
    if response.tag_id != tag_id || response.payload != [0; 4] {
        return Err(Error::InvalidWriteResponse);
    }
    Ok(())
}
