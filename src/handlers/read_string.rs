//! `ReadString` (§4.B.4, §3.5): the multi-frame string-read extension. The
//! header frame carries a status and, on success, the UTF-16 code-unit
//! count `L`; the body is `⌈2L/8⌉` frames of UTF-16LE text, last frame
//! zero-padded.

use std::io::{Read, Write};

use crate::codec::{
    decode_response, encode_request, encode_response, frames_needed, pad_to_frame_size,
    utf16le_to_utf8, utf8_to_utf16le, Command, RequestFrame, Status,
};
use crate::error::Error;
use crate::registry::Registry;
use crate::stream::{read_frame, read_frames, write_frame, write_frames};
use crate::tag::DataType;

/// Server-side: handles one exchange end to end, writing the header frame
/// and (on success) the UTF-16LE body directly to `stream`.
pub fn handle<S: Write>(
    registry: &dyn Registry,
    stream: &mut S,
    request: RequestFrame,
) -> Result<(), Error> {
    if request.payload != [0; 4] {
        return reply_header(stream, Status::ImplausibleArgument, request.tag_id, [0; 4]);
    }

    let tag = registry.get(request.tag_id);
    let status = match &tag {
        None => Some(Status::ImplausibleArgument),
        Some(tag) if tag.data_type() != DataType::String => Some(Status::ImplausibleArgument),
        Some(tag) if !tag.access.is_readable() => Some(Status::UnauthorizedAccess),
        Some(_) => None,
    };
    if let Some(status) = status {
        return reply_header(stream, status, request.tag_id, [0; 4]);
    }
    let tag = tag.expect("status is None only when tag is Some");

    let unpadded = utf8_to_utf16le(tag.string_value());
    let code_units = (unpadded.len() / 2) as u32;
    reply_header(
        stream,
        Status::Successful,
        request.tag_id,
        code_units.to_le_bytes(),
    )?;
    write_frames(stream, &pad_to_frame_size(unpadded))
}

fn reply_header<S: Write>(
    stream: &mut S,
    status: Status,
    tag_id: u16,
    payload: [u8; 4],
) -> Result<(), Error> {
    write_frame(stream, &encode_response(status.as_u16(), tag_id, payload))
}

/// Client-side: reads `tag_id`'s string value.
pub fn execute<S: Read + Write>(stream: &mut S, tag_id: u16) -> Result<String, Error> {
    write_frame(
        stream,
        &encode_request(Command::ReadString.as_u16(), tag_id, [0; 4]),
    )?;
    let header = decode_response(read_frame(stream)?)?;
    if let Some(error) = header.status.into_error(tag_id) {
        return Err(error);
    }
    if header.tag_id != tag_id {
        return Err(Error::TagIdMismatch);
    }

    let code_units = u32::from_le_bytes(header.payload) as usize;
    let byte_length = code_units * 2;
    let mut body = read_frames(stream, frames_needed(byte_length))?;
    body.truncate(byte_length);
    utf16le_to_utf8(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use crate::tag::{Access, Tag};
    use std::io::Cursor;

    fn request(tag_id: u16) -> RequestFrame {
        RequestFrame {
            command: Command::ReadString,
            tag_id,
            payload: [0; 4],
        }
    }

    #[test]
    fn reads_a_readable_string_tag() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::string(1, "label", "Hi", Access::ReadOnly));
        let mut out = Cursor::new(Vec::new());
        handle(&registry, &mut out, request(1)).unwrap();

        let mut cursor = Cursor::new(out.into_inner());
        let header = decode_response(read_frame(&mut cursor).unwrap()).unwrap();
        assert_eq!(header.status, Status::Successful);
        assert_eq!(u32::from_le_bytes(header.payload), 2);
        let body = read_frames(&mut cursor, 1).unwrap();
        assert_eq!(body, [0x48, 0x00, 0x69, 0x00, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn missing_tag_replies_implausible_with_no_body() {
        let registry = InMemoryRegistry::new();
        let mut out = Cursor::new(Vec::new());
        handle(&registry, &mut out, request(1)).unwrap();
        let bytes = out.into_inner();
        assert_eq!(bytes.len(), 8);
        let header = decode_response(read_frame(&mut Cursor::new(bytes)).unwrap()).unwrap();
        assert_eq!(header.status, Status::ImplausibleArgument);
    }

    #[test]
    fn numeric_tag_is_implausible_via_this_command() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::numeric(1, "t", crate::tag::Value::Integer(1), Access::ReadOnly));
        let mut out = Cursor::new(Vec::new());
        handle(&registry, &mut out, request(1)).unwrap();
        let header =
            decode_response(read_frame(&mut Cursor::new(out.into_inner())).unwrap()).unwrap();
        assert_eq!(header.status, Status::ImplausibleArgument);
    }

    #[test]
    fn write_only_string_tag_is_unauthorized() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::string(1, "t", "hi", Access::WriteOnly));
        let mut out = Cursor::new(Vec::new());
        handle(&registry, &mut out, request(1)).unwrap();
        let header =
            decode_response(read_frame(&mut Cursor::new(out.into_inner())).unwrap()).unwrap();
        assert_eq!(header.status, Status::UnauthorizedAccess);
    }

    #[test]
    fn execute_round_trips_against_handle() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::string(1, "label", "héllo", Access::ReadOnly));
        let mut transcript = Cursor::new(Vec::new());
        handle(&registry, &mut transcript, request(1)).unwrap();
        transcript.set_position(0);
        assert_eq!(execute(&mut transcript, 1).unwrap(), "héllo");
    }
}
