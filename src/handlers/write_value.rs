//! `WriteSingleValue` (§4.B.3): writes a numeric tag's 4-byte payload.

use std::io::{Read, Write};

use crate::codec::{decode_response, encode_request, Command, RequestFrame, ResponseFrame, Status};
use crate::error::Error;
use crate::registry::{apply_payload, Registry};
use crate::stream::{read_frame, write_frame};
use crate::tag::DataType;

pub fn handle(registry: &dyn Registry, request: RequestFrame) -> ResponseFrame {
    let Some(tag) = registry.get(request.tag_id) else {
        return implausible(request.tag_id);
    };
    if tag.data_type() == DataType::String {
        return implausible(request.tag_id);
    }
    if !tag.access.is_writable() {
        return ResponseFrame {
            status: Status::UnauthorizedAccess,
            tag_id: request.tag_id,
            payload: [0; 4],
        };
    }
    let value = apply_payload(tag.data_type(), request.payload)
        .expect("numeric data type always decodes a payload");
    match registry.update_value(request.tag_id, value) {
        Ok(()) => ResponseFrame {
            status: Status::Successful,
            tag_id: request.tag_id,
            payload: [0; 4],
        },
        Err(_) => ResponseFrame {
            status: Status::WriteNotSuccessful,
            tag_id: request.tag_id,
            payload: [0; 4],
        },
    }
}

fn implausible(tag_id: u16) -> ResponseFrame {
    ResponseFrame {
        status: Status::ImplausibleArgument,
        tag_id,
        payload: [0; 4],
    }
}

/// Client-side: writes `payload` to `tag_id`.
pub fn execute<S: Read + Write>(stream: &mut S, tag_id: u16, payload: [u8; 4]) -> Result<(), Error> {
    write_frame(
        stream,
        &encode_request(Command::WriteSingleValue.as_u16(), tag_id, payload),
    )?;
    let response = decode_response(read_frame(stream)?)?;
    if let Some(error) = response.status.into_error(tag_id) {
        return Err(error);
    }
    if response.tag_id != tag_id || response.payload != [0; 4] {
        return Err(Error::InvalidWriteResponse);
    }
    Ok(())
}
