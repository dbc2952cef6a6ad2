//! `ReadSingleValue` (§4.B.2): reads a numeric tag's 4-byte payload.

use std::io::{Read, Write};

use crate::codec::{decode_response, encode_request, Command, RequestFrame, ResponseFrame, Status};
use crate::error::Error;
use crate::registry::{value_to_payload, Registry};
use crate::stream::{read_frame, write_frame};
use crate::tag::DataType;

pub fn handle(registry: &dyn Registry, request: RequestFrame) -> ResponseFrame {
    if request.payload != [0; 4] {
        return implausible(request.tag_id);
    }
    let Some(tag) = registry.get(request.tag_id) else {
        return implausible(request.tag_id);
    };
    if tag.data_type() == DataType::String {
        return implausible(request.tag_id);
    }
    if !tag.access.is_readable() {
        return ResponseFrame {
            status: Status::UnauthorizedAccess,
            tag_id: request.tag_id,
            payload: [0; 4],
        };
    }
    let payload = value_to_payload(&tag).expect("numeric tag always has a payload encoding");
    ResponseFrame {
        status: Status::Successful,
        tag_id: request.tag_id,
        payload,
    }
}

fn implausible(tag_id: u16) -> ResponseFrame {
    ResponseFrame {
        status: Status::ImplausibleArgument,
        tag_id,
        payload: [0; 4],
    }
}

/// Client-side: reads `tag_id`'s raw payload. The caller decodes it as
/// i32/u32/f32 per the tag's known type.
pub fn execute<S: Read + Write>(stream: &mut S, tag_id: u16) -> Result<[u8; 4], Error> {
    write_frame(
        stream,
        &encode_request(Command::ReadSingleValue.as_u16(), tag_id, [0; 4]),
    )?;
    let response = decode_response(read_frame(stream)?)?;
    if let Some(error) = response.status.into_error(tag_id) {
        return Err(error);
    }
    if response.tag_id != tag_id {
        return Err(Error::TagIdMismatch);
    }
    Ok(response.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use crate::tag::{Access, Tag, Value};

    fn request(tag_id: u16) -> RequestFrame {
        RequestFrame {
            command: Command::ReadSingleValue,
            tag_id,
            payload: [0; 4],
        }
    }

    #[test]
    fn reads_a_readable_numeric_tag() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::numeric(1, "t", Value::Integer(42), Access::ReadOnly));
        let response = handle(&registry, request(1));
        assert_eq!(response.status, Status::Successful);
        assert_eq!(response.payload, 42i32.to_le_bytes());
    }

    #[test]
    fn missing_tag_is_implausible() {
        let registry = InMemoryRegistry::new();
        assert_eq!(handle(&registry, request(1)).status, Status::ImplausibleArgument);
    }

    #[test]
    fn string_tag_is_implausible_via_this_command() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::string(1, "t", "hi", Access::ReadOnly));
        assert_eq!(handle(&registry, request(1)).status, Status::ImplausibleArgument);
    }

    #[test]
    fn write_only_tag_is_unauthorized() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::numeric(1, "t", Value::Integer(1), Access::WriteOnly));
        assert_eq!(
            handle(&registry, request(1)).status,
            Status::UnauthorizedAccess
        );
    }

    #[test]
    fn nonzero_payload_on_request_is_implausible() {
        let registry = InMemoryRegistry::new();
        registry.insert(Tag::numeric(1, "t", Value::Integer(1), Access::ReadOnly));
        let mut bad = request(1);
        bad.payload = [1, 0, 0, 0];
        assert_eq!(handle(&registry, bad).status, Status::ImplausibleArgument);
    }
}
