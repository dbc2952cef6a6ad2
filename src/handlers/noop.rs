//! `NoOp` (§4.B.1): the heartbeat command. A valid request has `tag_id = 0`
//! and a zero payload; the server replies `Alive` and never touches the
//! registry.

use std::io::{Read, Write};

use crate::codec::{decode_response, encode_request, Command, RequestFrame, ResponseFrame, Status};
use crate::error::Error;
use crate::stream::{read_frame, write_frame};

pub fn handle(request: RequestFrame) -> ResponseFrame {
    if request.tag_id == 0 && request.payload == [0; 4] {
        ResponseFrame {
            status: Status::Alive,
            tag_id: 0,
            payload: [0; 4],
        }
    } else {
        ResponseFrame {
            status: Status::ImplausibleArgument,
            tag_id: request.tag_id,
            payload: [0; 4],
        }
    }
}

/// Client-side: sends a heartbeat and checks the server's acknowledgment.
pub fn execute<S: Read + Write>(stream: &mut S) -> Result<(), Error> {
    write_frame(stream, &encode_request(Command::NoOp.as_u16(), 0, [0; 4]))?;
    let response = decode_response(read_frame(stream)?)?;
    if response.status == Status::Alive && response.tag_id == 0 && response.payload == [0; 4] {
        Ok(())
    } else {
        Err(Error::InvalidNoOpResponse)
    }
}
