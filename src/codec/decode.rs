use super::{Command, Frame, RequestFrame, ResponseFrame, Status};
use crate::error::Error;

/// Decodes a request frame into `(command, tag_id, payload)`.
///
/// Fails with [`Error::UnknownCommand`] if the leading u16 is outside the
/// closed command set (§3.2 of the protocol).
pub fn decode_request(frame: Frame) -> Result<RequestFrame, Error> {
    let command = Command::try_from(leading(&frame))?;
    Ok(RequestFrame {
        command,
        tag_id: tag_id(&frame),
        payload: payload(&frame),
    })
}

/// Decodes a response frame into `(status, tag_id, payload)`.
///
/// Fails with [`Error::UnknownStatus`] if the leading u16 is outside the
/// closed status set (§3.3 of the protocol).
pub fn decode_response(frame: Frame) -> Result<ResponseFrame, Error> {
    let status = Status::try_from(leading(&frame))?;
    Ok(ResponseFrame {
        status,
        tag_id: tag_id(&frame),
        payload: payload(&frame),
    })
}

fn leading(frame: &Frame) -> u16 {
    u16::from_le_bytes([frame[0], frame[1]])
}

fn tag_id(frame: &Frame) -> u16 {
    u16::from_le_bytes([frame[2], frame[3]])
}

fn payload(frame: &Frame) -> [u8; 4] {
    [frame[4], frame[5], frame[6], frame[7]]
}
