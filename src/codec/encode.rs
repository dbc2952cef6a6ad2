use super::{Frame, FRAME_SIZE};

/// Encodes a request frame: `cmd_u16 | tag_id_u16 | payload_4B`, little-endian.
pub fn encode_request(cmd: u16, tag_id: u16, payload: [u8; 4]) -> Frame {
    encode(cmd, tag_id, payload)
}

/// Encodes a response frame: `status_u16 | tag_id_u16 | payload_4B`, little-endian.
pub fn encode_response(status: u16, tag_id: u16, payload: [u8; 4]) -> Frame {
    encode(status, tag_id, payload)
}

fn encode(leading: u16, tag_id: u16, payload: [u8; 4]) -> Frame {
    let mut frame = [0u8; FRAME_SIZE];
    frame[0..2].copy_from_slice(&leading.to_le_bytes());
    frame[2..4].copy_from_slice(&tag_id.to_le_bytes());
    frame[4..8].copy_from_slice(&payload);
    frame
}
