use super::FRAME_SIZE;
use crate::error::Error;

/// `⌈n / 8⌉`, the number of 8-byte frames needed to carry `n` bytes.
pub fn frames_needed(n: usize) -> usize {
    (n + FRAME_SIZE - 1) / FRAME_SIZE
}

/// Appends zero bytes so `buf.len() % 8 == 0`. A buffer already aligned is
/// returned unchanged.
pub fn pad_to_frame_size(mut buf: Vec<u8>) -> Vec<u8> {
    let remainder = buf.len() % FRAME_SIZE;
    if remainder != 0 {
        buf.resize(buf.len() + (FRAME_SIZE - remainder), 0);
    }
    buf
}

/// Transcodes a UTF-16LE byte sequence into a UTF-8 `String`.
///
/// Fails with [`Error::IncompleteUtf16`] if the buffer's length is odd, and
/// [`Error::InvalidUtf16`] on an unpaired surrogate.
pub fn utf16le_to_utf8(bytes: &[u8]) -> Result<String, Error> {
    if bytes.len() % 2 != 0 {
        return Err(Error::IncompleteUtf16);
    }

    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|_| Error::InvalidUtf16)
}

/// Transcodes a UTF-8 `String` into a UTF-16LE byte sequence.
pub fn utf8_to_utf16le(s: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(s.len() * 2);
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
