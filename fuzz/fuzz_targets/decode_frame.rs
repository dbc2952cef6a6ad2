#![no_main]

use libfuzzer_sys::fuzz_target;
use stephanex::codec::{decode_request, decode_response, encode_request, encode_response};

// Any 8 bytes either decode to a well-formed request/response or fail with
// a typed error; never panic. When a request decodes, re-encoding it must
// reproduce the same 8 bytes.
fuzz_target!(|data: &[u8]| {
    if data.len() != 8 {
        return;
    }
    let mut frame = [0u8; 8];
    frame.copy_from_slice(data);

    if let Ok(request) = decode_request(frame) {
        let re_encoded = encode_request(request.command.as_u16(), request.tag_id, request.payload);
        assert_eq!(re_encoded, frame);
    }

    if let Ok(response) = decode_response(frame) {
        let re_encoded = encode_response(response.status.as_u16(), response.tag_id, response.payload);
        assert_eq!(re_encoded, frame);
    }
});
