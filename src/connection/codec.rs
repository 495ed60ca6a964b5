//! Length-prefixed framing.
//!
//! Each frame is a [`HEADER_LENGTH`]-byte ASCII decimal length, left
//! justified and space padded, followed by that many bytes of UTF-8.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::shared::{HEADER_LENGTH, MAX_PAYLOAD_LENGTH};

/// Render the header for a payload of `length` bytes.
pub fn encode_header(length: usize) -> Result<String, ProtocolError> {
    if length > MAX_PAYLOAD_LENGTH {
        return Err(ProtocolError::PayloadTooLarge(length));
    }
    Ok(format!("{length:<width$}", width = HEADER_LENGTH))
}

/// Read a header: ASCII digits first, then only trailing spaces.
pub fn parse_header(header: &[u8]) -> Result<usize, ProtocolError> {
    let invalid = || ProtocolError::InvalidHeader(String::from_utf8_lossy(header).into_owned());
    let digits = header.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || header[digits..].iter().any(|&b| b != b' ') {
        return Err(invalid());
    }
    std::str::from_utf8(&header[..digits])
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(invalid)
}

/// Header and payload as one buffer.
pub fn encode_frame(payload: &str) -> Result<Vec<u8>, ProtocolError> {
    let header = encode_header(payload.len())?;
    let mut frame = Vec::with_capacity(HEADER_LENGTH + payload.len());
    frame.extend_from_slice(header.as_bytes());
    frame.extend_from_slice(payload.as_bytes());
    Ok(frame)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec;

impl Decoder for FrameCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        if src.len() < HEADER_LENGTH {
            return Ok(None);
        }
        let length = parse_header(&src[..HEADER_LENGTH])?;
        let frame_len = HEADER_LENGTH + length;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LENGTH);
        let payload = src.split_to(length);
        String::from_utf8(payload.to_vec())
            .map(Some)
            .map_err(|_| ProtocolError::InvalidUtf8)
    }
}

impl Encoder<String> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, payload: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let header = encode_header(payload.len())?;
        dst.reserve(HEADER_LENGTH + payload.len());
        dst.put_slice(header.as_bytes());
        dst.put_slice(payload.as_bytes());
        Ok(())
    }
}
