//! Length-prefixed frame encoding/decoding
//!
//! Wire format:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Byte 0-3:   Payload Length (uint32 big-endian)                  │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Payload (cipher-obfuscated JSON)                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The length always equals the byte length of the payload that follows.
//! Stream reading lives in `smartplug-transport`; this module only handles
//! buffers that are already in memory.

use crate::{Error, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Frame header size
pub const HEADER_SIZE: usize = 4;

/// Largest payload accepted from a device (1 GiB)
pub const MAX_FRAME_SIZE: usize = 1 << 30;

/// A single protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame with payload
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// Total encoded size
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode frame to bytes
    pub fn encode(&self) -> Result<Bytes> {
        let len = u32::try_from(self.payload.len()).map_err(|_| Error::FrameTooLarge {
            len: self.payload.len(),
            max: u32::MAX as usize,
        })?;

        let mut buf = BytesMut::with_capacity(self.size());
        buf.put_u32(len);
        buf.extend_from_slice(&self.payload);

        Ok(buf.freeze())
    }

    /// Decode one frame from the front of `buf`.
    ///
    /// The declared length is checked against `max_size` before the payload
    /// is looked at. Exactly `HEADER_SIZE + len` bytes are consumed.
    pub fn decode(mut buf: impl Buf, max_size: usize) -> Result<Self> {
        if buf.remaining() < HEADER_SIZE {
            return Err(Error::BufferTooSmall {
                needed: HEADER_SIZE,
                have: buf.remaining(),
            });
        }

        let payload_len = buf.get_u32() as usize;
        if payload_len > max_size {
            return Err(Error::FrameTooLarge {
                len: payload_len,
                max: max_size,
            });
        }

        if buf.remaining() < payload_len {
            return Err(Error::BufferTooSmall {
                needed: HEADER_SIZE + payload_len,
                have: HEADER_SIZE + buf.remaining(),
            });
        }

        Ok(Self {
            payload: buf.copy_to_bytes(payload_len),
        })
    }

    /// Check if buffer contains a complete frame, returning its total size
    pub fn check_complete(buf: &[u8]) -> Option<usize> {
        let header: [u8; HEADER_SIZE] = buf.get(..HEADER_SIZE)?.try_into().ok()?;
        let payload_len = frame_length(header) as usize;

        if buf.len() - HEADER_SIZE >= payload_len {
            Some(HEADER_SIZE + payload_len)
        } else {
            None
        }
    }
}

/// Payload length declared by a frame header
#[inline]
pub fn frame_length(header: [u8; HEADER_SIZE]) -> u32 {
    u32::from_be_bytes(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_encode_decode() {
        let payload = b"hello plug";
        let encoded = Frame::new(payload.as_slice()).encode().unwrap();

        assert_eq!(&encoded[..4], &[0, 0, 0, 10]);

        let decoded = Frame::decode(&encoded[..], MAX_FRAME_SIZE).unwrap();
        assert_eq!(decoded.payload.as_ref(), payload);
    }

    #[test]
    fn test_check_complete() {
        let encoded = Frame::new(b"test".as_slice()).encode().unwrap();

        // Complete frame
        assert_eq!(Frame::check_complete(&encoded), Some(encoded.len()));

        // Incomplete header
        assert_eq!(Frame::check_complete(&encoded[..2]), None);

        // Incomplete payload
        assert_eq!(Frame::check_complete(&encoded[..5]), None);
    }

    #[test]
    fn test_check_complete_max_length_header() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF, b'{', b'}'];
        assert_eq!(Frame::check_complete(&buf), None);
    }

    #[test]
    fn test_frame_length() {
        assert_eq!(frame_length([0x00, 0x00, 0x01, 0x00]), 256);
        assert_eq!(frame_length([0xFF, 0xFF, 0xFF, 0xFF]), u32::MAX);
    }
}
