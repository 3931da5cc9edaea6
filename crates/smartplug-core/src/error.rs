//! Error types for smartplug

use thiserror::Error;

/// Result type alias for smartplug protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// smartplug protocol error types
#[derive(Error, Debug)]
pub enum Error {
    /// Declared frame length exceeds the configured maximum
    #[error("frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    /// Frame buffer too small
    #[error("buffer too small: need {needed} bytes, have {have}")]
    BufferTooSmall { needed: usize, have: usize },

    /// JSON encoding error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// JSON decoding error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The device answered with a non-zero `err_code`
    #[error("device rejected {section}: err_code {code}")]
    Device {
        section: &'static str,
        code: i64,
        message: Option<String>,
    },
}

impl Error {
    /// True for malformed-frame errors
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::FrameTooLarge { .. } | Error::BufferTooSmall { .. })
    }

    /// True for JSON encode/decode failures
    pub fn is_serialization(&self) -> bool {
        matches!(self, Error::EncodeError(_) | Error::DecodeError(_))
    }

    /// True for device-level command rejection
    pub fn is_device(&self) -> bool {
        matches!(self, Error::Device { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::DecodeError(e.to_string())
    }
}
