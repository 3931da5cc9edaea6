//! Transport error types

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] smartplug_core::Error),

    #[error("timeout waiting for reply")]
    Timeout,
}

impl TransportError {
    /// Dial failure or connect timeout
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            TransportError::ConnectionFailed(_)
                | TransportError::ConnectTimeout(_)
                | TransportError::InvalidAddress(_)
        )
    }

    /// Write failure or incomplete read
    pub fn is_io(&self) -> bool {
        matches!(self, TransportError::Io(_))
    }

    /// Malformed or oversized frame
    pub fn is_protocol(&self) -> bool {
        matches!(self, TransportError::Protocol(e) if e.is_protocol())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout | TransportError::ConnectTimeout(_))
    }
}
