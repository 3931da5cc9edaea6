//! Client error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] smartplug_transport::TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] smartplug_core::Error),

    #[error("{host} reported no device id")]
    MissingDeviceId { host: String },

    #[error("no outlet {index} on {host} (child id {child_id})")]
    ChildNotFound {
        host: String,
        index: u32,
        child_id: String,
    },
}

impl ClientError {
    /// TCP dial failure or connect timeout
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_connection())
    }

    /// Write failure or reply cut short
    pub fn is_io_error(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_io())
    }

    /// Reply frame exceeded the configured maximum
    pub fn is_protocol_error(&self) -> bool {
        match self {
            ClientError::Transport(e) => e.is_protocol(),
            ClientError::Protocol(e) => e.is_protocol(),
            ClientError::MissingDeviceId { .. } | ClientError::ChildNotFound { .. } => false,
        }
    }

    /// Request could not be encoded or reply could not be decoded
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, ClientError::Protocol(e) if e.is_serialization())
    }

    /// Device reported a non-zero `err_code`
    pub fn is_device_error(&self) -> bool {
        matches!(self, ClientError::Protocol(e) if e.is_device())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(e) if e.is_timeout())
    }
}
