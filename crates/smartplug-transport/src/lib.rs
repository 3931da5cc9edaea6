//! smartplug Transport Layer
//!
//! Every exchange opens a fresh TCP connection, writes one encrypted frame,
//! reads one encrypted frame back and closes. Devices keep no session state
//! between connections.

pub mod error;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use tcp::{read_frame, write_frame, TcpConfig, TcpTransport};
pub use traits::Transport;
