//! TCP transport implementation
//!
//! One connection per exchange. Each message is preceded by a 4-byte
//! big-endian length prefix and the payload is cipher-obfuscated.

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use smartplug_core::cipher::{decrypt_in_place, encrypt_in_place};
use smartplug_core::frame::{frame_length, HEADER_SIZE, MAX_FRAME_SIZE};
use smartplug_core::{Frame, DEFAULT_PORT, INITIAL_KEY};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default deadline for writing the request and reading the reply
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Initial read buffer size; larger replies grow it as bytes arrive
const READ_CHUNK_SIZE: usize = 8192;

/// TCP configuration
#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// Device port
    pub port: u16,
    /// Bound on establishing the connection
    pub connect_timeout: Duration,
    /// Bound on the write + read phase (`None` waits forever)
    pub read_timeout: Option<Duration>,
    /// Largest reply payload accepted, in bytes
    pub max_frame_size: usize,
    /// Disable Nagle's algorithm
    pub nodelay: bool,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
            max_frame_size: MAX_FRAME_SIZE,
            nodelay: true,
        }
    }
}

/// TCP transport
#[derive(Debug, Clone, Default)]
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TcpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// `host:port`, bracketing bare IPv6 literals
    fn address(&self, host: &str) -> Result<String> {
        let host = host.trim();
        if host.is_empty() {
            return Err(TransportError::InvalidAddress("empty host".into()));
        }

        if host.contains(':') && !host.starts_with('[') {
            Ok(format!("[{}]:{}", host, self.config.port))
        } else {
            Ok(format!("{}:{}", host, self.config.port))
        }
    }

    async fn connect(&self, addr: &str) -> Result<TcpStream> {
        debug!("Connecting to {}", addr);

        let stream = match timeout(self.config.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(TransportError::ConnectionFailed(format!("{}: {}", addr, e)));
            }
            Err(_) => return Err(TransportError::ConnectTimeout(self.config.connect_timeout)),
        };

        if self.config.nodelay {
            let _ = stream.set_nodelay(true);
        }

        Ok(stream)
    }

    async fn roundtrip(&self, stream: &mut TcpStream, request: &[u8]) -> Result<Bytes> {
        let mut ciphertext = request.to_vec();
        encrypt_in_place(INITIAL_KEY, &mut ciphertext);
        write_frame(stream, &ciphertext).await?;

        let mut reply = read_frame(stream, self.config.max_frame_size).await?;
        decrypt_in_place(INITIAL_KEY, &mut reply);

        Ok(Bytes::from(reply))
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn exchange(&self, host: &str, request: Bytes) -> Result<Bytes> {
        let addr = self.address(host)?;
        let mut stream = self.connect(&addr).await?;

        let result = match self.config.read_timeout {
            Some(limit) => timeout(limit, self.roundtrip(&mut stream, &request))
                .await
                .map_err(|_| TransportError::Timeout)?,
            None => self.roundtrip(&mut stream, &request).await,
        };

        // Dropping the stream closes the connection whatever the outcome
        drop(stream);

        let reply = result?;
        debug!(
            "Exchange with {}: {} byte request, {} byte reply",
            addr,
            request.len(),
            reply.len()
        );
        Ok(reply)
    }
}

/// Write `payload` as one frame and flush
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let frame = Frame::new(Bytes::copy_from_slice(payload)).encode()?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read exactly one frame and return its payload.
///
/// The declared length is validated before any payload byte is read. A
/// stream that ends before the declared length is an
/// [`io::ErrorKind::UnexpectedEof`] error, never a short payload.
pub async fn read_frame<R>(reader: &mut R, max_size: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header).await?;

    let len = frame_length(header) as usize;
    if len > max_size {
        return Err(smartplug_core::Error::FrameTooLarge { len, max: max_size }.into());
    }

    let mut payload = Vec::with_capacity(len.min(READ_CHUNK_SIZE));
    let read = (&mut *reader).take(len as u64).read_to_end(&mut payload).await?;
    if read < len {
        return Err(TransportError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("frame truncated: expected {} bytes, got {}", len, read),
        )));
    }

    Ok(payload)
}
