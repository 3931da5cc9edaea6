//! Client builder pattern

use std::time::Duration;

use smartplug_transport::{TcpConfig, TcpTransport, Transport};

use crate::SmartPlug;

/// Client behaviour that is independent of the transport
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Turn non-zero `err_code` fields in replies into errors.
    ///
    /// Off by default: a rejected command still counts as a successful
    /// exchange and the codes are only logged.
    pub check_device_errors: bool,
}

/// Builder for [`SmartPlug`]
#[derive(Debug, Clone, Default)]
pub struct SmartPlugBuilder {
    tcp: TcpConfig,
    config: ClientConfig,
}

impl SmartPlugBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set device port
    pub fn port(mut self, port: u16) -> Self {
        self.tcp.port = port;
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.tcp.connect_timeout = timeout;
        self
    }

    /// Set the deadline for the request/reply phase (`None` disables it)
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tcp.read_timeout = timeout;
        self
    }

    /// Set largest accepted reply size in bytes
    pub fn max_frame_size(mut self, bytes: usize) -> Self {
        self.tcp.max_frame_size = bytes;
        self
    }

    /// Fail operations whose reply carries a device error code
    pub fn check_device_errors(mut self, enabled: bool) -> Self {
        self.config.check_device_errors = enabled;
        self
    }

    /// Build a client over TCP
    pub fn build(self) -> SmartPlug<TcpTransport> {
        SmartPlug::with_transport(TcpTransport::with_config(self.tcp), self.config)
    }

    /// Build a client over a custom transport; TCP settings are ignored
    pub fn build_with<T: Transport>(self, transport: T) -> SmartPlug<T> {
        SmartPlug::with_transport(transport, self.config)
    }
}
