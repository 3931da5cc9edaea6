//! Main smartplug client implementation

use bytes::Bytes;
use smartplug_core::{ChildInfo, Command, RelayState, Request, SysInfoResponse};
use smartplug_transport::{TcpTransport, Transport};
use tracing::{debug, info, warn};

use crate::builder::{ClientConfig, SmartPlugBuilder};
use crate::device::{child_id, Device};
use crate::error::{ClientError, Result};

/// A smartplug client.
///
/// Holds no per-device state: every operation is one exchange on a fresh
/// connection (two for child outlets), so a single client can be shared
/// across tasks and devices.
#[derive(Debug, Clone)]
pub struct SmartPlug<T = TcpTransport> {
    transport: T,
    config: ClientConfig,
}

impl SmartPlug<TcpTransport> {
    /// Client with default TCP settings
    pub fn new() -> Self {
        SmartPlugBuilder::new().build()
    }

    /// Create a builder
    pub fn builder() -> SmartPlugBuilder {
        SmartPlugBuilder::new()
    }
}

impl Default for SmartPlug<TcpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> SmartPlug<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch `system.get_sysinfo`
    pub async fn system_info(&self, device: &Device) -> Result<SysInfoResponse> {
        self.send(device, Request::from(Command::SystemInfoQuery))
            .await
    }

    /// Switch the main relay
    pub async fn change_state(&self, device: &Device, on: bool) -> Result<()> {
        info!("Switching {} {}", device.host(), on_off(on));

        let command = Command::SetRelayState {
            state: RelayState::from(on),
        };
        self.send(device, Request::from(command)).await?;
        Ok(())
    }

    /// Switch one outlet of a multi-outlet unit.
    ///
    /// Looks up the device id first; if that fails its error is returned and
    /// no state change is sent. A reply without a device id counts as a
    /// failed lookup.
    pub async fn change_child_state(&self, device: &Device, index: u32, on: bool) -> Result<()> {
        let info = self.system_info(device).await?;
        let id = child_id(device_id(device, &info)?, index);

        info!("Switching {} outlet {} ({}) {}", device.host(), index, id, on_off(on));

        let command = Command::SetChildRelayState {
            child_ids: vec![id],
            state: RelayState::from(on),
        };
        self.send(device, Request::from(command)).await?;
        Ok(())
    }

    /// Switch whatever `device` addresses: its outlet if it has one, else the
    /// main relay
    pub async fn set_power(&self, device: &Device, on: bool) -> Result<()> {
        match device.child_index() {
            Some(index) => self.change_child_state(device, index, on).await,
            None => self.change_state(device, on).await,
        }
    }

    /// Current relay position of whatever `device` addresses
    pub async fn is_on(&self, device: &Device) -> Result<bool> {
        let response = self.system_info(device).await?;
        let info = response.sysinfo();

        let Some(index) = device.child_index() else {
            return Ok(info.is_on());
        };

        let id = child_id(device_id(device, &response)?, index);
        info.child(&id)
            .map(ChildInfo::is_on)
            .ok_or_else(|| ClientError::ChildNotFound {
                host: device.host().to_string(),
                index,
                child_id: id,
            })
    }

    /// Realtime readings and calibration gains in one request
    pub async fn meter_info(&self, device: &Device) -> Result<SysInfoResponse> {
        let request = Request::from_commands([Command::MeterRealtimeQuery, Command::MeterGainQuery]);
        self.send(device, request).await
    }

    /// Per-day energy totals for `month` of `year`
    pub async fn daily_stats(&self, device: &Device, month: u8, year: u16) -> Result<SysInfoResponse> {
        self.send(device, Request::from(Command::DaystatQuery { month, year }))
            .await
    }

    async fn send(&self, device: &Device, request: Request) -> Result<SysInfoResponse> {
        let payload = request.to_vec()?;
        debug!("Sending to {}: {}", device, String::from_utf8_lossy(&payload));

        let reply = self
            .transport
            .exchange(device.host(), Bytes::from(payload))
            .await?;
        let response = SysInfoResponse::from_slice(&reply)?;

        if let Some(err) = response.device_error() {
            if self.config.check_device_errors {
                return Err(err.into());
            }
            warn!("{} reported {}", device, err);
        }

        Ok(response)
    }
}

/// Device id of a sysinfo reply; empty means the lookup failed
fn device_id<'a>(device: &Device, response: &'a SysInfoResponse) -> Result<&'a str> {
    let id = response.sysinfo().device_id.as_str();
    if !id.is_empty() {
        return Ok(id);
    }
    match response.device_error() {
        Some(err) => Err(err.into()),
        None => Err(ClientError::MissingDeviceId {
            host: device.host().to_string(),
        }),
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
