//! JSON request documents
//!
//! Field names are fixed by the device firmware. A [`Request`] is the single
//! JSON document sent in one exchange; it is assembled from one or more
//! [`Command`]s. Empty query bodies serialize as `{}`, absent sections are
//! omitted, and sections are emitted in `context`, `system`, `emeter` order.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Relay position, sent on the wire as `0` / `1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RelayState {
    Off = 0,
    On = 1,
}

impl RelayState {
    pub fn is_on(self) -> bool {
        self == RelayState::On
    }
}

impl From<bool> for RelayState {
    fn from(on: bool) -> Self {
        if on {
            RelayState::On
        } else {
            RelayState::Off
        }
    }
}

impl From<RelayState> for u8 {
    fn from(state: RelayState) -> Self {
        state as u8
    }
}

impl TryFrom<u8> for RelayState {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(RelayState::Off),
            1 => Ok(RelayState::On),
            other => Err(format!("invalid relay state: {}", other)),
        }
    }
}

/// A single protocol command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `system.get_sysinfo`
    SystemInfoQuery,
    /// `system.set_relay_state` on the main unit
    SetRelayState { state: RelayState },
    /// `system.set_relay_state` scoped to child outlets via `context.child_ids`
    SetChildRelayState {
        child_ids: Vec<String>,
        state: RelayState,
    },
    /// `emeter.get_realtime`
    MeterRealtimeQuery,
    /// `emeter.get_vgain_igain`
    MeterGainQuery,
    /// `emeter.get_daystat`
    DaystatQuery { month: u8, year: u16 },
}

impl Command {
    /// Merge this command into a request document
    pub fn apply(self, request: &mut Request) {
        match self {
            Command::SystemInfoQuery => {
                request.system_mut().get_sysinfo = Some(Empty {});
            }
            Command::SetRelayState { state } => {
                request.system_mut().set_relay_state = Some(SetRelayState { state });
            }
            Command::SetChildRelayState { child_ids, state } => {
                request.context = Some(Context { child_ids });
                request.system_mut().set_relay_state = Some(SetRelayState { state });
            }
            Command::MeterRealtimeQuery => {
                request.emeter_mut().get_realtime = Some(Empty {});
            }
            Command::MeterGainQuery => {
                request.emeter_mut().get_vgain_igain = Some(Empty {});
            }
            Command::DaystatQuery { month, year } => {
                request.emeter_mut().get_daystat = Some(DaystatPeriod { month, year });
            }
        }
    }
}

/// An empty query body, `{}` on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Child outlet addressing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub child_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRelayState {
    pub state: RelayState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_sysinfo: Option<Empty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_relay_state: Option<SetRelayState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaystatPeriod {
    pub month: u8,
    pub year: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmeterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_realtime: Option<Empty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_vgain_igain: Option<Empty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_daystat: Option<DaystatPeriod>,
}

/// The JSON document sent in one exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emeter: Option<EmeterRequest>,
}

impl Request {
    /// Build a request carrying every given command
    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut request = Request::default();
        for command in commands {
            command.apply(&mut request);
        }
        request
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::EncodeError(e.to_string()))
    }

    /// Serialize to compact JSON bytes
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::EncodeError(e.to_string()))
    }

    /// Parse a request document (used by device emulators)
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn system_mut(&mut self) -> &mut SystemRequest {
        self.system.get_or_insert_with(SystemRequest::default)
    }

    fn emeter_mut(&mut self) -> &mut EmeterRequest {
        self.emeter.get_or_insert_with(EmeterRequest::default)
    }
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        Request::from_commands([command])
    }
}
