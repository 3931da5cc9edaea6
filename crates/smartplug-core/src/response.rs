//! Response schema
//!
//! Every reply, whatever was asked, is parsed into [`SysInfoResponse`].
//! Sections the device did not send decode to their defaults, so the
//! meaningful subset depends on the command:
//!
//! | Command | Meaningful part |
//! |---|---|
//! | `get_sysinfo` | `system.get_sysinfo` |
//! | `set_relay_state` (main or child) | `system.set_relay_state` |
//! | `get_realtime` | `emeter.get_realtime` |
//! | `get_vgain_igain` | `emeter.get_vgain_igain` |
//! | `get_daystat` | `emeter.get_daystat` |
//!
//! Devices report rejection through `err_code` fields instead of failing the
//! exchange. Those fields are kept as-is; see [`SysInfoResponse::device_error`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Top-level reply document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysInfoResponse {
    pub system: SystemResponse,
    pub emeter: EmeterResponse,
}

/// `err_code` / `err_msg` pair carried by each section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorStatus {
    pub err_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl ErrorStatus {
    pub fn is_ok(&self) -> bool {
        self.err_code == 0
    }
}

fn section_error(section: &'static str, code: i64, message: &Option<String>) -> Option<Error> {
    if code == 0 {
        return None;
    }
    Some(Error::Device {
        section,
        code,
        message: message.clone(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemResponse {
    pub get_sysinfo: SysInfo,
    pub set_relay_state: ErrorStatus,
    pub err_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

/// Device identity and relay status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysInfo {
    pub sw_ver: String,
    pub hw_ver: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub mic_type: String,
    pub model: String,
    pub mac: String,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "hwId")]
    pub hw_id: String,
    #[serde(rename = "fwId")]
    pub fw_id: String,
    #[serde(rename = "oemId")]
    pub oem_id: String,
    pub alias: String,
    pub dev_name: String,
    pub icon_hash: String,
    pub relay_state: i32,
    pub on_time: i64,
    pub active_mode: String,
    pub feature: String,
    pub updating: i32,
    pub rssi: i32,
    pub led_off: i32,
    pub latitude_i: i64,
    pub longitude_i: i64,
    pub child_num: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChildInfo>,
    pub err_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl SysInfo {
    /// Main relay is closed
    pub fn is_on(&self) -> bool {
        self.relay_state == 1
    }

    /// Look up a child outlet by its full identifier
    pub fn child(&self, id: &str) -> Option<&ChildInfo> {
        self.children.iter().find(|c| c.id == id)
    }
}

/// One outlet of a multi-outlet unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildInfo {
    pub id: String,
    pub state: i32,
    pub alias: String,
    pub on_time: i64,
}

impl ChildInfo {
    pub fn is_on(&self) -> bool {
        self.state == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmeterResponse {
    pub get_realtime: RealtimeInfo,
    pub get_vgain_igain: GainInfo,
    pub get_daystat: DayStats,
    pub err_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

/// Instantaneous meter readings.
///
/// Older firmware reports amps/volts/watts/kWh, newer firmware the milli-unit
/// fields. The accessor methods normalise to the former.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeInfo {
    pub current: f64,
    pub voltage: f64,
    pub power: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ma: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage_mv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_mw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_wh: Option<f64>,
    pub err_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl RealtimeInfo {
    /// Current in amps
    pub fn amps(&self) -> f64 {
        self.current_ma.map_or(self.current, |ma| ma / 1000.0)
    }

    /// Voltage in volts
    pub fn volts(&self) -> f64 {
        self.voltage_mv.map_or(self.voltage, |mv| mv / 1000.0)
    }

    /// Power in watts
    pub fn watts(&self) -> f64 {
        self.power_mw.map_or(self.power, |mw| mw / 1000.0)
    }

    /// Accumulated energy in kWh
    pub fn kilowatt_hours(&self) -> f64 {
        self.total_wh.map_or(self.total, |wh| wh / 1000.0)
    }
}

/// Meter calibration gains
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainInfo {
    pub vgain: i64,
    pub igain: i64,
    pub err_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

/// Per-day energy totals for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayStats {
    pub day_list: Vec<DayStat>,
    pub err_code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayStat {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub energy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_wh: Option<f64>,
}

impl DayStat {
    /// Energy in kWh
    pub fn kilowatt_hours(&self) -> f64 {
        self.energy_wh.map_or(self.energy, |wh| wh / 1000.0)
    }
}

impl SysInfoResponse {
    /// Parse a decrypted reply
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize to compact JSON
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::EncodeError(e.to_string()))
    }

    /// Shorthand for `system.get_sysinfo`
    pub fn sysinfo(&self) -> &SysInfo {
        &self.system.get_sysinfo
    }

    /// First non-zero `err_code` in the reply, if any
    pub fn device_error(&self) -> Option<Error> {
        let system = &self.system;
        let emeter = &self.emeter;
        let relay = &system.set_relay_state;
        [
            ("system", system.err_code, &system.err_msg),
            ("system.get_sysinfo", system.get_sysinfo.err_code, &system.get_sysinfo.err_msg),
            ("system.set_relay_state", relay.err_code, &relay.err_msg),
            ("emeter", emeter.err_code, &emeter.err_msg),
            ("emeter.get_realtime", emeter.get_realtime.err_code, &emeter.get_realtime.err_msg),
            ("emeter.get_vgain_igain", emeter.get_vgain_igain.err_code, &emeter.get_vgain_igain.err_msg),
            ("emeter.get_daystat", emeter.get_daystat.err_code, &emeter.get_daystat.err_msg),
        ]
        .into_iter()
        .find_map(|(section, code, message)| section_error(section, code, message))
    }

    /// Fail with [`Error::Device`] if any section carries an error code
    pub fn check(self) -> Result<Self> {
        match self.device_error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
