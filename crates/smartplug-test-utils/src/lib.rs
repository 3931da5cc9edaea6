//! Common test helpers for smartplug tests
//!
//! This crate provides:
//! - [`MockDevice`]: an in-process device speaking the real wire protocol
//!   (cipher + framing) on 127.0.0.1, with relay state that follows the
//!   commands it receives
//! - Scripted replies for error paths ([`Reply`])
//! - Canned device documents ([`plug_sysinfo`], [`strip_sysinfo`])
//! - Port helpers

use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use smartplug_core::command::Context;
use smartplug_core::frame::MAX_FRAME_SIZE;
use smartplug_core::{
    decrypt, encrypt, ChildInfo, DayStat, DayStats, ErrorStatus, GainInfo, RealtimeInfo,
    RelayState, Request, SysInfo, SysInfoResponse,
};
use smartplug_transport::{read_frame, write_frame};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::debug;

/// Default test timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Host every mock device binds to
pub const MOCK_HOST: &str = "127.0.0.1";

// ============================================================================
// Port Allocation
// ============================================================================

/// Find an available TCP port for testing
pub async fn find_available_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// A port with nothing listening on it
pub async fn refused_port() -> u16 {
    // The listener is dropped on return, so connects are refused
    find_available_port().await
}

// ============================================================================
// Scripted replies
// ============================================================================

/// Override for the next reply of a [`MockDevice`]
#[derive(Debug, Clone)]
pub enum Reply {
    /// Encrypt and frame this plaintext
    Json(String),
    /// Write these bytes verbatim, without cipher or framing
    Raw(Vec<u8>),
    /// Close the connection without replying
    Hangup,
    /// Keep the connection open and never reply
    Silence,
}

// ============================================================================
// Mock device
// ============================================================================

struct Shared {
    state: Mutex<SysInfoResponse>,
    requests: Mutex<Vec<String>>,
    script: Mutex<VecDeque<Reply>>,
    connections: Mutex<u32>,
}

/// In-process device emulator
pub struct MockDevice {
    addr: SocketAddr,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl MockDevice {
    /// Start a device serving `initial` as its state
    pub async fn start(initial: SysInfoResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shared = Arc::new(Shared {
            state: Mutex::new(initial),
            requests: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            connections: Mutex::new(0),
        });

        let task_shared = Arc::clone(&shared);
        let task = tokio::spawn(async move {
            loop {
                let Ok((stream, peer)) = listener.accept().await else {
                    break;
                };
                debug!("Mock device accepted {}", peer);
                *task_shared.connections.lock() += 1;

                let conn_shared = Arc::clone(&task_shared);
                tokio::spawn(async move {
                    handle_connection(stream, &conn_shared).await;
                });
            }
        });

        Self { addr, shared, task }
    }

    /// Single-outlet plug with an energy meter
    pub async fn plug() -> Self {
        Self::start(plug_sysinfo()).await
    }

    /// Power strip with `outlets` children
    pub async fn power_strip(outlets: u32) -> Self {
        Self::start(strip_sysinfo(outlets)).await
    }

    pub fn host(&self) -> &'static str {
        MOCK_HOST
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Queue a reply used instead of the emulated one
    pub fn push_reply(&self, reply: Reply) {
        self.shared.script.lock().push_back(reply);
    }

    /// Decrypted request documents, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.shared.requests.lock().clone()
    }

    /// Requests parsed back into documents
    pub fn parsed_requests(&self) -> Vec<Request> {
        self.requests()
            .iter()
            .map(|r| Request::from_slice(r.as_bytes()).expect("client sent invalid JSON"))
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.shared.requests.lock().len()
    }

    /// Number of TCP connections accepted so far
    pub fn connection_count(&self) -> u32 {
        *self.shared.connections.lock()
    }

    /// Current emulated state
    pub fn state(&self) -> SysInfoResponse {
        self.shared.state.lock().clone()
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle_connection(mut stream: TcpStream, shared: &Shared) {
    let request = match read_frame(&mut stream, MAX_FRAME_SIZE).await {
        Ok(request) => request,
        Err(e) => {
            debug!("Mock device read failed: {}", e);
            return;
        }
    };

    let plain = decrypt(&request);
    shared
        .requests
        .lock()
        .push(String::from_utf8_lossy(&plain).into_owned());

    let scripted = shared.script.lock().pop_front();
    let reply = match scripted {
        Some(Reply::Json(json)) => json.into_bytes(),
        Some(Reply::Raw(bytes)) => {
            let _ = stream.write_all(&bytes).await;
            return;
        }
        Some(Reply::Hangup) => return,
        Some(Reply::Silence) => {
            let mut buf = [0u8; 1];
            let _ = stream.read(&mut buf).await;
            return;
        }
        None => {
            let value = emulate(&mut shared.state.lock(), &plain);
            serde_json::to_vec(&value).unwrap()
        }
    };

    if let Err(e) = write_frame(&mut stream, &encrypt(&reply)).await {
        debug!("Mock device write failed: {}", e);
    }
}

/// Produce the reply a real device would give, updating `state`
fn emulate(state: &mut SysInfoResponse, plain: &[u8]) -> Value {
    let Ok(request) = Request::from_slice(plain) else {
        return json!({"err_code": -1, "err_msg": "json decode error"});
    };

    let mut system = Map::new();
    let mut emeter = Map::new();

    if let Some(sys) = &request.system {
        if let Some(set) = sys.set_relay_state {
            let status = apply_relay(state, request.context.as_ref(), set.state);
            system.insert("set_relay_state".into(), to_value(&status));
        }
        if sys.get_sysinfo.is_some() {
            system.insert("get_sysinfo".into(), to_value(&state.system.get_sysinfo));
        }
    }

    let mut reply = Map::new();
    if let Some(meter) = &request.emeter {
        if !state.system.get_sysinfo.feature.contains("ENE") {
            reply.insert(
                "emeter".into(),
                json!({"err_code": -1, "err_msg": "module not support"}),
            );
        } else {
            if meter.get_realtime.is_some() {
                emeter.insert("get_realtime".into(), to_value(&state.emeter.get_realtime));
            }
            if meter.get_vgain_igain.is_some() {
                emeter.insert("get_vgain_igain".into(), to_value(&state.emeter.get_vgain_igain));
            }
            if let Some(period) = meter.get_daystat {
                let day_list = state
                    .emeter
                    .get_daystat
                    .day_list
                    .iter()
                    .filter(|d| d.month == period.month && d.year == period.year)
                    .cloned()
                    .collect();
                let stats = DayStats {
                    day_list,
                    ..Default::default()
                };
                emeter.insert("get_daystat".into(), to_value(&stats));
            }
            reply.insert("emeter".into(), Value::Object(emeter));
        }
    }

    if !system.is_empty() {
        reply.insert("system".into(), Value::Object(system));
    }

    Value::Object(reply)
}

fn apply_relay(
    state: &mut SysInfoResponse,
    context: Option<&Context>,
    relay: RelayState,
) -> ErrorStatus {
    let value = u8::from(relay) as i32;
    let info = &mut state.system.get_sysinfo;

    let Some(context) = context else {
        info.relay_state = value;
        return ErrorStatus::default();
    };

    for id in &context.child_ids {
        match info.children.iter_mut().find(|c| &c.id == id) {
            Some(child) => child.state = value,
            None => {
                return ErrorStatus {
                    err_code: -14,
                    err_msg: Some("entry not exist".into()),
                }
            }
        }
    }
    ErrorStatus::default()
}

fn to_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

// ============================================================================
// Fixtures
// ============================================================================

/// Device id used by [`plug_sysinfo`]
pub const PLUG_DEVICE_ID: &str = "8006A1B2C3D4E5F60718293A4B5C6D7E8F901234";

/// Device id used by [`strip_sysinfo`]
pub const STRIP_DEVICE_ID: &str = "8006F00DCAFE";

/// A single-outlet plug with an energy meter, relay off
pub fn plug_sysinfo() -> SysInfoResponse {
    let mut response = SysInfoResponse::default();
    response.system.get_sysinfo = SysInfo {
        sw_ver: "1.5.4 Build 180815 Rel.121440".into(),
        hw_ver: "2.0".into(),
        device_type: "IOT.SMARTPLUGSWITCH".into(),
        model: "HS110(EU)".into(),
        mac: "50:C7:BF:0A:0B:0C".into(),
        device_id: PLUG_DEVICE_ID.into(),
        hw_id: "044A516EE63C875F9458DA25C2CCC5A0".into(),
        oem_id: "1998A14DAA86E4E001FD7CAF42868B5E".into(),
        alias: "Kitchen".into(),
        dev_name: "Smart Wi-Fi Plug With Energy Monitoring".into(),
        relay_state: 0,
        on_time: 0,
        active_mode: "none".into(),
        feature: "TIM:ENE".into(),
        rssi: -61,
        ..Default::default()
    };
    response.emeter.get_realtime = RealtimeInfo {
        current: 0.0125,
        voltage: 229.8,
        power: 1.85,
        total: 4.321,
        ..Default::default()
    };
    response.emeter.get_vgain_igain = GainInfo {
        vgain: 13462,
        igain: 16835,
        ..Default::default()
    };
    response.emeter.get_daystat.day_list = vec![
        day(2024, 6, 30, 0.210),
        day(2024, 7, 1, 0.125),
        day(2024, 7, 2, 0.5),
        day(2024, 7, 3, 0.0625),
    ];
    response
}

/// A power strip with `outlets` children, every outlet off
pub fn strip_sysinfo(outlets: u32) -> SysInfoResponse {
    let mut response = SysInfoResponse::default();
    response.system.get_sysinfo = SysInfo {
        sw_ver: "1.0.12 Build 200121 Rel.175814".into(),
        hw_ver: "1.0".into(),
        mic_type: "IOT.SMARTPLUGSWITCH".into(),
        model: "HS300(US)".into(),
        mac: "B0:BE:76:00:01:02".into(),
        device_id: STRIP_DEVICE_ID.into(),
        alias: "Desk Strip".into(),
        feature: "TIM:ENE".into(),
        child_num: outlets,
        children: (0..outlets)
            .map(|i| ChildInfo {
                id: format!("{}{:02}", STRIP_DEVICE_ID, i),
                state: 0,
                alias: format!("Outlet {}", i + 1),
                on_time: 0,
            })
            .collect(),
        ..Default::default()
    };
    response
}

fn day(year: u16, month: u8, day: u8, energy: f64) -> DayStat {
    DayStat {
        year,
        month,
        day,
        energy,
        energy_wh: None,
    }
}
