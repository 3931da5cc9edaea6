//! Request document shape tests
//!
//! Field names and nesting are fixed by the device firmware, so these
//! compare exact JSON strings.

use smartplug_core::{Command, RelayState, Request};

fn json(commands: impl IntoIterator<Item = Command>) -> String {
    Request::from_commands(commands).to_json().expect("encode failed")
}

#[test]
fn test_system_info_query() {
    assert_eq!(
        json([Command::SystemInfoQuery]),
        r#"{"system":{"get_sysinfo":{}}}"#
    );
}

#[test]
fn test_set_relay_state_on() {
    assert_eq!(
        json([Command::SetRelayState {
            state: RelayState::On
        }]),
        r#"{"system":{"set_relay_state":{"state":1}}}"#
    );
}

#[test]
fn test_set_relay_state_off() {
    assert_eq!(
        json([Command::SetRelayState {
            state: RelayState::from(false)
        }]),
        r#"{"system":{"set_relay_state":{"state":0}}}"#
    );
}

#[test]
fn test_set_child_relay_state() {
    assert_eq!(
        json([Command::SetChildRelayState {
            child_ids: vec!["8006ABCDEF0102".to_string()],
            state: RelayState::On,
        }]),
        r#"{"context":{"child_ids":["8006ABCDEF0102"]},"system":{"set_relay_state":{"state":1}}}"#
    );
}

#[test]
fn test_meter_realtime_query() {
    assert_eq!(
        json([Command::MeterRealtimeQuery]),
        r#"{"emeter":{"get_realtime":{}}}"#
    );
}

#[test]
fn test_meter_gain_query() {
    assert_eq!(
        json([Command::MeterGainQuery]),
        r#"{"emeter":{"get_vgain_igain":{}}}"#
    );
}

#[test]
fn test_daystat_query() {
    assert_eq!(
        json([Command::DaystatQuery {
            month: 7,
            year: 2024
        }]),
        r#"{"emeter":{"get_daystat":{"month":7,"year":2024}}}"#
    );
}

#[test]
fn test_combined_meter_queries() {
    assert_eq!(
        json([Command::MeterRealtimeQuery, Command::MeterGainQuery]),
        r#"{"emeter":{"get_realtime":{},"get_vgain_igain":{}}}"#
    );
}

#[test]
fn test_field_order_is_stable() {
    // Command order must not change section order
    assert_eq!(
        json([
            Command::MeterRealtimeQuery,
            Command::SystemInfoQuery,
        ]),
        r#"{"system":{"get_sysinfo":{}},"emeter":{"get_realtime":{}}}"#
    );
}

#[test]
fn test_empty_request() {
    assert_eq!(Request::default().to_json().unwrap(), "{}");
}

#[test]
fn test_to_vec_matches_to_json() {
    let request = Request::from(Command::SystemInfoQuery);
    assert_eq!(
        request.to_vec().unwrap(),
        request.to_json().unwrap().into_bytes()
    );
}

#[test]
fn test_parse_request_sent_by_client() {
    let request =
        Request::from_slice(br#"{"context":{"child_ids":["AA01"]},"system":{"set_relay_state":{"state":0}}}"#)
            .expect("parse failed");

    let context = request.context.expect("missing context");
    assert_eq!(context.child_ids, vec!["AA01".to_string()]);

    let relay = request
        .system
        .and_then(|s| s.set_relay_state)
        .expect("missing set_relay_state");
    assert_eq!(relay.state, RelayState::Off);
    assert!(request.emeter.is_none());
}

#[test]
fn test_parse_rejects_invalid_state() {
    let result = Request::from_slice(br#"{"system":{"set_relay_state":{"state":5}}}"#);
    assert!(result.unwrap_err().is_serialization());
}
