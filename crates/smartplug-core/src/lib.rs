//! smartplug Core
//!
//! Protocol primitives for the legacy port-9999 smart plug protocol.
//!
//! This crate provides:
//! - The autokey XOR stream cipher ([`cipher`])
//! - Length-prefixed frame encoding/decoding ([`Frame`])
//! - JSON request documents ([`Command`], [`Request`])
//! - The shared response schema ([`SysInfoResponse`])
//!
//! A request travels as `JSON -> encrypt -> frame`, and the reply is undone
//! in the opposite order. Nothing here performs I/O.

pub mod cipher;
pub mod command;
pub mod error;
pub mod frame;
pub mod response;

pub use cipher::{decrypt, encrypt};
pub use command::{Command, RelayState, Request};
pub use error::{Error, Result};
pub use frame::Frame;
pub use response::{
    ChildInfo, DayStat, DayStats, EmeterResponse, ErrorStatus, GainInfo, RealtimeInfo, SysInfo,
    SysInfoResponse, SystemResponse,
};

/// TCP port every device listens on
pub const DEFAULT_PORT: u16 = 9999;

/// Seed byte of the autokey cipher
pub const INITIAL_KEY: u8 = 0xAB;
