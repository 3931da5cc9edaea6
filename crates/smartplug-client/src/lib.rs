//! smartplug Client Library
//!
//! High-level async client for port-9999 smart plugs and power strips.
//!
//! # Example
//!
//! ```ignore
//! use smartplug_client::{Device, SmartPlug};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let plug = SmartPlug::new();
//!
//!     let lamp = Device::new("192.168.1.40");
//!     plug.change_state(&lamp, true).await?;
//!
//!     // Third outlet of a power strip
//!     let strip = Device::new("192.168.1.41");
//!     plug.change_child_state(&strip, 2, false).await?;
//!
//!     let info = plug.system_info(&lamp).await?;
//!     println!("{} is {}", info.sysinfo().alias, info.sysinfo().relay_state);
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod device;
pub mod error;

pub use builder::{ClientConfig, SmartPlugBuilder};
pub use client::SmartPlug;
pub use device::{child_id, Device};
pub use error::{ClientError, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::builder::SmartPlugBuilder;
    pub use crate::client::SmartPlug;
    pub use crate::device::Device;
    pub use crate::error::{ClientError, Result};
    pub use smartplug_core::{SysInfo, SysInfoResponse};
}
