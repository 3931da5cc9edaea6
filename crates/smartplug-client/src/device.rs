//! Device addressing

use std::fmt;

/// A plug or power strip on the local network.
///
/// `child` selects one outlet of a multi-outlet unit. The value is immutable
/// and carries no connection state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    host: String,
    child: Option<u32>,
}

impl Device {
    /// Address the main unit at `host`
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            child: None,
        }
    }

    /// Address outlet `index` of the unit at `host`
    pub fn outlet(host: impl Into<String>, index: u32) -> Self {
        Self {
            host: host.into(),
            child: Some(index),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn child_index(&self) -> Option<u32> {
        self.child
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.child {
            Some(index) => write!(f, "{}#{}", self.host, index),
            None => f.write_str(&self.host),
        }
    }
}

/// Child outlet identifier: device id followed by the index, zero-padded to
/// at least two digits (`"8012AB"`, 3 -> `"8012AB03"`).
pub fn child_id(device_id: &str, index: u32) -> String {
    format!("{}{:02}", device_id, index)
}
