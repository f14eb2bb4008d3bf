use serde::Serialize;
use std::ops::RangeInclusive;

/// Default I2C bus address of the metering controller
pub const DEFAULT_ADDRESS: u8 = 0x64;

/// Valid 7-bit I2C address range
pub const ADDRESS_RANGE: RangeInclusive<u8> = 0x08..=0x77;

/// Bus and polling settings for the monitor component
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DeviceSettings {
    /// 7-bit I2C address of the metering controller
    pub address: u8,
    /// Polling interval in milliseconds; 0 publishes on every cycle
    pub update_interval_ms: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        DeviceSettings {
            address: DEFAULT_ADDRESS,
            update_interval_ms: 0,
        }
    }
}

/// A callback hook fired after each completed update cycle
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateHook {
    /// Handle for the trigger; generated as `on_update_<index>` when the
    /// author does not supply one
    pub id: String,
}
