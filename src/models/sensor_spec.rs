use serde::{Deserialize, Serialize};

/// Unit of measurement published by a sensor channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Unit {
    Volt,
    Hertz,
    Degree,
    Watt,
    Ampere,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Volt => "V",
            Unit::Hertz => "Hz",
            Unit::Degree => "°",
            Unit::Watt => "W",
            Unit::Ampere => "A",
        }
    }
}

/// Device class reported to the publication framework
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceClass {
    Voltage,
    Frequency,
    Power,
    Current,
}

/// State class reported to the publication framework
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StateClass {
    Measurement,
}

/// The measurement kinds a configuration entry can declare a channel for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChannelKind {
    Voltage,
    Frequency,
    PhaseAngle,
    Power,
    Current,
}

/// Fixed publication metadata for a measurement kind
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChannelProfile {
    pub unit: Unit,
    pub device_class: Option<DeviceClass>,
    pub state_class: StateClass,
    pub accuracy_decimals: u8,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Voltage => "voltage",
            ChannelKind::Frequency => "frequency",
            ChannelKind::PhaseAngle => "phase_angle",
            ChannelKind::Power => "power",
            ChannelKind::Current => "current",
        }
    }

    /// Publication metadata for this kind; phase angle carries no device
    /// class, everything else maps one-to-one.
    pub fn profile(&self) -> ChannelProfile {
        match self {
            ChannelKind::Voltage => ChannelProfile {
                unit: Unit::Volt,
                device_class: Some(DeviceClass::Voltage),
                state_class: StateClass::Measurement,
                accuracy_decimals: 1,
            },
            ChannelKind::Frequency => ChannelProfile {
                unit: Unit::Hertz,
                device_class: Some(DeviceClass::Frequency),
                state_class: StateClass::Measurement,
                accuracy_decimals: 1,
            },
            ChannelKind::PhaseAngle => ChannelProfile {
                unit: Unit::Degree,
                device_class: None,
                state_class: StateClass::Measurement,
                accuracy_decimals: 0,
            },
            ChannelKind::Power => ChannelProfile {
                unit: Unit::Watt,
                device_class: Some(DeviceClass::Power),
                state_class: StateClass::Measurement,
                accuracy_decimals: 1,
            },
            ChannelKind::Current => ChannelProfile {
                unit: Unit::Ampere,
                device_class: Some(DeviceClass::Current),
                state_class: StateClass::Measurement,
                accuracy_decimals: 2,
            },
        }
    }
}

/// User-declared sensor channel descriptor
///
/// Deep validation of the descriptor belongs to the publication
/// framework; this layer only guarantees a usable name and id.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SensorSpec {
    /// Display name of the published channel
    pub name: String,
    /// Optional author-supplied handle for the channel
    pub id: Option<String>,
}
