use crate::models::sensor_spec::SensorSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default per-phase voltage calibration factor
pub const DEFAULT_CALIBRATION: f64 = 0.022;

/// Maximum number of phases the device can monitor
pub const MAX_PHASES: usize = 3;

/// Physical input wire of a monitored phase
///
/// The device exposes exactly three phase inputs, identified by the wire
/// color of the mains harness. Frequency is only measured on the black
/// wire; phase angle only on the red and blue wires, relative to black.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WireColor {
    Black,
    Red,
    Blue,
}

impl WireColor {
    /// Configuration label for this wire
    pub fn label(&self) -> &'static str {
        match self {
            WireColor::Black => "BLACK",
            WireColor::Red => "RED",
            WireColor::Blue => "BLUE",
        }
    }

    /// Voltage slot of this wire in the device reading layout
    pub fn slot(&self) -> usize {
        match self {
            WireColor::Black => 0,
            WireColor::Red => 1,
            WireColor::Blue => 2,
        }
    }
}

impl FromStr for WireColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BLACK" => Ok(WireColor::Black),
            "RED" => Ok(WireColor::Red),
            "BLUE" => Ok(WireColor::Blue),
            _ => Err(format!(
                "unrecognized input wire `{}`, expected BLACK, RED or BLUE",
                s
            )),
        }
    }
}

impl fmt::Display for WireColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One monitored electrical phase, validated and normalized
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhaseEntry {
    /// Unique handle, referenced by CT clamp entries
    pub id: String,
    /// Physical input wire; unique across all phases
    pub input: WireColor,
    /// Voltage calibration factor in [0.0, 1.0]
    pub calibration: f64,
    /// Voltage channel (volts)
    pub voltage: Option<SensorSpec>,
    /// Frequency channel (hertz); black wire only
    pub frequency: Option<SensorSpec>,
    /// Phase angle channel (degrees); red and blue wires only
    pub phase_angle: Option<SensorSpec>,
}
