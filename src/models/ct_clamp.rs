use crate::models::sensor_spec::SensorSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CT clamp input port
///
/// Nineteen channels: the three 200A mains clamps (A, B, C) followed by
/// the sixteen 50A branch-circuit clamps (1..16). The enum order matches
/// the channel order of the device reading layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CtPort {
    A,
    B,
    C,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl CtPort {
    /// Configuration label for this port
    pub fn label(&self) -> &'static str {
        match self {
            CtPort::A => "A",
            CtPort::B => "B",
            CtPort::C => "C",
            CtPort::One => "1",
            CtPort::Two => "2",
            CtPort::Three => "3",
            CtPort::Four => "4",
            CtPort::Five => "5",
            CtPort::Six => "6",
            CtPort::Seven => "7",
            CtPort::Eight => "8",
            CtPort::Nine => "9",
            CtPort::Ten => "10",
            CtPort::Eleven => "11",
            CtPort::Twelve => "12",
            CtPort::Thirteen => "13",
            CtPort::Fourteen => "14",
            CtPort::Fifteen => "15",
            CtPort::Sixteen => "16",
        }
    }

    /// Channel index of this port in the device reading layout (A=0 .. 16=18)
    pub fn index(&self) -> usize {
        match self {
            CtPort::A => 0,
            CtPort::B => 1,
            CtPort::C => 2,
            CtPort::One => 3,
            CtPort::Two => 4,
            CtPort::Three => 5,
            CtPort::Four => 6,
            CtPort::Five => 7,
            CtPort::Six => 8,
            CtPort::Seven => 9,
            CtPort::Eight => 10,
            CtPort::Nine => 11,
            CtPort::Ten => 12,
            CtPort::Eleven => 13,
            CtPort::Twelve => 14,
            CtPort::Thirteen => 15,
            CtPort::Fourteen => 16,
            CtPort::Fifteen => 17,
            CtPort::Sixteen => 18,
        }
    }

    /// Whether this is one of the three 200A mains ports
    pub fn is_mains(&self) -> bool {
        matches!(self, CtPort::A | CtPort::B | CtPort::C)
    }
}

impl FromStr for CtPort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(CtPort::A),
            "B" => Ok(CtPort::B),
            "C" => Ok(CtPort::C),
            "1" => Ok(CtPort::One),
            "2" => Ok(CtPort::Two),
            "3" => Ok(CtPort::Three),
            "4" => Ok(CtPort::Four),
            "5" => Ok(CtPort::Five),
            "6" => Ok(CtPort::Six),
            "7" => Ok(CtPort::Seven),
            "8" => Ok(CtPort::Eight),
            "9" => Ok(CtPort::Nine),
            "10" => Ok(CtPort::Ten),
            "11" => Ok(CtPort::Eleven),
            "12" => Ok(CtPort::Twelve),
            "13" => Ok(CtPort::Thirteen),
            "14" => Ok(CtPort::Fourteen),
            "15" => Ok(CtPort::Fifteen),
            "16" => Ok(CtPort::Sixteen),
            _ => Err(format!(
                "unrecognized input port `{}`, expected A, B, C or 1..16",
                s
            )),
        }
    }
}

impl fmt::Display for CtPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One current-transformer clamp, validated and normalized
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CtClampEntry {
    /// Unique handle for this clamp
    pub id: String,
    /// Id of the phase providing the voltage reference
    pub phase_id: String,
    /// Physical port the clamp is plugged into
    pub input: CtPort,
    /// Power channel (watts)
    pub power: Option<SensorSpec>,
    /// Current channel (amperes)
    pub current: Option<SensorSpec>,
}
