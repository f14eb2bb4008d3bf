//! Configuration validation for the energy monitor
//!
//! The rules that decide whether a declared phase/clamp layout is
//! representable on the device: at most three phases, one entry per wire
//! color, frequency only on the black wire, phase angle only on the red
//! and blue wires, and clamp-to-phase references that resolve. Checks run
//! in a fixed order and stop at the first violation.

use crate::config::assembler::{ConfigAssembler, Configuration};
use crate::config::parser::{
    RawConfig, RawCtClamp, RawDevice, RawPhase, RawSensor, RawUpdateHook,
};
use crate::models::ct_clamp::{CtClampEntry, CtPort};
use crate::models::device::{DeviceSettings, UpdateHook, ADDRESS_RANGE};
use crate::models::phase::{PhaseEntry, WireColor, DEFAULT_CALIBRATION, MAX_PHASES};
use crate::models::sensor_spec::SensorSpec;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

/// A violated configuration rule
///
/// Each variant carries enough location context (entry index, field name)
/// for a user-facing diagnostic. Exactly one error is reported per
/// validation pass; a rejection produces no configuration value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{path}: {message}")]
    Schema { path: String, message: String },

    #[error("no more than 3 phases are supported, got {count}")]
    TooManyPhases { count: usize },

    #[error("only one phase per input wire is allowed, {wire} is declared more than once")]
    DuplicateWire { wire: WireColor },

    #[error("phases[{index}]: {field} is not supported on the {wire} wire")]
    InvalidFieldForWire {
        index: usize,
        field: &'static str,
        wire: WireColor,
    },

    #[error("ct_clamps[{index}]: unknown phase id `{phase_id}`")]
    UnknownPhaseReference { index: usize, phase_id: String },
}

fn missing(path: String) -> ConfigError {
    ConfigError::Schema {
        path,
        message: "required field is missing".to_string(),
    }
}

/// Validates a raw configuration tree into a normalized [`Configuration`]
pub struct ConfigValidator {
    id_regex: Regex,
}

impl ConfigValidator {
    pub fn new() -> Result<Self, ConfigError> {
        let id_regex = Regex::new(r"^[a-z][a-z0-9_]*$").map_err(|e| ConfigError::Schema {
            path: "id".to_string(),
            message: format!("failed to compile id pattern: {}", e),
        })?;

        Ok(Self { id_regex })
    }

    /// Run the full validation pipeline over a raw configuration tree.
    ///
    /// Check order: device settings, phase schema, phase count, wire
    /// uniqueness, wire/field compatibility, clamp schema, reference
    /// resolution, update hooks.
    pub fn validate(&self, raw: &RawConfig) -> Result<Configuration, ConfigError> {
        let device = self.validate_device(raw.device.as_ref())?;

        let raw_phases = raw.phases.as_deref().ok_or_else(|| missing("phases".into()))?;
        let phases = self.validate_phases(raw_phases)?;

        let raw_clamps = raw
            .ct_clamps
            .as_deref()
            .ok_or_else(|| missing("ct_clamps".into()))?;
        let ct_clamps = self.validate_ct_clamps(raw_clamps, &phases)?;

        let update_hooks = self.validate_update_hooks(raw.on_update.as_deref().unwrap_or(&[]))?;

        Ok(ConfigAssembler::assemble(
            device,
            phases,
            ct_clamps,
            update_hooks,
        ))
    }

    /// Validate the phase list: schema shape first, then the count bound,
    /// wire uniqueness, and the per-wire measurement constraints.
    pub fn validate_phases(&self, raw: &[RawPhase]) -> Result<Vec<PhaseEntry>, ConfigError> {
        let mut phases = Vec::with_capacity(raw.len());
        let mut seen_ids = HashSet::new();

        for (index, entry) in raw.iter().enumerate() {
            let id = self.entry_id(entry.id.as_deref(), &format!("phases[{}].id", index))?;
            if !seen_ids.insert(id.clone()) {
                return Err(ConfigError::Schema {
                    path: format!("phases[{}].id", index),
                    message: format!("id `{}` is already declared", id),
                });
            }

            let input = match entry.input.as_deref() {
                Some(label) => {
                    label
                        .parse::<WireColor>()
                        .map_err(|message| ConfigError::Schema {
                            path: format!("phases[{}].input", index),
                            message,
                        })?
                }
                None => return Err(missing(format!("phases[{}].input", index))),
            };

            let calibration = entry.calibration.unwrap_or(DEFAULT_CALIBRATION);
            if !(0.0..=1.0).contains(&calibration) {
                return Err(ConfigError::Schema {
                    path: format!("phases[{}].calibration", index),
                    message: format!("calibration {} must be between 0.0 and 1.0", calibration),
                });
            }

            let voltage =
                self.sensor_spec(entry.voltage.as_ref(), &format!("phases[{}].voltage", index))?;
            let frequency = self.sensor_spec(
                entry.frequency.as_ref(),
                &format!("phases[{}].frequency", index),
            )?;
            let phase_angle = self.sensor_spec(
                entry.phase_angle.as_ref(),
                &format!("phases[{}].phase_angle", index),
            )?;

            phases.push(PhaseEntry {
                id,
                input,
                calibration,
                voltage,
                frequency,
                phase_angle,
            });
        }

        if phases.is_empty() {
            return Err(ConfigError::Schema {
                path: "phases".to_string(),
                message: "at least one phase must be declared".to_string(),
            });
        }
        if phases.len() > MAX_PHASES {
            return Err(ConfigError::TooManyPhases {
                count: phases.len(),
            });
        }

        let mut seen_wires = HashSet::new();
        for phase in &phases {
            if !seen_wires.insert(phase.input) {
                return Err(ConfigError::DuplicateWire { wire: phase.input });
            }
        }

        for (index, phase) in phases.iter().enumerate() {
            match phase.input {
                WireColor::Black => {
                    if phase.phase_angle.is_some() {
                        return Err(ConfigError::InvalidFieldForWire {
                            index,
                            field: "phase_angle",
                            wire: phase.input,
                        });
                    }
                }
                WireColor::Red | WireColor::Blue => {
                    if phase.frequency.is_some() {
                        return Err(ConfigError::InvalidFieldForWire {
                            index,
                            field: "frequency",
                            wire: phase.input,
                        });
                    }
                }
            }
        }

        Ok(phases)
    }

    /// Validate the clamp list against the already-validated phases.
    ///
    /// Clamp count is unbounded and port labels may repeat across clamps;
    /// only the schema shape and the phase references are checked.
    pub fn validate_ct_clamps(
        &self,
        raw: &[RawCtClamp],
        phases: &[PhaseEntry],
    ) -> Result<Vec<CtClampEntry>, ConfigError> {
        let mut clamps = Vec::with_capacity(raw.len());
        let mut seen_ids = HashSet::new();

        for (index, entry) in raw.iter().enumerate() {
            let id = self.entry_id(entry.id.as_deref(), &format!("ct_clamps[{}].id", index))?;
            if !seen_ids.insert(id.clone()) {
                return Err(ConfigError::Schema {
                    path: format!("ct_clamps[{}].id", index),
                    message: format!("id `{}` is already declared", id),
                });
            }

            let phase_id = match entry.phase_id.as_deref() {
                Some(value) => value.to_string(),
                None => return Err(missing(format!("ct_clamps[{}].phase_id", index))),
            };

            let input = match entry.input.as_deref() {
                Some(label) => {
                    label
                        .parse::<CtPort>()
                        .map_err(|message| ConfigError::Schema {
                            path: format!("ct_clamps[{}].input", index),
                            message,
                        })?
                }
                None => return Err(missing(format!("ct_clamps[{}].input", index))),
            };

            let power =
                self.sensor_spec(entry.power.as_ref(), &format!("ct_clamps[{}].power", index))?;
            let current = self.sensor_spec(
                entry.current.as_ref(),
                &format!("ct_clamps[{}].current", index),
            )?;

            clamps.push(CtClampEntry {
                id,
                phase_id,
                input,
                power,
                current,
            });
        }

        let phase_ids: HashSet<&str> = phases.iter().map(|phase| phase.id.as_str()).collect();
        for (index, clamp) in clamps.iter().enumerate() {
            if !phase_ids.contains(clamp.phase_id.as_str()) {
                return Err(ConfigError::UnknownPhaseReference {
                    index,
                    phase_id: clamp.phase_id.clone(),
                });
            }
        }

        Ok(clamps)
    }

    fn validate_device(&self, raw: Option<&RawDevice>) -> Result<DeviceSettings, ConfigError> {
        let mut settings = DeviceSettings::default();

        if let Some(raw) = raw {
            if let Some(address) = raw.address {
                if !ADDRESS_RANGE.contains(&address) {
                    return Err(ConfigError::Schema {
                        path: "device.address".to_string(),
                        message: format!(
                            "address {:#04x} is outside the 7-bit I2C range {:#04x}..={:#04x}",
                            address,
                            ADDRESS_RANGE.start(),
                            ADDRESS_RANGE.end()
                        ),
                    });
                }
                settings.address = address;
            }
            if let Some(interval) = raw.update_interval_ms {
                settings.update_interval_ms = interval;
            }
        }

        Ok(settings)
    }

    fn validate_update_hooks(&self, raw: &[RawUpdateHook]) -> Result<Vec<UpdateHook>, ConfigError> {
        let mut hooks = Vec::with_capacity(raw.len());

        for (index, entry) in raw.iter().enumerate() {
            let id = match entry.id.as_deref() {
                Some(id) => self.check_id(id, &format!("on_update[{}].id", index))?,
                None => format!("on_update_{}", index),
            };
            hooks.push(UpdateHook { id });
        }

        Ok(hooks)
    }

    fn sensor_spec(
        &self,
        raw: Option<&RawSensor>,
        path: &str,
    ) -> Result<Option<SensorSpec>, ConfigError> {
        let Some(raw) = raw else {
            return Ok(None);
        };

        let name = match raw.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            Some(_) => {
                return Err(ConfigError::Schema {
                    path: format!("{}.name", path),
                    message: "name cannot be empty".to_string(),
                })
            }
            None => return Err(missing(format!("{}.name", path))),
        };

        let id = match raw.id.as_deref() {
            Some(id) => Some(self.check_id(id, &format!("{}.id", path))?),
            None => None,
        };

        Ok(Some(SensorSpec { name, id }))
    }

    fn entry_id(&self, raw: Option<&str>, path: &str) -> Result<String, ConfigError> {
        match raw {
            Some(id) => self.check_id(id, path),
            None => Err(missing(path.to_string())),
        }
    }

    fn check_id(&self, id: &str, path: &str) -> Result<String, ConfigError> {
        if self.id_regex.is_match(id) {
            Ok(id.to_string())
        } else {
            Err(ConfigError::Schema {
                path: path.to_string(),
                message: format!(
                    "`{}` is not a valid id, expected lowercase letters, digits and underscores starting with a letter",
                    id
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_phase(id: &str, input: &str) -> RawPhase {
        RawPhase {
            id: Some(id.to_string()),
            input: Some(input.to_string()),
            ..Default::default()
        }
    }

    fn raw_sensor(name: &str) -> RawSensor {
        RawSensor {
            name: Some(name.to_string()),
            id: None,
        }
    }

    fn raw_clamp(id: &str, phase_id: &str, input: &str) -> RawCtClamp {
        RawCtClamp {
            id: Some(id.to_string()),
            phase_id: Some(phase_id.to_string()),
            input: Some(input.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_three_phases_with_distinct_wires() {
        let validator = ConfigValidator::new().unwrap();
        let raw = vec![
            raw_phase("phase_a", "BLACK"),
            raw_phase("phase_b", "RED"),
            raw_phase("phase_c", "BLUE"),
        ];

        let phases = validator.validate_phases(&raw).unwrap();
        assert_eq!(phases.len(), 3);
        assert_eq!(phases[0].input, WireColor::Black);
        assert_eq!(phases[2].input, WireColor::Blue);
        for phase in &phases {
            assert_eq!(phase.calibration, DEFAULT_CALIBRATION);
        }
    }

    #[test]
    fn test_preserves_declaration_order_and_values() {
        let validator = ConfigValidator::new().unwrap();
        let mut first = raw_phase("phase_b", "RED");
        first.calibration = Some(0.03);
        let raw = vec![first, raw_phase("phase_a", "BLACK")];

        let phases = validator.validate_phases(&raw).unwrap();
        assert_eq!(phases[0].id, "phase_b");
        assert_eq!(phases[0].calibration, 0.03);
        assert_eq!(phases[1].id, "phase_a");
    }

    #[test]
    fn test_rejects_fourth_phase() {
        let validator = ConfigValidator::new().unwrap();
        let raw = vec![
            raw_phase("phase_a", "BLACK"),
            raw_phase("phase_b", "RED"),
            raw_phase("phase_c", "BLUE"),
            raw_phase("phase_d", "BLACK"),
        ];

        // count bound wins over the duplicate wire
        assert_eq!(
            validator.validate_phases(&raw),
            Err(ConfigError::TooManyPhases { count: 4 })
        );
    }

    #[test]
    fn test_rejects_duplicate_wire() {
        let validator = ConfigValidator::new().unwrap();
        let raw = vec![raw_phase("phase_a", "RED"), raw_phase("phase_b", "RED")];

        assert_eq!(
            validator.validate_phases(&raw),
            Err(ConfigError::DuplicateWire {
                wire: WireColor::Red
            })
        );
    }

    #[test]
    fn test_rejects_two_black_phases() {
        let validator = ConfigValidator::new().unwrap();
        let raw = vec![raw_phase("phase_a", "BLACK"), raw_phase("phase_b", "BLACK")];

        assert_eq!(
            validator.validate_phases(&raw),
            Err(ConfigError::DuplicateWire {
                wire: WireColor::Black
            })
        );
    }

    #[test]
    fn test_rejects_phase_angle_on_black_wire() {
        let validator = ConfigValidator::new().unwrap();
        let mut phase = raw_phase("phase_a", "BLACK");
        phase.phase_angle = Some(raw_sensor("Angle"));

        assert_eq!(
            validator.validate_phases(&[phase]),
            Err(ConfigError::InvalidFieldForWire {
                index: 0,
                field: "phase_angle",
                wire: WireColor::Black
            })
        );
    }

    #[test]
    fn test_rejects_frequency_on_red_wire() {
        let validator = ConfigValidator::new().unwrap();
        let mut phase = raw_phase("phase_a", "RED");
        phase.frequency = Some(raw_sensor("Frequency"));

        assert_eq!(
            validator.validate_phases(&[phase]),
            Err(ConfigError::InvalidFieldForWire {
                index: 0,
                field: "frequency",
                wire: WireColor::Red
            })
        );
    }

    #[test]
    fn test_rejects_frequency_on_blue_wire() {
        let validator = ConfigValidator::new().unwrap();
        let mut phase = raw_phase("phase_a", "BLUE");
        phase.frequency = Some(raw_sensor("Frequency"));

        assert_eq!(
            validator.validate_phases(&[phase]),
            Err(ConfigError::InvalidFieldForWire {
                index: 0,
                field: "frequency",
                wire: WireColor::Blue
            })
        );
    }

    #[test]
    fn test_accepts_phase_angle_on_red_and_frequency_on_black() {
        let validator = ConfigValidator::new().unwrap();
        let mut black = raw_phase("phase_a", "BLACK");
        black.frequency = Some(raw_sensor("Grid Frequency"));
        let mut red = raw_phase("phase_b", "RED");
        red.phase_angle = Some(raw_sensor("Angle"));

        let phases = validator.validate_phases(&[black, red]).unwrap();
        assert!(phases[0].frequency.is_some());
        assert!(phases[1].phase_angle.is_some());
    }

    #[test]
    fn test_wire_field_constraint_reports_second_entry_index() {
        let validator = ConfigValidator::new().unwrap();
        let mut blue = raw_phase("phase_b", "BLUE");
        blue.frequency = Some(raw_sensor("Frequency"));
        let raw = vec![raw_phase("phase_a", "BLACK"), blue];

        assert_eq!(
            validator.validate_phases(&raw),
            Err(ConfigError::InvalidFieldForWire {
                index: 1,
                field: "frequency",
                wire: WireColor::Blue
            })
        );
    }

    #[test]
    fn test_rejects_empty_phase_list() {
        let validator = ConfigValidator::new().unwrap();
        assert!(matches!(
            validator.validate_phases(&[]),
            Err(ConfigError::Schema { .. })
        ));
    }

    #[test]
    fn test_rejects_missing_phase_id() {
        let validator = ConfigValidator::new().unwrap();
        let raw = vec![RawPhase {
            input: Some("BLACK".to_string()),
            ..Default::default()
        }];

        match validator.validate_phases(&raw) {
            Err(ConfigError::Schema { path, .. }) => assert_eq!(path, "phases[0].id"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_duplicate_phase_id() {
        let validator = ConfigValidator::new().unwrap();
        let raw = vec![raw_phase("phase_a", "BLACK"), raw_phase("phase_a", "RED")];

        match validator.validate_phases(&raw) {
            Err(ConfigError::Schema { path, .. }) => assert_eq!(path, "phases[1].id"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_id() {
        let validator = ConfigValidator::new().unwrap();
        let raw = vec![raw_phase("Phase-A", "BLACK")];

        assert!(matches!(
            validator.validate_phases(&raw),
            Err(ConfigError::Schema { .. })
        ));
    }

    #[test]
    fn test_rejects_calibration_out_of_range() {
        let validator = ConfigValidator::new().unwrap();
        for bad in [-0.1, 1.5] {
            let mut phase = raw_phase("phase_a", "BLACK");
            phase.calibration = Some(bad);
            match validator.validate_phases(&[phase]) {
                Err(ConfigError::Schema { path, .. }) => {
                    assert_eq!(path, "phases[0].calibration")
                }
                other => panic!("expected schema error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_accepts_calibration_bounds() {
        let validator = ConfigValidator::new().unwrap();
        for ok in [0.0, 1.0] {
            let mut phase = raw_phase("phase_a", "BLACK");
            phase.calibration = Some(ok);
            assert!(validator.validate_phases(&[phase]).is_ok());
        }
    }

    #[test]
    fn test_rejects_empty_sensor_name() {
        let validator = ConfigValidator::new().unwrap();
        let mut phase = raw_phase("phase_a", "BLACK");
        phase.voltage = Some(RawSensor {
            name: Some("  ".to_string()),
            id: None,
        });

        match validator.validate_phases(&[phase]) {
            Err(ConfigError::Schema { path, .. }) => {
                assert_eq!(path, "phases[0].voltage.name")
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolves_clamp_phase_reference() {
        let validator = ConfigValidator::new().unwrap();
        let phases = validator
            .validate_phases(&[raw_phase("phase_a", "BLACK")])
            .unwrap();

        let clamps = validator
            .validate_ct_clamps(&[raw_clamp("clamp_main", "phase_a", "A")], &phases)
            .unwrap();
        assert_eq!(clamps.len(), 1);
        assert_eq!(clamps[0].phase_id, "phase_a");
        assert_eq!(clamps[0].input, CtPort::A);
    }

    #[test]
    fn test_rejects_unknown_phase_reference() {
        let validator = ConfigValidator::new().unwrap();
        let phases = validator
            .validate_phases(&[raw_phase("phase_a", "BLACK")])
            .unwrap();

        assert_eq!(
            validator.validate_ct_clamps(&[raw_clamp("clamp_main", "phase_x", "A")], &phases),
            Err(ConfigError::UnknownPhaseReference {
                index: 0,
                phase_id: "phase_x".to_string()
            })
        );
    }

    #[test]
    fn test_allows_shared_ct_port() {
        // the device reports every port regardless of how it is consumed;
        // two clamps on the same port are accepted
        let validator = ConfigValidator::new().unwrap();
        let phases = validator
            .validate_phases(&[raw_phase("phase_a", "BLACK")])
            .unwrap();

        let clamps = validator
            .validate_ct_clamps(
                &[
                    raw_clamp("clamp_one", "phase_a", "A"),
                    raw_clamp("clamp_two", "phase_a", "A"),
                ],
                &phases,
            )
            .unwrap();
        assert_eq!(clamps.len(), 2);
    }

    #[test]
    fn test_rejects_duplicate_clamp_id() {
        let validator = ConfigValidator::new().unwrap();
        let phases = validator
            .validate_phases(&[raw_phase("phase_a", "BLACK")])
            .unwrap();

        let result = validator.validate_ct_clamps(
            &[
                raw_clamp("clamp_main", "phase_a", "A"),
                raw_clamp("clamp_main", "phase_a", "B"),
            ],
            &phases,
        );
        assert!(matches!(result, Err(ConfigError::Schema { .. })));
    }

    #[test]
    fn test_rejects_unknown_port_label() {
        let validator = ConfigValidator::new().unwrap();
        let phases = validator
            .validate_phases(&[raw_phase("phase_a", "BLACK")])
            .unwrap();

        match validator.validate_ct_clamps(&[raw_clamp("clamp_main", "phase_a", "17")], &phases) {
            Err(ConfigError::Schema { path, .. }) => {
                assert_eq!(path, "ct_clamps[0].input")
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_clamp_schema_checked_before_references() {
        let validator = ConfigValidator::new().unwrap();
        let phases = validator
            .validate_phases(&[raw_phase("phase_a", "BLACK")])
            .unwrap();

        // first clamp has a bad port, second a bad reference; the schema
        // error must win
        let result = validator.validate_ct_clamps(
            &[
                raw_clamp("clamp_one", "phase_a", "Z"),
                raw_clamp("clamp_two", "phase_x", "A"),
            ],
            &phases,
        );
        assert!(matches!(result, Err(ConfigError::Schema { .. })));
    }

    #[test]
    fn test_device_settings_validation() {
        let validator = ConfigValidator::new().unwrap();

        let raw = RawConfig {
            device: Some(RawDevice {
                address: Some(0x03),
                update_interval_ms: None,
            }),
            phases: Some(vec![raw_phase("phase_a", "BLACK")]),
            ct_clamps: Some(vec![]),
            on_update: None,
        };
        match validator.validate(&raw) {
            Err(ConfigError::Schema { path, .. }) => assert_eq!(path, "device.address"),
            other => panic!("expected schema error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_update_hook_ids_generated_when_absent() {
        let validator = ConfigValidator::new().unwrap();
        let raw = RawConfig {
            device: None,
            phases: Some(vec![raw_phase("phase_a", "BLACK")]),
            ct_clamps: Some(vec![]),
            on_update: Some(vec![
                RawUpdateHook { id: None },
                RawUpdateHook {
                    id: Some("totals".to_string()),
                },
            ]),
        };

        let config = validator.validate(&raw).unwrap();
        assert_eq!(config.update_hooks[0].id, "on_update_0");
        assert_eq!(config.update_hooks[1].id, "totals");
    }

    #[test]
    fn test_validation_is_atomic() {
        let validator = ConfigValidator::new().unwrap();
        let raw = RawConfig {
            device: None,
            phases: Some(vec![raw_phase("phase_a", "BLACK")]),
            ct_clamps: Some(vec![raw_clamp("clamp_main", "phase_x", "A")]),
            on_update: None,
        };

        // a failing clamp list yields an error and no configuration
        assert!(validator.validate(&raw).is_err());
    }
}
