use crate::models::ct_clamp::CtClampEntry;
use crate::models::device::{DeviceSettings, UpdateHook};
use crate::models::phase::PhaseEntry;
use serde::Serialize;

/// A complete, validated device configuration
///
/// Built once by the validator and immutable afterwards. Declaration
/// order of phases and clamps is preserved for deterministic wiring.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Configuration {
    pub device: DeviceSettings,
    pub phases: Vec<PhaseEntry>,
    pub ct_clamps: Vec<CtClampEntry>,
    pub update_hooks: Vec<UpdateHook>,
}

impl Configuration {
    /// Position of a phase in declaration order, by id.
    pub fn phase_slot(&self, phase_id: &str) -> Option<usize> {
        self.phases.iter().position(|phase| phase.id == phase_id)
    }

    /// Number of sensor channels declared across phases and clamps.
    pub fn channel_count(&self) -> usize {
        let phase_channels: usize = self
            .phases
            .iter()
            .map(|phase| {
                [&phase.voltage, &phase.frequency, &phase.phase_angle]
                    .iter()
                    .filter(|spec| spec.is_some())
                    .count()
            })
            .sum();
        let clamp_channels: usize = self
            .ct_clamps
            .iter()
            .map(|clamp| {
                [&clamp.power, &clamp.current]
                    .iter()
                    .filter(|spec| spec.is_some())
                    .count()
            })
            .sum();
        phase_channels + clamp_channels
    }
}

/// Combines validated parts into the final configuration value
///
/// Thin by design: every rule has already run by the time the parts
/// arrive here (see the validator), so assembly performs no checks.
pub struct ConfigAssembler;

impl ConfigAssembler {
    pub fn assemble(
        device: DeviceSettings,
        phases: Vec<PhaseEntry>,
        ct_clamps: Vec<CtClampEntry>,
        update_hooks: Vec<UpdateHook>,
    ) -> Configuration {
        Configuration {
            device,
            phases,
            ct_clamps,
            update_hooks,
        }
    }
}
