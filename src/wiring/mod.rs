//! Device wiring plan built from a validated configuration
//!
//! The in-memory equivalent of the build-time wiring step: each phase is
//! bound to its slot, each clamp to its port and owning phase, and every
//! declared sensor channel is registered with the fixed publication
//! profile of its measurement kind. Plans are deterministic: rebuilding
//! from the same configuration yields an identical plan.

use crate::config::assembler::Configuration;
use crate::models::ct_clamp::CtPort;
use crate::models::phase::WireColor;
use crate::models::sensor_spec::{ChannelKind, ChannelProfile, SensorSpec};
use crate::EmonWireError;
use serde::Serialize;
use tracing::debug;

/// A phase bound to its position in the configured phase list
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhaseBinding {
    pub id: String,
    pub slot: usize,
    pub wire: WireColor,
    pub calibration: f64,
}

/// A clamp bound to its port and the slot of its voltage-reference phase
///
/// Phases are referenced by slot index, not by borrow; the source
/// configuration is transient relative to the plan.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClampBinding {
    pub id: String,
    pub phase_slot: usize,
    pub port: CtPort,
    pub port_index: usize,
}

/// One sensor channel registered with the publication framework
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChannelRegistration {
    /// Id of the phase or clamp entry the channel belongs to
    pub owner: String,
    pub kind: ChannelKind,
    pub profile: ChannelProfile,
    pub spec: SensorSpec,
}

/// An update trigger wired to the end of the device update cycle
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TriggerBinding {
    pub id: String,
}

/// The fully wired device: bindings, channel registry and triggers
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DevicePlan {
    pub address: u8,
    pub update_interval_ms: u64,
    pub phases: Vec<PhaseBinding>,
    pub ct_clamps: Vec<ClampBinding>,
    pub channels: Vec<ChannelRegistration>,
    pub triggers: Vec<TriggerBinding>,
}

impl DevicePlan {
    /// Log the wired device layout at debug level.
    pub fn log_summary(&self) {
        debug!(
            address = self.address,
            update_interval_ms = self.update_interval_ms,
            "energy monitor"
        );
        for phase in &self.phases {
            debug!(
                id = %phase.id,
                slot = phase.slot,
                wire = %phase.wire,
                calibration = phase.calibration,
                "phase"
            );
        }
        for clamp in &self.ct_clamps {
            debug!(
                id = %clamp.id,
                port = %clamp.port,
                phase_slot = clamp.phase_slot,
                "ct clamp"
            );
        }
        for channel in &self.channels {
            debug!(
                owner = %channel.owner,
                kind = channel.kind.as_str(),
                unit = channel.profile.unit.symbol(),
                name = %channel.spec.name,
                "channel"
            );
        }
        for trigger in &self.triggers {
            debug!(id = %trigger.id, "update trigger");
        }
    }
}

/// Build the wiring plan for a validated configuration.
///
/// Walks phases, clamps and hooks in declaration order. The validator
/// has already resolved every reference; an unresolvable phase id here
/// is a caller bug and surfaces as [`EmonWireError::UnresolvedPhase`].
pub fn build_plan(config: &Configuration) -> Result<DevicePlan, EmonWireError> {
    let mut channels = Vec::new();

    let mut phases = Vec::with_capacity(config.phases.len());
    for (slot, phase) in config.phases.iter().enumerate() {
        phases.push(PhaseBinding {
            id: phase.id.clone(),
            slot,
            wire: phase.input,
            calibration: phase.calibration,
        });
        register(&mut channels, &phase.id, ChannelKind::Voltage, &phase.voltage);
        register(
            &mut channels,
            &phase.id,
            ChannelKind::Frequency,
            &phase.frequency,
        );
        register(
            &mut channels,
            &phase.id,
            ChannelKind::PhaseAngle,
            &phase.phase_angle,
        );
    }

    let mut ct_clamps = Vec::with_capacity(config.ct_clamps.len());
    for clamp in &config.ct_clamps {
        let phase_slot = config
            .phase_slot(&clamp.phase_id)
            .ok_or_else(|| EmonWireError::UnresolvedPhase(clamp.phase_id.clone()))?;
        ct_clamps.push(ClampBinding {
            id: clamp.id.clone(),
            phase_slot,
            port: clamp.input,
            port_index: clamp.input.index(),
        });
        register(&mut channels, &clamp.id, ChannelKind::Power, &clamp.power);
        register(
            &mut channels,
            &clamp.id,
            ChannelKind::Current,
            &clamp.current,
        );
    }

    let triggers = config
        .update_hooks
        .iter()
        .map(|hook| TriggerBinding {
            id: hook.id.clone(),
        })
        .collect();

    Ok(DevicePlan {
        address: config.device.address,
        update_interval_ms: config.device.update_interval_ms,
        phases,
        ct_clamps,
        channels,
        triggers,
    })
}

fn register(
    channels: &mut Vec<ChannelRegistration>,
    owner: &str,
    kind: ChannelKind,
    spec: &Option<SensorSpec>,
) {
    if let Some(spec) = spec {
        channels.push(ChannelRegistration {
            owner: owner.to_string(),
            kind,
            profile: kind.profile(),
            spec: spec.clone(),
        });
    }
}
