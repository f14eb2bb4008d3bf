//! Command-line interface for emonwire
//!
//! Validates energy monitor configuration files and prints the resulting
//! device wiring plan.

use crate::config::parser::ConfigParser;
use crate::wiring;
use crate::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

/// emonwire command-line interface
#[derive(Parser)]
#[command(name = "emonwire")]
#[command(about = "Configuration validator for CT-clamp energy monitors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct EmonWireCli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable JSON output for machine-readable results
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },

    /// Validate a configuration file and print the device wiring plan
    Plan {
        /// Path to the configuration file
        file: PathBuf,
    },
}

impl EmonWireCli {
    /// Execute the selected subcommand.
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Validate { file } => self.run_validate(file),
            Commands::Plan { file } => self.run_plan(file),
        }
    }

    fn run_validate(&self, file: &Path) -> Result<()> {
        debug!(file = %file.display(), "validating configuration");

        let parser = ConfigParser::new()?;
        let config = parser.parse_file(file)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}: OK ({} phase(s), {} CT clamp(s), {} sensor channel(s))",
                file.display(),
                config.phases.len(),
                config.ct_clamps.len(),
                config.channel_count()
            );
        }

        Ok(())
    }

    fn run_plan(&self, file: &Path) -> Result<()> {
        debug!(file = %file.display(), "building wiring plan");

        let parser = ConfigParser::new()?;
        let config = parser.parse_file(file)?;
        let plan = wiring::build_plan(&config)?;
        plan.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            return Ok(());
        }

        println!(
            "device: address {:#04x}, update interval {} ms",
            plan.address, plan.update_interval_ms
        );
        for phase in &plan.phases {
            println!(
                "phase {} -> slot {} ({} wire, calibration {})",
                phase.id, phase.slot, phase.wire, phase.calibration
            );
        }
        for clamp in &plan.ct_clamps {
            println!(
                "ct clamp {} -> port {} (channel {}), phase slot {}",
                clamp.id, clamp.port, clamp.port_index, clamp.phase_slot
            );
        }
        for channel in &plan.channels {
            println!(
                "channel `{}` [{}] -> {} on {}",
                channel.spec.name,
                channel.profile.unit.symbol(),
                channel.kind.as_str(),
                channel.owner
            );
        }
        for trigger in &plan.triggers {
            println!("update trigger {}", trigger.id);
        }

        Ok(())
    }
}
