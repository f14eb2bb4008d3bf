//! emonwire - Configuration and wiring layer for CT-clamp energy monitors
//!
//! emonwire validates the declarative configuration of a multi-phase,
//! multi-channel current-transformer energy monitor (phase wiring,
//! calibration factors, CT clamp assignments, sensor channels) and turns
//! it into a deterministic device wiring plan.

pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod wiring;

pub use models::*;

/// Result type alias for emonwire operations
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to emonwire operations
#[derive(thiserror::Error, Debug)]
pub enum EmonWireError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unresolved phase reference: {0}")]
    UnresolvedPhase(String),

    #[error("Logging setup error: {0}")]
    Logging(String),
}
