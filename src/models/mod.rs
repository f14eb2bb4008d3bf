//! Data models for the emonwire energy monitor configuration

pub mod ct_clamp;
pub mod device;
pub mod phase;
pub mod sensor_spec;

pub use ct_clamp::*;
pub use device::*;
pub use phase::*;
pub use sensor_spec::*;
