//! Longitudinal control module
//!
//! Tracks the stop manager's velocity target with a PID controller and
//! produces the acceleration demand for the vehicle. When the stop manager
//! asserts nothing, this module asserts nothing either and the vehicle's own
//! cruise control holds.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod controllers;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use controllers::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during LongCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum LongCtrlError {
    #[error("Could not load the longitudinal control parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Computed a non-finite acceleration demand ({demand_ms2} m/s^2)")]
    NonFiniteDemand { demand_ms2: f64 },
}
