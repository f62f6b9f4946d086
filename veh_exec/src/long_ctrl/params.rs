//! Parameters structure for LongCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for longitudinal control.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Params {

    // ---- CONTROLLER GAINS ----

    /// Proportional gain on the velocity error.
    pub k_p: f64,

    /// Integral gain on the velocity error.
    pub k_i: f64,

    /// Derivative gain on the velocity error.
    pub k_d: f64,

    // ---- CAPABILITIES ----

    /// Maximum acceleration demand (highest positive value).
    ///
    /// Units: meters/second^2
    pub max_accel_ms2: f64,

    /// Minimum acceleration demand (lowest negative value).
    ///
    /// Units: meters/second^2
    pub min_accel_ms2: f64,
}
