//! Parameters structure for the exec

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Exec-level parameters.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ExecParams {

    // ---- TELEMETRY ----

    /// Endpoint (`host:port`) of the remote telemetry log server. The relay
    /// is disabled when absent.
    pub tm_endpoint: Option<String>,

    /// Period between telemetry briefs.
    ///
    /// Units: seconds
    pub tm_period_s: f64,

    // ---- SIMULATION ----

    /// Parameters for the simulated vehicle-state source.
    pub sim: SimParams,
}

/// Parameters for the simulated vehicle-state source.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct SimParams {
    /// Starting latitude of the simulated vehicle.
    ///
    /// Units: degrees
    pub start_lat_deg: f64,

    /// Starting longitude of the simulated vehicle.
    ///
    /// Units: degrees
    pub start_lon_deg: f64,

    /// Starting speed of the simulated vehicle.
    ///
    /// Units: kilometers/hour
    pub start_speed_kph: f64,

    /// Speed the simulated cruise control holds when no demand is asserted.
    ///
    /// Units: kilometers/hour
    pub cruise_speed_kph: f64,

    /// Acceleration the simulated cruise control applies when below its
    /// cruise speed.
    ///
    /// Units: meters/second^2
    pub cruise_accel_ms2: f64,
}
