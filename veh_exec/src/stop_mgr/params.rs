//! Parameters structure for the stop manager

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{DistanceMode, ProfileShape, StopMgrError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the stop manager.
///
/// Loaded once at init and immutable for the controller's lifetime. The zone
/// distance thresholds must satisfy
/// `stopping < approaching < in_area <= activation`, checked by
/// [`Params::validate`]; the controller refuses to start on a violation
/// rather than running with undefined zone ordering.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Params {

    // ---- STRATEGY SELECTION ----

    /// How distance-to-target is measured.
    pub distance_mode: DistanceMode,

    /// Which speed profile shape is generated within a zone.
    pub profile: ProfileShape,

    // ---- ROUTE ----

    /// Path of the route JSON file, relative to the software root.
    pub route_file: String,

    /// True if the route cycles indefinitely; false if the controller ends
    /// after the last stop is serviced.
    pub cyclic: bool,

    // ---- ZONE DISTANCES ----

    /// Enter DRIVING from INACTIVE when distance-to-target drops to this.
    ///
    /// Units: meters
    pub activation_dist_m: f64,

    /// Revert to INACTIVE from DRIVING if distance-to-target exceeds this.
    /// Optional hysteresis, may exceed the activation distance.
    ///
    /// Units: meters
    pub deactivation_dist_m: Option<f64>,

    /// Enter IN_AREA when distance-to-target drops to this.
    ///
    /// Units: meters
    pub in_area_dist_m: f64,

    /// Enter APPROACHING when distance-to-target drops to this.
    ///
    /// Units: meters
    pub approaching_dist_m: f64,

    /// Enter STOPPING when distance-to-target drops to this.
    ///
    /// Units: meters
    pub stopping_dist_m: f64,

    // ---- DWELL ----

    /// Time the vehicle must dwell in STOPPED before resuming.
    ///
    /// Units: seconds
    pub stop_time_s: f64,

    // ---- ZONE SPEEDS ----

    /// Target cruise speed while in IN_AREA.
    ///
    /// Units: kilometers/hour
    pub in_area_speed_kph: f64,

    /// Target cruise speed while in APPROACHING.
    ///
    /// Units: kilometers/hour
    pub approaching_speed_kph: f64,

    /// Speed below which the vehicle is considered stopped.
    ///
    /// Units: kilometers/hour
    pub zero_threshold_speed_kph: f64,

    /// Speed the vehicle must reach to leave RESUME.
    ///
    /// Units: kilometers/hour
    pub resume_speed_kph: f64,

    // ---- ZONE ACCELERATIONS ----

    /// Acceleration issued throughout STOPPING and STOPPED.
    ///
    /// Units: meters/second^2
    pub stopping_accel_ms2: f64,

    /// Deceleration hint issued when the velocity target is below the
    /// current speed.
    ///
    /// Units: meters/second^2
    pub reduce_accel_ms2: f64,

    /// Acceleration issued throughout RESUME.
    ///
    /// Units: meters/second^2
    pub resume_accel_ms2: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the zone threshold ordering invariant.
    pub fn validate(&self) -> Result<(), StopMgrError> {
        let ordered = self.stopping_dist_m < self.approaching_dist_m
            && self.approaching_dist_m < self.in_area_dist_m
            && self.in_area_dist_m <= self.activation_dist_m;

        if ordered {
            Ok(())
        } else {
            Err(StopMgrError::InvalidThresholds {
                stopping_dist_m: self.stopping_dist_m,
                approaching_dist_m: self.approaching_dist_m,
                in_area_dist_m: self.in_area_dist_m,
                activation_dist_m: self.activation_dist_m,
            })
        }
    }
}
