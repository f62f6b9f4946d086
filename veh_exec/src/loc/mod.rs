//! # Localisation types
//!
//! This module provides the vehicle-state snapshot consumed by the control
//! modules each cycle: GPS position, speed, cumulative odometry and
//! (optionally) per-wheel speeds. Snapshots are produced by the active
//! vehicle-state source (the simulation in development builds) and are
//! read-only for the rest of the exec.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of wheels reporting individual speeds.
pub const NUM_WHEELS: usize = 4;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A geographic coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    /// Latitude.
    ///
    /// Units: degrees, positive north
    pub lat_deg: f64,

    /// Longitude.
    ///
    /// Units: degrees, positive east
    pub lon_deg: f64,
}

/// A read-only snapshot of the vehicle state at the start of a cycle.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct VehicleState {
    /// Current GPS position.
    pub position: GeoPoint,

    /// Current speed over ground.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Cumulative distance traveled since the source started.
    ///
    /// Units: meters
    pub odometer_m: f64,

    /// Per-wheel speeds, if the vehicle interface provides them.
    ///
    /// Units: meters/second, order front-left, front-right, rear-left,
    /// rear-right.
    pub wheel_speeds_ms: Option<[f64; NUM_WHEELS]>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GeoPoint {
    /// True if the coordinate is finite and within the valid
    /// latitude/longitude ranges.
    ///
    /// Distance calculations are undefined for coordinates failing this
    /// check, so it must pass before a snapshot enters any control module.
    pub fn is_valid(&self) -> bool {
        self.lat_deg.is_finite()
            && self.lon_deg.is_finite()
            && self.lat_deg.abs() <= 90.0
            && self.lon_deg.abs() <= 180.0
    }
}

impl VehicleState {
    /// True if every field of the snapshot is usable for control processing.
    pub fn is_valid(&self) -> bool {
        self.position.is_valid()
            && self.speed_ms.is_finite()
            && self.odometer_m.is_finite()
            && match self.wheel_speeds_ms {
                Some(ws) => ws.iter().all(|w| w.is_finite()),
                None => true,
            }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn valid_state() -> VehicleState {
        VehicleState {
            position: GeoPoint {
                lat_deg: 51.4545,
                lon_deg: -2.5879,
            },
            speed_ms: 11.1,
            odometer_m: 1523.0,
            wheel_speeds_ms: None,
        }
    }

    #[test]
    fn test_valid_snapshot() {
        assert!(valid_state().is_valid());
    }

    #[test]
    fn test_nan_position_rejected() {
        let mut state = valid_state();
        state.position.lat_deg = f64::NAN;
        assert!(!state.is_valid());
    }

    #[test]
    fn test_out_of_range_longitude_rejected() {
        let mut state = valid_state();
        state.position.lon_deg = 181.0;
        assert!(!state.is_valid());
    }

    #[test]
    fn test_non_finite_speed_rejected() {
        let mut state = valid_state();
        state.speed_ms = f64::INFINITY;
        assert!(!state.is_valid());
    }
}
